use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::ResolverConfig;
use crate::domain::FallbackMatch;

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Present on ways and relations when the query asks for `out center`
    #[serde(default)]
    pub center: Option<Center>,
}

#[derive(Debug, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl Element {
    /// Representative point: direct coordinates for nodes, computed center
    /// for everything else.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.type_ == "node"
            && let (Some(lat), Some(lon)) = (self.lat, self.lon)
        {
            return Some((lat, lon));
        }
        let center = self.center.as_ref()?;
        Some((center.lat?, center.lon?))
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.as_ref()?.get("name").map(String::as_str)
    }
}

/// Overpass QL for at most one railway-tagged feature whose name matches
/// `name` case-insensitively.
pub fn railway_query(name: &str) -> String {
    format!(
        r#"[out:json][timeout:25];
(node["name"~"{name}",i]["railway"];way["name"~"{name}",i]["railway"];relation["name"~"{name}",i]["railway"];);
out center 1;"#,
        name = name
    )
}

/// Pick the first element of a response and turn it into a match.
pub fn first_match(response: &OverpassResponse) -> Option<FallbackMatch> {
    let element = response.elements.first()?;
    let (lat, lon) = element.coordinates()?;
    Some(FallbackMatch {
        display_name: element.name().map(str::to_string),
        lat,
        lon,
    })
}

/// Railway feature search against an Overpass interpreter.
pub struct OverpassClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl OverpassClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.fallback_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            url: config.overpass_url.clone(),
        })
    }

    /// Find a railway feature named like `name`.
    ///
    /// Failures are logged and reported as `None`, same as finding nothing.
    pub fn find_railway_feature(&self, name: &str) -> Option<FallbackMatch> {
        match self.execute(&railway_query(name)) {
            Ok(response) => first_match(&response),
            Err(e) => {
                tracing::debug!(station = name, "Overpass lookup failed: {:#}", e);
                None
            }
        }
    }

    fn execute(&self, query: &str) -> Result<OverpassResponse> {
        tracing::debug!(url = %self.url, "querying Overpass");

        // Overpass expects form-encoded POST data: data=<query>
        let response = self
            .http
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .context("Failed to send request to Overpass API")?;

        if response.status().as_u16() != 200 {
            bail!("Overpass API returned error status: {}", response.status());
        }

        response
            .json()
            .context("Failed to parse Overpass JSON response")
    }
}
