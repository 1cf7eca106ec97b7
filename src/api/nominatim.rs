use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::FROM;
use serde::Deserialize;

use crate::config::ResolverConfig;
use crate::domain::{PrimaryLookup, PrimaryMatch, TransportError};

#[derive(Debug, Deserialize)]
struct NominatimResult {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl From<NominatimResult> for PrimaryMatch {
    fn from(result: NominatimResult) -> Self {
        Self {
            display_name: result.display_name,
            lat: result.lat,
            lon: result.lon,
            kind: result.kind,
        }
    }
}

/// Free-text search against a Nominatim instance.
pub struct NominatimClient {
    http: reqwest::blocking::Client,
    url: String,
    contact: Option<String>,
}

impl NominatimClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.primary_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            url: config.nominatim_url.clone(),
            contact: config.contact().map(str::to_string),
        })
    }

    /// Look up `query` and classify the answer.
    ///
    /// Only a 200 with an empty array counts as `NotFound`; every other
    /// failure is reported as a `TransportError`.
    pub fn search(&self, query: &str) -> PrimaryLookup {
        match self.fetch(query) {
            Ok(results) => match results.into_iter().next() {
                Some(first) => PrimaryLookup::Found(first.into()),
                None => PrimaryLookup::NotFound,
            },
            Err(e) => PrimaryLookup::Failed(e),
        }
    }

    fn fetch(&self, query: &str) -> Result<Vec<NominatimResult>, TransportError> {
        let mut request = self
            .http
            .get(&self.url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")]);
        if let Some(email) = &self.contact {
            request = request.header(FROM, email);
        }

        tracing::debug!(url = %self.url, query, "querying Nominatim");
        let response = request
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        response
            .json()
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}
