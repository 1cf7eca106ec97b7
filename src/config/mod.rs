use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::default_stations;

pub const APP_IDENTIFIER: &str = "MARGDARSHAK/1.0";
pub const DEFAULT_CONTACT_EMAIL: &str = "your-email@example.com";
pub const DEFAULT_OUTPUT_FILE: &str = "station-lookup-results.json";

fn default_contact_email() -> Option<String> {
    Some(DEFAULT_CONTACT_EMAIL.to_string())
}
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}
fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}
fn default_query_suffix() -> String {
    "railway station India".to_string()
}
fn default_primary_timeout_secs() -> u64 {
    30
}
fn default_fallback_timeout_secs() -> u64 {
    60
}
fn default_delay_ms() -> u64 {
    1100
}

/// Settings read from a TOML file. Every key is optional.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub nominatim_url: Option<String>,
    #[serde(default)]
    pub overpass_url: Option<String>,
    #[serde(default)]
    pub query_suffix: Option<String>,
    #[serde(default)]
    pub primary_timeout_secs: Option<u64>,
    #[serde(default)]
    pub fallback_timeout_secs: Option<u64>,
    #[serde(default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub stations: Option<Vec<String>>,
}

impl FileConfig {
    /// Search the usual locations and return the first config that parses.
    pub fn load() -> Option<Self> {
        Self::load_first(&get_config_paths())
    }

    /// First existing path that reads and parses wins; the rest are warned
    /// about and skipped.
    fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            let contents = match std::fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("Failed to read config file {:?}: {}", path, e);
                    continue;
                }
            };
            match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config file");
                    return Some(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file. Missing or invalid is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("station-lookup.toml"),
        PathBuf::from(".station-lookup.toml"),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("station-lookup").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".station-lookup.toml"));
    }

    paths
}

/// Everything one run needs. Built once in `main` and handed to the clients
/// and the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub contact_email: Option<String>,
    pub nominatim_url: String,
    pub overpass_url: String,
    pub query_suffix: String,
    pub primary_timeout: Duration,
    pub fallback_timeout: Duration,
    pub delay: Duration,
    pub output: PathBuf,
    pub stations: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            contact_email: default_contact_email(),
            nominatim_url: default_nominatim_url(),
            overpass_url: default_overpass_url(),
            query_suffix: default_query_suffix(),
            primary_timeout: Duration::from_secs(default_primary_timeout_secs()),
            fallback_timeout: Duration::from_secs(default_fallback_timeout_secs()),
            delay: Duration::from_millis(default_delay_ms()),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            stations: default_stations(),
        }
    }
}

impl ResolverConfig {
    /// Built-in defaults with any file-provided values layered on top.
    pub fn from_file(file: Option<FileConfig>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(email) = file.contact_email {
            config.contact_email = Some(email);
        }
        if let Some(url) = file.nominatim_url {
            config.nominatim_url = url;
        }
        if let Some(url) = file.overpass_url {
            config.overpass_url = url;
        }
        if let Some(suffix) = file.query_suffix {
            config.query_suffix = suffix;
        }
        if let Some(secs) = file.primary_timeout_secs {
            config.primary_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.fallback_timeout_secs {
            config.fallback_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.delay_ms {
            config.delay = Duration::from_millis(ms);
        }
        if let Some(output) = file.output {
            config.output = output;
        }
        if let Some(stations) = file.stations {
            config.stations = stations;
        }
        config
    }

    /// The configured contact email, treating an empty value as unset.
    pub fn contact(&self) -> Option<&str> {
        self.contact_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    pub fn user_agent(&self) -> String {
        match self.contact() {
            Some(email) => format!("{} ({})", APP_IDENTIFIER, email),
            None => APP_IDENTIFIER.to_string(),
        }
    }
}

/// Free-text search string sent to the geocoder for a station.
pub fn search_query(name: &str, suffix: &str) -> String {
    format!("{} {}", name, suffix)
}
