use anyhow::{Context, Result};
use std::path::Path;

/// Western Railway stations from Virar up to Surat, in line order.
pub const DEFAULT_STATIONS: [&str; 30] = [
    "VIRAR",
    "Vaitarna",
    "Saphale",
    "Kelve Road",
    "Palghar",
    "Boisar",
    "Vangaon",
    "Dahanu Road",
    "Gholvad",
    "Umbergaon Road",
    "Sanjan",
    "Bhilad",
    "Karambeli",
    "Vapi",
    "Udvada",
    "Pardi",
    "Atul",
    "Valsad",
    "Dungri",
    "Joravasan",
    "Bilimora Junction",
    "Amalsad",
    "Ancheli",
    "Vedchha",
    "Navsari",
    "Maroli",
    "Sachin",
    "Bhestan",
    "Udhna Junction",
    "Surat",
];

pub fn default_stations() -> Vec<String> {
    DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
}

/// Parse a station list: one name per line, `#` starts a comment line.
///
/// Names are trimmed but otherwise kept as written; duplicates stay.
pub fn parse_station_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_station_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read station list: {}", path.display()))?;
    Ok(parse_station_list(&contents))
}
