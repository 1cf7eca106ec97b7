use serde::{Serialize, Serializer};

/// A primary-provider failure. Recorded on the result, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The provider answered with something other than 200
    #[error("HTTP {0}")]
    Status(u16),

    /// The request could not be sent or the body could not be decoded
    #[error("{0}")]
    Request(String),
}

impl Serialize for TransportError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// First match returned by the geocoding search.
///
/// Coordinates stay as the strings the provider sends so the output file
/// carries them verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimaryMatch {
    pub display_name: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub kind: Option<String>,
}

/// Outcome of a single primary lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryLookup {
    Found(PrimaryMatch),
    NotFound,
    Failed(TransportError),
}

/// A railway feature located by the fallback provider.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackMatch {
    pub display_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Marker serialized as `"source": "overpass"` on fallback records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Overpass,
}

/// One output record per station, shaped by how the lookup went.
///
/// Field order inside each variant is the order written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupResult {
    Primary {
        query: String,
        display_name: Option<String>,
        lat: Option<String>,
        lon: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
    },
    Fallback {
        query: String,
        display_name: Option<String>,
        lat: f64,
        lon: f64,
        source: Source,
    },
    NotFound {
        query: String,
        display_name: Option<String>,
        lat: Option<f64>,
        lon: Option<f64>,
    },
    Failed {
        query: String,
        error: TransportError,
    },
}

impl LookupResult {
    pub fn from_primary(query: &str, found: PrimaryMatch) -> Self {
        Self::Primary {
            query: query.to_string(),
            display_name: found.display_name,
            lat: found.lat,
            lon: found.lon,
            kind: found.kind,
        }
    }

    pub fn from_fallback(query: &str, found: FallbackMatch) -> Self {
        Self::Fallback {
            query: query.to_string(),
            display_name: found.display_name,
            lat: found.lat,
            lon: found.lon,
            source: Source::Overpass,
        }
    }

    pub fn not_found(query: &str) -> Self {
        Self::NotFound {
            query: query.to_string(),
            display_name: None,
            lat: None,
            lon: None,
        }
    }

    pub fn failed(query: &str, error: TransportError) -> Self {
        Self::Failed {
            query: query.to_string(),
            error,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Primary { query, .. }
            | Self::Fallback { query, .. }
            | Self::NotFound { query, .. }
            | Self::Failed { query, .. } => query,
        }
    }
}
