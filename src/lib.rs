//! station-lookup - Resolve railway station coordinates from OpenStreetMap services

pub mod api;
pub mod config;
pub mod domain;
pub mod logging;
pub mod output;
pub mod resolver;

pub use config::ResolverConfig;
pub use domain::LookupResult;
pub use resolver::{FallbackProvider, PrimaryProvider, Progress, Resolver, Silent};
