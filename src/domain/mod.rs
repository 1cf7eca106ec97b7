pub mod result;
pub mod station;

pub use result::{FallbackMatch, LookupResult, PrimaryLookup, PrimaryMatch, Source, TransportError};
pub use station::{DEFAULT_STATIONS, default_stations, load_station_list, parse_station_list};
