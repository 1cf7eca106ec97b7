pub mod nominatim;
pub mod overpass;

pub use nominatim::NominatimClient;
pub use overpass::{OverpassClient, OverpassResponse, railway_query};
