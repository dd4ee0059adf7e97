// Core algorithm exports
pub mod distance;
pub mod nearby;
pub mod proximity;

pub use distance::{distance, haversine_distance, GeoPoint, EARTH_RADIUS_MILES};
pub use nearby::{resolve_types, search_nearby, EntityCollection, EntityType, FacilityStore, NearbyResults};
pub use proximity::{filter_by_radius, is_within_radius, HasLocation};
