//! Facility Locator - search API for behavioral-health facilities
//!
//! Serves ABA centers, resource centers, regional centers, resources and
//! providers from PostgreSQL, with Haversine radius filtering and a
//! multi-type "search nearby" over the located collections.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance, filter_by_radius, haversine_distance, search_nearby, EntityCollection, EntityType, FacilityStore,
    GeoPoint, HasLocation, NearbyResults,
};
pub use models::{AbaCenter, Provider, RegionalCenter, Resource, ResourceCenter};
