use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::distance::GeoPoint;
use super::proximity::filter_by_radius;
use crate::models::{AbaCenter, Provider, RegionalCenter, Resource, ResourceCenter};

/// Entity collections that can be searched by tag
///
/// Variant order is the key order of a nearby result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    ResourceCenters,
    RegionalCenters,
    Resources,
    AbaCenters,
    Providers,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::ResourceCenters,
        EntityType::RegionalCenters,
        EntityType::Resources,
        EntityType::AbaCenters,
        EntityType::Providers,
    ];

    /// Tag used in `?types=` and as the result key
    pub const fn tag(self) -> &'static str {
        match self {
            EntityType::ResourceCenters => "resource_centers",
            EntityType::RegionalCenters => "regional_centers",
            EntityType::Resources => "resources",
            EntityType::AbaCenters => "aba_centers",
            EntityType::Providers => "providers",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|entity| entity.tag() == tag)
    }

    /// Whether records of this type carry coordinates
    ///
    /// Unlocated types are returned unfiltered by a nearby search.
    pub const fn is_located(self) -> bool {
        match self {
            EntityType::ResourceCenters | EntityType::RegionalCenters | EntityType::Resources => true,
            EntityType::AbaCenters | EntityType::Providers => false,
        }
    }

    /// Whether an untyped nearby search includes this type
    pub const fn searched_by_default(self) -> bool {
        self.is_located()
    }

    pub fn defaults() -> impl Iterator<Item = EntityType> {
        Self::ALL.into_iter().filter(|entity| entity.searched_by_default())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fully loaded collection for one entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityCollection {
    ResourceCenters(Vec<ResourceCenter>),
    RegionalCenters(Vec<RegionalCenter>),
    Resources(Vec<Resource>),
    AbaCenters(Vec<AbaCenter>),
    Providers(Vec<Provider>),
}

impl EntityCollection {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityCollection::ResourceCenters(_) => EntityType::ResourceCenters,
            EntityCollection::RegionalCenters(_) => EntityType::RegionalCenters,
            EntityCollection::Resources(_) => EntityType::Resources,
            EntityCollection::AbaCenters(_) => EntityType::AbaCenters,
            EntityCollection::Providers(_) => EntityType::Providers,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EntityCollection::ResourceCenters(v) => v.len(),
            EntityCollection::RegionalCenters(v) => v.len(),
            EntityCollection::Resources(v) => v.len(),
            EntityCollection::AbaCenters(v) => v.len(),
            EntityCollection::Providers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply the radius filter to located collections
    ///
    /// Collections of unlocated types come back unchanged.
    pub fn within_radius(self, center: GeoPoint, radius_miles: f64) -> Self {
        match self {
            EntityCollection::ResourceCenters(v) => {
                EntityCollection::ResourceCenters(filter_by_radius(v, center, radius_miles))
            }
            EntityCollection::RegionalCenters(v) => {
                EntityCollection::RegionalCenters(filter_by_radius(v, center, radius_miles))
            }
            EntityCollection::Resources(v) => {
                EntityCollection::Resources(filter_by_radius(v, center, radius_miles))
            }
            unlocated @ (EntityCollection::AbaCenters(_) | EntityCollection::Providers(_)) => unlocated,
        }
    }
}

/// Source of full entity collections for a nearby search
#[allow(async_fn_in_trait)]
pub trait FacilityStore {
    type Error;

    /// Load every record of `entity`, in storage order
    async fn load_all(&self, entity: EntityType) -> Result<EntityCollection, Self::Error>;
}

/// Nearby results keyed by entity type
pub type NearbyResults = BTreeMap<EntityType, EntityCollection>;

/// Resolve requested tags into the entity types to search
///
/// An empty request means the default set. Unknown tags are dropped and
/// duplicates collapse; the result follows `EntityType` order.
pub fn resolve_types<S: AsRef<str>>(requested: &[S]) -> Vec<EntityType> {
    if requested.is_empty() {
        return EntityType::defaults().collect();
    }

    let mut resolved: Vec<EntityType> = requested
        .iter()
        .filter_map(|tag| {
            let entity = EntityType::from_tag(tag.as_ref());
            if entity.is_none() {
                tracing::debug!("Ignoring unknown entity type tag: {}", tag.as_ref());
            }
            entity
        })
        .collect();

    resolved.sort();
    resolved.dedup();
    resolved
}

/// Search every requested entity type around `center`
///
/// Each resolved type gets a key, even when nothing is in range. A store
/// failure aborts the whole search.
pub async fn search_nearby<S, T>(
    store: &S,
    center: GeoPoint,
    radius_miles: f64,
    requested: &[T],
) -> Result<NearbyResults, S::Error>
where
    S: FacilityStore,
    T: AsRef<str>,
{
    let mut results = NearbyResults::new();

    for entity in resolve_types(requested) {
        let collection = store.load_all(entity).await?;
        debug_assert_eq!(collection.entity_type(), entity);

        let loaded = collection.len();
        let collection = if entity.is_located() {
            collection.within_radius(center, radius_miles)
        } else {
            collection
        };

        tracing::debug!(
            "Nearby {}: kept {} of {} within {} miles",
            entity,
            collection.len(),
            loaded,
            radius_miles
        );

        results.insert(entity, collection);
    }

    Ok(results)
}
