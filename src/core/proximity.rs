use super::distance::GeoPoint;

/// Anything that may sit at a point on the map
pub trait HasLocation {
    /// `None` marks an unlocated record
    fn location(&self) -> Option<GeoPoint>;
}

impl HasLocation for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl<T: HasLocation + ?Sized> HasLocation for &T {
    fn location(&self) -> Option<GeoPoint> {
        (**self).location()
    }
}

/// Check if an entity lies within `radius_miles` of `center`
///
/// The boundary is inclusive. Unlocated entities never match.
#[inline]
pub fn is_within_radius<T: HasLocation>(entity: &T, center: &GeoPoint, radius_miles: f64) -> bool {
    match entity.location() {
        Some(point) => center.distance_to(&point) <= radius_miles,
        None => false,
    }
}

/// Keep the entities within `radius_miles` of `center`
///
/// Stable: survivors keep their input order. Records are moved through
/// untouched.
pub fn filter_by_radius<T: HasLocation>(
    entities: Vec<T>,
    center: GeoPoint,
    radius_miles: f64,
) -> Vec<T> {
    entities
        .into_iter()
        .filter(|entity| is_within_radius(entity, &center, radius_miles))
        .collect()
}
