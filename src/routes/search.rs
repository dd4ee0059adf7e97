use actix_web::{web, HttpResponse};

use super::error::ApiError;
use super::AppState;
use crate::core::search_nearby;
use crate::models::NearbySearchRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/search/nearby", web::get().to(nearby));
}

/// Search several facility types around a point
///
/// GET /api/v1/search/nearby?lat=34.05&lng=-118.24&radius=10&types=resources&types=regional_centers
///
/// Without `types` the located types are searched. Unknown types are
/// ignored; every searched type gets a key, possibly with an empty list.
async fn nearby(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let request = NearbySearchRequest::from_pairs(&query.into_inner(), state.search.max_radius_miles)?;
    let near = request.proximity;

    tracing::info!(
        "Searching near lat={}, lng={}, radius={} types={:?}",
        near.latitude,
        near.longitude,
        near.radius_miles,
        request.types
    );

    let results = search_nearby(state.postgres.as_ref(), near.center(), near.radius_miles, &request.types).await?;

    tracing::info!(
        "Nearby search returned {} records across {} types",
        results.values().map(|c| c.len()).sum::<usize>(),
        results.len()
    );

    Ok(HttpResponse::Ok().json(results))
}
