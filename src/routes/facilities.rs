use actix_web::{web, HttpResponse};
use validator::Validate;

use super::error::{parse_uuid, ApiError};
use super::AppState;
use crate::core::filter_by_radius;
use crate::models::{
    AbaCenterQuery, CreateAbaCenterRequest, ProviderQuery, ProximityParams, RegionalCenterQuery, ResourceCenterQuery,
    ResourceQuery,
};

/// Configure facility listing and lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/aba-centers")
            .route(web::get().to(list_aba_centers))
            .route(web::post().to(create_aba_center)),
    )
    .route("/aba-centers/{id}", web::get().to(get_aba_center))
    .route("/resource-centers", web::get().to(list_resource_centers))
    .route("/resource-centers/{id}", web::get().to(get_resource_center))
    .route("/resources", web::get().to(list_resources))
    .route("/resources/{id}", web::get().to(get_resource))
    .route("/regional-centers", web::get().to(list_regional_centers))
    .route("/providers", web::get().to(list_providers))
    .route("/diagnoses", web::get().to(list_diagnoses));
}

fn proximity(
    state: &AppState,
    lat: &Option<String>,
    lng: &Option<String>,
    radius: &Option<String>,
) -> Result<Option<ProximityParams>, ApiError> {
    Ok(ProximityParams::parse_optional(
        lat.as_deref(),
        lng.as_deref(),
        radius.as_deref(),
        state.search.max_radius_miles,
    )?)
}

/// GET /api/v1/aba-centers?city=&service_type=&insurance=&waitlist=true&search=
async fn list_aba_centers(
    state: web::Data<AppState>,
    query: web::Query<AbaCenterQuery>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Listing ABA centers: {:?}", query);

    let centers = state.postgres.list_aba_centers(&query).await?;

    tracing::info!("Returning {} ABA centers", centers.len());
    Ok(HttpResponse::Ok().json(centers))
}

async fn get_aba_center(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path, "ABA center")?;
    let center = state.postgres.get_aba_center(id).await?;
    Ok(HttpResponse::Ok().json(center))
}

/// POST /api/v1/aba-centers
async fn create_aba_center(
    state: web::Data<AppState>,
    body: web::Json<CreateAbaCenterRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let center = state.postgres.create_aba_center(&body).await?;
    Ok(HttpResponse::Created().json(center))
}

/// GET /api/v1/resource-centers?search=&lat=&lng=&radius=
async fn list_resource_centers(
    state: web::Data<AppState>,
    query: web::Query<ResourceCenterQuery>,
) -> Result<HttpResponse, ApiError> {
    let near = proximity(&state, &query.lat, &query.lng, &query.radius)?;
    tracing::info!("Listing resource centers: search={:?}, near={:?}", query.search, near);

    let mut centers = state.postgres.list_resource_centers(&query).await?;
    if let Some(near) = near {
        centers = filter_by_radius(centers, near.center(), near.radius_miles);
    }

    tracing::info!("Returning {} resource centers", centers.len());
    Ok(HttpResponse::Ok().json(centers))
}

async fn get_resource_center(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path, "resource center")?;
    let center = state.postgres.get_resource_center(id).await?;
    Ok(HttpResponse::Ok().json(center))
}

/// GET /api/v1/resources?search=&diagnosis=&lat=&lng=&radius=
async fn list_resources(
    state: web::Data<AppState>,
    query: web::Query<ResourceQuery>,
) -> Result<HttpResponse, ApiError> {
    let near = proximity(&state, &query.lat, &query.lng, &query.radius)?;
    tracing::info!(
        "Listing resources: search={:?}, diagnosis={:?}, near={:?}",
        query.search,
        query.diagnosis,
        near
    );

    let mut resources = state.postgres.list_resources(&query).await?;
    if let Some(near) = near {
        resources = filter_by_radius(resources, near.center(), near.radius_miles);
    }

    tracing::info!("Returning {} resources", resources.len());
    Ok(HttpResponse::Ok().json(resources))
}

async fn get_resource(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_uuid(&path, "resource")?;
    let resource = state.postgres.get_resource(id).await?;
    Ok(HttpResponse::Ok().json(resource))
}

/// GET /api/v1/regional-centers?county=&search=&lat=&lng=&radius=
///
/// Offices without coordinates drop out once a location is given.
async fn list_regional_centers(
    state: web::Data<AppState>,
    query: web::Query<RegionalCenterQuery>,
) -> Result<HttpResponse, ApiError> {
    let near = proximity(&state, &query.lat, &query.lng, &query.radius)?;
    tracing::info!(
        "Listing regional centers: county={:?}, search={:?}, near={:?}",
        query.county,
        query.search,
        near
    );

    let mut centers = state.postgres.list_regional_centers(&query).await?;
    if let Some(near) = near {
        centers = filter_by_radius(centers, near.center(), near.radius_miles);
    }

    tracing::info!("Returning {} regional centers", centers.len());
    Ok(HttpResponse::Ok().json(centers))
}

/// GET /api/v1/providers?search=&area=
async fn list_providers(
    state: web::Data<AppState>,
    query: web::Query<ProviderQuery>,
) -> Result<HttpResponse, ApiError> {
    let providers = state.postgres.list_providers(&query).await?;

    tracing::info!("Returning {} providers", providers.len());
    Ok(HttpResponse::Ok().json(providers))
}

async fn list_diagnoses(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let diagnoses = state.postgres.list_diagnoses().await?;

    tracing::info!("Returning {} diagnoses", diagnoses.len());
    Ok(HttpResponse::Ok().json(diagnoses))
}
