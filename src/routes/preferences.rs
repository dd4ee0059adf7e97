use actix_web::{web, HttpResponse};
use validator::Validate;

use super::error::ApiError;
use super::AppState;
use crate::models::UpdatePreferencesRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/preferences/{user_id}")
            .route(web::get().to(get_preferences))
            .route(web::put().to(update_preferences)),
    );
}

/// GET /api/v1/preferences/{user_id}
///
/// Users without stored preferences get the defaults.
async fn get_preferences(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    tracing::debug!("Fetching preferences for {}", user_id);

    let prefs = state.postgres.get_preferences(&user_id).await?;
    Ok(HttpResponse::Ok().json(prefs))
}

/// PUT /api/v1/preferences/{user_id}
async fn update_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let user_id = path.into_inner();

    let prefs = state.postgres.upsert_preferences(&user_id, &body).await?;
    Ok(HttpResponse::Ok().json(prefs))
}
