// Route exports
pub mod error;
pub mod facilities;
pub mod preferences;
pub mod search;
pub mod submissions;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::config::SearchSettings;
use crate::models::HealthResponse;
use crate::services::PostgresClient;

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub search: SearchSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            // Submission paths must be registered ahead of the `/{id}` lookups
            .configure(submissions::configure)
            .configure(facilities::configure)
            .configure(search::configure)
            .configure(preferences::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = match state.postgres.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Health check could not reach PostgreSQL: {}", e);
            false
        }
    };

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        service: "Medical Facilities API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
