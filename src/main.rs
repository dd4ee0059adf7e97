use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use facility_locator::config::{LoggingSettings, Settings};
use facility_locator::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use facility_locator::services::PostgresClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Load `.env.production` when APP_ENV=production, `.env.local` otherwise
fn load_env_file() {
    let env_file = match std::env::var("APP_ENV").as_deref() {
        Ok("production") => ".env.production",
        _ => ".env.local",
    };

    // Logging is not up yet
    if let Err(e) = dotenv::from_filename(env_file) {
        eprintln!("Could not load {}: {}", env_file, e);
    }
    dotenv::dotenv().ok();
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Permissive when no origins are configured
fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(12 * 60 * 60)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Medical Facilities API server...");

    let postgres = Arc::new(PostgresClient::connect(&settings.database).await.map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?);

    info!("PostgreSQL client initialized");

    let app_state = AppState {
        postgres,
        search: settings.search.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.server.allowed_origins.clone();

    if allowed_origins.is_empty() {
        info!("CORS: allowing any origin");
    } else {
        info!("CORS: allowing {:?}", allowed_origins);
    }

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(build_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await?;

    info!("Medical Facilities API server exited");
    Ok(())
}
