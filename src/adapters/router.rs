use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::adapters::{
    controllers::{file_controller::FileController, health_controller::HealthController},
    state::AppState,
};

/// Builds the HTTP surface, mounted under the configured base path.
pub fn build_router(app_state: AppState) -> Router {
    let config = app_state.config.clone();

    let cors = match &config.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified (only for development)
        None => CorsLayer::permissive(),
    };

    let api_routes = Router::new()
        .route("/health", get(HealthController::health_check))
        .route(
            "/files",
            get(FileController::list_files).post(FileController::upload_file),
        )
        .route(
            "/files/{fileid}",
            get(FileController::download_file).delete(FileController::delete_file),
        );

    let routes = if config.api_base_path.is_empty() {
        api_routes
    } else {
        Router::new().nest(&config.api_base_path, api_routes)
    };

    routes
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
