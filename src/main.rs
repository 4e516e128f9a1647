use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use video_server::{
    adapters::{repositories::PgFileRecordRepository, router::build_router, state::AppState},
    application::repositories::file_record_repository::FileRecordRepository,
    domain::config::server::ServerConfig,
    services,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("ERROR: Invalid configuration");

    tracing::info!(
        "Starting video-server with storage root {}",
        config.storage_root.display()
    );

    tracing::info!("Connecting to database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await
        .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
    tracing::info!("Database connection established");

    let pg_repository = PgFileRecordRepository::new(pool);
    pg_repository
        .ensure_schema()
        .await
        .expect("ERROR: Failed to prepare the video metadata table");
    let file_record_repository = Arc::new(pg_repository) as Arc<dyn FileRecordRepository>;

    let storage_service = match services::create_storage_service(&config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Video storage failed to initialize with error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = storage_service.init(config.reset_storage_on_startup).await {
        tracing::error!("Video storage failed to initialize with error: {:?}", e);
        std::process::exit(1);
    }

    // Wiped files leave no rows behind
    if config.reset_storage_on_startup {
        match file_record_repository.delete_all().await {
            Ok(purged) => tracing::info!("Purged {} stale metadata records", purged),
            Err(e) => {
                tracing::error!("Failed to purge metadata after storage reset: {:?}", e);
                std::process::exit(1);
            }
        }
    }

    let port = config.port;
    let app_state = AppState {
        config: Arc::new(config),
        file_record_repository,
        storage_service,
    };

    let router = build_router(app_state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
