use tracing::debug;

pub struct HealthController;

impl HealthController {
    /// GET /health
    pub async fn health_check() -> &'static str {
        debug!("Health check requested");
        "OK"
    }
}
