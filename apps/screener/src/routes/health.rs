use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Reports the screener is up. Does not contact the completion service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-screener"
    }))
}
