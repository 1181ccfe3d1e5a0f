use axum::Json;
use serde_json::{Value, json};

/// GET /api/v1/health - Liveness check (no auth required).
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
