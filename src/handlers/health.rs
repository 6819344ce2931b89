use axum::Json;
use axum::response::IntoResponse;

// Liveness check, independent of provider/credential state.
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
