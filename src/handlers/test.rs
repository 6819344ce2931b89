use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::state::AppState;

// Diagnostic check: reports whether the Replicate token is configured
// without revealing its value.
pub async fn test_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Backend server is running!",
        "hasToken": state.has_token()
    }))
}
