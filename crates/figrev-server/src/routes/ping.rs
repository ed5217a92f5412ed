use axum::Json;

/// GET /api/ping — liveness probe.
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
