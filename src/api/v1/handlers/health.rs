/*
 * Responsibility
 * - GET /health (疎通用)
 * - デフォルト設定では AUTH_EXCLUDE で access gate を通さない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
