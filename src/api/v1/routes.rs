/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /me, /feed
 * - どのルートに Bearer が必要かは AccessGate のルール (exclude/optional) で決める
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    health::health,
    session::{feed, me},
};

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/feed", get(feed))
}
