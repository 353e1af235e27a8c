/*
 * Responsibility
 * - GET /me: トークン必須のルート。検証済み claims をそのまま返す
 * - GET /feed: optional ルート想定。トークンがあれば viewer を埋める
 */
use axum::Json;

use crate::api::v1::{
    dto::session::{FeedResponse, MeResponse},
    extractors::AuthCtxExtractor,
};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        subject: ctx.subject().map(str::to_string),
        claims: ctx.claims,
    })
}

pub async fn feed(ctx: Option<AuthCtxExtractor>) -> Json<FeedResponse> {
    let viewer = ctx.and_then(|AuthCtxExtractor(ctx)| ctx.subject().map(str::to_string));

    Json(FeedResponse {
        authenticated: viewer.is_some(),
        viewer,
    })
}
