#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bearer_gate::{AccessGate, GateConfig, api::v1::extractors::AuthCtxExtractor, middleware};

pub const SECRET: &str = "secret";

pub fn sign(claims: &Value, secret: &str) -> String {
    sign_with(claims, secret, Algorithm::HS256)
}

pub fn sign_with(claims: &Value, secret: &str, alg: Algorithm) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Inner app answering 200 on every path, echoing the claims it received.
pub fn gated_app(config: GateConfig) -> Router {
    async fn echo(ctx: Option<AuthCtxExtractor>) -> Json<Value> {
        Json(json!({ "claims": ctx.map(|AuthCtxExtractor(ctx)| ctx.claims) }))
    }

    let gate = AccessGate::new(&config).unwrap();
    middleware::auth::apply(Router::new().fallback(echo), gate)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
