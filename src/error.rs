/*
 * Responsibility
 * - 認証失敗 (AuthError) の定義
 * - 401 レスポンス (JSON error body) の組み立て
 * - 文言は RejectionMessages で差し替え可能
 */
use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::RejectionMessages;
use crate::services::auth::VerifyError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredential,
    #[error("invalid credentials: {0}")]
    InvalidCredential(#[from] VerifyError),
}

/// Gate の文言を request extensions 経由で extractor に渡すための型
#[derive(Debug, Clone)]
pub struct RejectionWording(pub Arc<RejectionMessages>);

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AuthError {
    pub fn message(&self, messages: &RejectionMessages) -> String {
        match self {
            AuthError::MissingCredential => messages.missing.clone(),
            AuthError::InvalidCredential(cause) => format!("{}: {}", messages.invalid, cause),
        }
    }

    pub fn into_response_with(self, messages: &RejectionMessages) -> Response {
        let body = ErrorResponse {
            error: self.message(messages),
        };

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.into_response_with(&RejectionMessages::default())
    }
}
