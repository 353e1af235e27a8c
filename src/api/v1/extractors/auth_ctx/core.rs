use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::error::{AuthError, RejectionWording};

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
/// 文言は gate が入れた RejectionWording に従い、無ければデフォルト
///
/// optional ルールの handler は `Option<AuthCtxExtractor>` で受ける
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthCtx>() {
            return Ok(AuthCtxExtractor(ctx.clone()));
        }

        let rejection = AuthError::MissingCredential;
        Err(match parts.extensions.get::<RejectionWording>() {
            Some(RejectionWording(messages)) => rejection.into_response_with(messages),
            None => rejection.into_response(),
        })
    }
}

impl<S> OptionalFromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthCtx>().cloned().map(AuthCtxExtractor))
    }
}
