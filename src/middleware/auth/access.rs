//! Access gate: ルール分類 → Bearer 抽出 → JWT 検証 → AuthCtx を extensions に入れる
//!
//! - exclude に当たるリクエストはヘッダを一切見ずに素通し
//! - optional に当たるリクエストはトークン無しなら素通し、有りなら通常どおり検証
//! - それ以外はトークン必須
//!
//! Rejections are produced here and the inner handler is never invoked for them.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::config::{ConfigError, GateConfig, RejectionMessages};
use crate::error::{AuthError, RejectionWording};
use crate::middleware::auth::rules::RuleSet;
use crate::middleware::bearer_auth::bearer_token;
use crate::services::auth::{Claims, JwtVerifier, TokenVerifier};

/// How a request is treated, decided from (path, method) alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Excluded,
    Optional,
    Required,
}

/// Immutable per-process gate; cheap to clone and shared by all requests.
#[derive(Clone)]
pub struct AccessGate {
    inner: Arc<Inner>,
}

struct Inner {
    exclude: RuleSet,
    optional: RuleSet,
    verifier: Arc<dyn TokenVerifier>,
    messages: Arc<RejectionMessages>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("exclude", &self.inner.exclude)
            .field("optional", &self.inner.optional)
            .field("messages", &self.inner.messages)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Build a gate verifying JWTs with the configured secret and algorithm.
    pub fn new(config: &GateConfig) -> Result<Self, ConfigError> {
        let verifier =
            JwtVerifier::new(&config.secret, &config.algorithm, &config.verification)?;
        Self::with_verifier(config, Arc::new(verifier))
    }

    /// Build a gate around any verifier. `secret`/`algorithm` in `config` are not used.
    pub fn with_verifier(
        config: &GateConfig,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(Inner {
                exclude: RuleSet::compile(&config.exclude)?,
                optional: RuleSet::compile(&config.optional)?,
                verifier,
                messages: Arc::new(config.messages.clone()),
            }),
        })
    }

    pub fn classify(&self, path: &str, method: &str) -> Access {
        if self.inner.exclude.matches(path, method) {
            Access::Excluded
        } else if self.inner.optional.matches(path, method) {
            Access::Optional
        } else {
            Access::Required
        }
    }

    /// Decide one request.
    ///
    /// `Ok(None)` means forward without identity, `Ok(Some(_))` forward with claims.
    pub fn authorize(
        &self,
        path: &str,
        method: &str,
        headers: &HeaderMap,
    ) -> Result<Option<Claims>, AuthError> {
        let access = self.classify(path, method);
        if access == Access::Excluded {
            return Ok(None);
        }

        let Some(token) = bearer_token(headers) else {
            if access == Access::Optional {
                return Ok(None);
            }
            tracing::debug!(%method, %path, "no bearer token on protected path");
            return Err(AuthError::MissingCredential);
        };

        match self.inner.verifier.verify(token) {
            Ok(claims) => Ok(Some(claims)),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    %method,
                    %path,
                    "access token verification failed"
                );
                Err(AuthError::InvalidCredential(err))
            }
        }
    }

    pub fn messages(&self) -> &RejectionMessages {
        &self.inner.messages
    }
}

/// Apply the gate to every route of `router`.
///
/// 例：
/// ```ignore
/// let gate = AccessGate::new(&config.gate)?;
/// let app = middleware::auth::access::apply(api::v1::routes(), gate);
/// ```
pub fn apply<S>(router: Router<S>, gate: AccessGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // nest() 配下でもルールはフルパスで評価する
    let path = original_uri.path();

    // 除外ルートの AuthCtxExtractor も同じ文言で 401 を返せるように
    req.extensions_mut()
        .insert(RejectionWording(Arc::clone(&gate.inner.messages)));

    match gate.authorize(path, req.method().as_str(), req.headers()) {
        Ok(Some(claims)) => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(AuthCtx::new(claims));
        }
        Ok(None) => {}
        Err(err) => return err.into_response_with(gate.messages()),
    }

    next.run(req).await
}
