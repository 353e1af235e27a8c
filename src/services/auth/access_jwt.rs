use std::str::FromStr;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Decoded JWT payload.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Why a presented token was refused.
///
/// Display strings are sent to the caller as the rejection cause, so they
/// never carry token or key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid '{0}' claim")]
    InvalidClaim(&'static str),
    #[error("missing '{0}' claim")]
    MissingClaim(String),
    #[error("verification failed")]
    Rejected,
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            ErrorKind::InvalidSignature => Self::SignatureMismatch,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::UnsupportedAlgorithm,
            ErrorKind::InvalidIssuer => Self::InvalidClaim("iss"),
            ErrorKind::InvalidAudience => Self::InvalidClaim("aud"),
            ErrorKind::InvalidSubject => Self::InvalidClaim("sub"),
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            _ => Self::Rejected,
        }
    }
}

/// Seam between the access gate and the token library.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError>;
}

/// Options handed to `jsonwebtoken::Validation` as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerificationOptions {
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    // Empty by default: a token without `exp` is accepted, `exp` is checked when present.
    pub required_claims: Vec<String>,
    pub validate_exp: bool,
    pub validate_nbf: bool,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            leeway_seconds: 60,
            issuer: None,
            audience: None,
            required_claims: Vec::new(),
            validate_exp: true,
            validate_nbf: true,
        }
    }
}

/// `jsonwebtoken`-backed verifier pinned to a single algorithm.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        secret: &str,
        algorithm: &str,
        options: &VerificationOptions,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Missing("secret"));
        }

        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| ConfigError::UnsupportedAlgorithm(algorithm.to_string()))?;
        let decoding_key = decoding_key(secret, algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = options.leeway_seconds;
        validation.validate_exp = options.validate_exp;
        validation.validate_nbf = options.validate_nbf;

        // A configured iss/aud is only compared when present, so it must also be required.
        let mut required = options.required_claims.clone();
        if options.issuer.is_some() {
            required.push("iss".to_string());
        }
        if options.audience.is_some() {
            required.push("aud".to_string());
        }
        validation.set_required_spec_claims(&required);

        if let Some(issuer) = &options.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &options.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

fn decoding_key(secret: &str, algorithm: Algorithm) -> Result<DecodingKey, ConfigError> {
    let pem = secret.as_bytes();
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(DecodingKey::from_secret(pem));
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        #[allow(unreachable_patterns)]
        _ => return Err(ConfigError::UnsupportedAlgorithm(format!("{algorithm:?}"))),
    };

    key.map_err(|e| ConfigError::InvalidKey(format!("{algorithm:?} public key pem: {e}")))
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "jwt decode failed");
                VerifyError::from(err)
            })?;

        Ok(data.claims)
    }
}
