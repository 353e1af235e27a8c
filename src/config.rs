/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT secret, 除外/任意ルール, HTTP 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - GateConfig は serde でも組み立てられる (ライブラリ利用向け)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::middleware::auth::rules::RuleSpec;
use crate::services::auth::VerificationOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Startup-time configuration failures. Never produced while serving requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("invalid rule '{path}': {reason}")]
    InvalidRule { path: String, reason: &'static str },
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Wording of the `error` field in 401 bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RejectionMessages {
    pub missing: String,
    pub invalid: String,
}

impl Default for RejectionMessages {
    fn default() -> Self {
        Self {
            missing: "Missing token".to_string(),
            invalid: "Invalid token".to_string(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

/// Access gate configuration.
///
/// ```ignore
/// let config = GateConfig::new("secret")
///     .exclude(["/static"])
///     .optional([("/feed", "get")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GateConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default)]
    pub exclude: Vec<RuleSpec>,
    #[serde(default)]
    pub optional: Vec<RuleSpec>,
    #[serde(default)]
    pub verification: VerificationOptions,
    #[serde(default)]
    pub messages: RejectionMessages,
}

impl GateConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: default_algorithm(),
            exclude: Vec::new(),
            optional: Vec::new(),
            verification: VerificationOptions::default(),
            messages: RejectionMessages::default(),
        }
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn exclude<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RuleSpec>,
    {
        self.exclude.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn optional<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RuleSpec>,
    {
        self.optional.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn verification(mut self, options: VerificationOptions) -> Self {
        self.verification = options;
        self
    }

    pub fn messages(mut self, messages: RejectionMessages) -> Self {
        self.messages = messages;
        self
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub gate: GateConfig,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_env("PORT", std::env::var("PORT").ok(), 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        // PEM keys are often passed with literal "\n"
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
            .replace("\\n", "\n");

        let algorithm = std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| default_algorithm());

        let exclude = match std::env::var("AUTH_EXCLUDE") {
            Ok(v) => parse_rule_list(&v),
            Err(_) => vec![RuleSpec::from("/api/v1/health")],
        };
        let optional = parse_rule_list(&std::env::var("AUTH_OPTIONAL").unwrap_or_default());

        let leeway_seconds: u64 = parse_env(
            "AUTH_LEEWAY_SECONDS",
            std::env::var("AUTH_LEEWAY_SECONDS").ok(),
            60,
        )?;

        let verification = VerificationOptions {
            leeway_seconds,
            issuer: std::env::var("AUTH_ISSUER").ok().filter(|s| !s.is_empty()),
            audience: std::env::var("AUTH_AUDIENCE").ok().filter(|s| !s.is_empty()),
            required_claims: parse_list(
                &std::env::var("AUTH_REQUIRED_CLAIMS").unwrap_or_default(),
            ),
            ..VerificationOptions::default()
        };

        let defaults = RejectionMessages::default();
        let messages = RejectionMessages {
            missing: std::env::var("AUTH_MISSING_MESSAGE").unwrap_or(defaults.missing),
            invalid: std::env::var("AUTH_INVALID_MESSAGE").unwrap_or(defaults.invalid),
        };

        let request_timeout = Duration::from_secs(parse_env(
            "REQUEST_TIMEOUT_SECONDS",
            std::env::var("REQUEST_TIMEOUT_SECONDS").ok(),
            30,
        )?);

        let request_body_limit_bytes: usize = parse_env(
            "REQUEST_BODY_LIMIT_BYTES",
            std::env::var("REQUEST_BODY_LIMIT_BYTES").ok(),
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            gate: GateConfig {
                secret,
                algorithm,
                exclude,
                optional,
                verification,
                messages,
            },
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

/// 未設定なら default、設定されていて読めない値なら起動失敗
fn parse_env<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `"/static,/docs:get|put"` → `[PathOnly("/static"), PathWithMethod("/docs", "get|put")]`
pub fn parse_rule_list(raw: &str) -> Vec<RuleSpec> {
    parse_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once(':') {
            Some((path, method)) => {
                RuleSpec::PathWithMethod(path.trim().to_string(), method.trim().to_string())
            }
            None => RuleSpec::PathOnly(entry),
        })
        .collect()
}
