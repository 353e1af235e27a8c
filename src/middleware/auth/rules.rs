//! Path / method rules that decide which requests skip or relax authentication.
//!
//! Responsibility:
//! - Config 由来の `RuleSpec` を起動時に `Rule` へコンパイルする
//! - リクエストの (path, method) が RuleSet のどれかに当たるか判定する
//!
//! Path matching is prefix matching on a `/` boundary: `/static` covers
//! `/static`, `/static/` and `/static/foo/bar`, never `/staticfoo`.

use serde::Deserialize;

use crate::config::ConfigError;

/// Rule as written in configuration.
///
/// Deserializes from either `"/static"` or `["/static", "get|put"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    PathOnly(String),
    PathWithMethod(String, String),
}

impl RuleSpec {
    pub fn path(&self) -> &str {
        match self {
            Self::PathOnly(path) | Self::PathWithMethod(path, _) => path,
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(path: &str) -> Self {
        Self::PathOnly(path.to_string())
    }
}

impl From<(&str, &str)> for RuleSpec {
    fn from((path, method): (&str, &str)) -> Self {
        Self::PathWithMethod(path.to_string(), method.to_string())
    }
}

/// HTTP method constraint, normalized at configuration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    Any,
    // Alternatives from `get|put`, trimmed; compared ASCII case-insensitively.
    OneOf(Vec<String>),
}

impl MethodMatcher {
    pub fn parse(pattern: &str) -> Option<Self> {
        let alternatives = pattern
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        if alternatives.is_empty() {
            None
        } else {
            Some(Self::OneOf(alternatives))
        }
    }

    pub fn matches(&self, method: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(alternatives) => alternatives
                .iter()
                .any(|alt| alt.eq_ignore_ascii_case(method)),
        }
    }
}

/// Compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    // Stored without trailing `/`; the root rule `/` becomes "".
    base: String,
    method: MethodMatcher,
}

impl Rule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, ConfigError> {
        let path = spec.path();
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidRule {
                path: path.to_string(),
                reason: "path must start with '/'",
            });
        }

        let method = match spec {
            RuleSpec::PathOnly(_) => MethodMatcher::Any,
            RuleSpec::PathWithMethod(_, pattern) => {
                MethodMatcher::parse(pattern).ok_or_else(|| ConfigError::InvalidRule {
                    path: path.to_string(),
                    reason: "method pattern has no alternatives",
                })?
            }
        };

        Ok(Self {
            base: path.trim_end_matches('/').to_string(),
            method,
        })
    }

    pub fn matches(&self, path: &str, method: &str) -> bool {
        self.matches_path(path) && self.method.matches(method)
    }

    fn matches_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, ConfigError> {
        let rules = specs.iter().map(Rule::compile).collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Any rule matching both path and method wins.
    pub fn matches(&self, path: &str, method: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path, method))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
