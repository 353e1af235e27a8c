/*
 * Responsibility
 * - Authorization ヘッダから Bearer トークンを取り出す
 * - ヘッダ無し / 別スキーム / 空トークンは「トークン未提示」として扱う
 * - トークンの検証自体は services::auth 側の責務
 */
use axum::http::{HeaderMap, header};

/// Extract a Bearer token from request headers.
///
/// The scheme is matched case-insensitively. Everything after the scheme,
/// trimmed, is the token; a malformed token is left for the verifier to reject.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    token_from_header_value(value)
}

fn token_from_header_value(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let (scheme, rest) = value.split_once(|c: char| c.is_ascii_whitespace())?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() { None } else { Some(token) }
}
