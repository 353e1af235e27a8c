/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: Access gate (除外/任意ルール + Bearer 検証)
 * - http: request id / trace / body limit / timeout
 */
pub mod auth;
pub mod bearer_auth;
pub mod http;
