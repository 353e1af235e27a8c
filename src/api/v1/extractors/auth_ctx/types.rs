/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - 除外ルール/任意ルールで素通りしたリクエストには AuthCtx は入らない
 */
use serde_json::Value;

use crate::services::auth::Claims;

/// 検証済みトークンの payload
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCtx {
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }
}
