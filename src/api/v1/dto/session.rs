use serde::Serialize;

use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: Option<String>,
    pub claims: Claims,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub authenticated: bool,
    pub viewer: Option<String>,
}
