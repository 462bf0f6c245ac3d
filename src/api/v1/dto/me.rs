use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub is_super_administrator: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub permission: String,
    pub granted: bool,
}
