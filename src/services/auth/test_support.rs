//! Token minting helpers for tests (HS256 shared secret).
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;

use super::AuthService;

pub const TEST_ISSUER: &str = "https://auth.camihogar.test";
pub const TEST_AUDIENCE: &str = "camihogar-api";
const TEST_SECRET: &[u8] = b"camihogar-test-secret";

pub fn test_auth_service() -> AuthService {
    AuthService::with_key(
        DecodingKey::from_secret(TEST_SECRET),
        Algorithm::HS256,
        TEST_ISSUER,
        TEST_AUDIENCE,
        0,
    )
}

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

pub fn mint<T: Serialize>(claims: &T) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("encode test token")
}

/// Signed token for `sub` with the given role and permissions.
pub fn mint_for(sub: uuid::Uuid, role: Option<&str>, permissions: &[&str]) -> String {
    let mut claims = serde_json::json!({
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "sub": sub.to_string(),
        "exp": now() + 3600,
        "iat": now(),
        "permissions": permissions,
    });
    if let Some(role) = role {
        claims["role"] = serde_json::json!(role);
    }
    mint(&claims)
}
