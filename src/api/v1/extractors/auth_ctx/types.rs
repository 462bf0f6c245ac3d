/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler / permission guard はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - 認可判定 (role / permissions) は services::authz に claims をそのまま渡す
 */

use uuid::Uuid;

use crate::services::{auth::VerifiedAccessToken, authz::PrincipalClaims};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は内部ユーザーID (token の `sub`)
/// - `claims` は role / permissions (permission guard が参照)
/// - `jti` は監査/相関用
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub jti: Option<String>,
    pub claims: PrincipalClaims,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, claims: PrincipalClaims) -> Self {
        Self {
            user_id,
            jti: None,
            claims,
        }
    }
}

impl From<VerifiedAccessToken> for AuthCtx {
    fn from(token: VerifiedAccessToken) -> Self {
        Self {
            jti: token.jti,
            ..Self::new(token.user_id, token.claims)
        }
    }
}
