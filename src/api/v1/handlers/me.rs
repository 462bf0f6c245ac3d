/*
 * Responsibility
 * - GET /me: 認証済みユーザーの role / permissions (dashboard のメニュー制御用)
 * - GET /me/authorize?permission=: 任意の permission 名を evaluate した結果を返す
 * - どちらも認証のみ必要 (permission guard なし)
 */
use axum::Json;

use crate::{
    api::v1::{
        dto::me::{AuthorizeQuery, AuthorizeResponse, MeResponse},
        extractors::{ApiQuery, AuthCtxExtractor},
    },
    error::AppError,
    services::authz::{PermissionRequirement, SUPER_ADMINISTRATOR_ROLE, evaluate},
};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    let claims = &ctx.claims;

    Json(MeResponse {
        user_id: ctx.user_id,
        role: claims.role().map(str::to_string),
        permissions: claims
            .sorted_permissions()
            .into_iter()
            .map(str::to_string)
            .collect(),
        is_super_administrator: claims.role() == Some(SUPER_ADMINISTRATOR_ROLE),
    })
}

pub async fn authorize(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiQuery(query): ApiQuery<AuthorizeQuery>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let requirement = PermissionRequirement::try_new(query.permission)?;
    let decision = evaluate(&requirement, Some(&ctx.claims));

    Ok(Json(AuthorizeResponse {
        permission: requirement.permission().to_string(),
        granted: decision.is_succeed(),
    }))
}
