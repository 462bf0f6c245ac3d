/*
 * Responsibility
 * - /users 系 CRUD handler (permission guard は routes 側で宣言)
 * - Path/Json を extractor で受け、DTO validation → repo 呼び出し
 * - users は UUID をそのまま扱う (復号化なし)
 * - "Super Administrator" role を付与できるのは Super Administrator 本人だけ
 */
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            pagination::Pagination,
            users::{CreateUserRequest, UpdateUserRequest, UserResponse, normalize_email},
        },
        extractors::{ApiJson, ApiPath, ApiQuery, AuthCtx, AuthCtxExtractor},
    },
    error::AppError,
    repos::user_repo::{self, NewUser, UserChanges},
    services::authz::SUPER_ADMINISTRATOR_ROLE,
    state::AppState,
};

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message)
}

// The bypass role can only be handed out by a caller who already holds it.
fn ensure_role_assignable(ctx: &AuthCtx, role: &str) -> Result<(), AppError> {
    let caller_role = ctx.claims.role();
    if role.trim() == SUPER_ADMINISTRATOR_ROLE && caller_role != Some(SUPER_ADMINISTRATOR_ROLE) {
        tracing::warn!(
            user_id = %ctx.user_id,
            role = ?caller_role,
            "super administrator role assignment denied"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db, page.limit(), page.offset()).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    ensure_role_assignable(&ctx, &req.role)?;
    req.validate().map_err(invalid)?;

    let email = normalize_email(&req.email);
    let row = user_repo::create(
        &state.db,
        NewUser {
            user_name: req.user_name.trim(),
            email: &email,
            role: req.role.trim(),
            phone: req.phone.as_deref(),
        },
    )
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict { .. } => AppError::conflict("EMAIL_TAKEN", "email already in use"),
        other => other,
    })?;

    tracing::info!(created_by = %ctx.user_id, user_id = %row.id, role = %row.role, "user created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::get(&state.db, user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(role) = req.role.as_deref() {
        ensure_role_assignable(&ctx, role)?;
    }
    req.validate().map_err(invalid)?;

    let email = req.email.as_deref().map(normalize_email);
    let changes = UserChanges {
        user_name: req.user_name.as_deref().map(str::trim),
        email: email.as_deref(),
        role: req.role.as_deref().map(str::trim),
        phone: req.phone.as_ref().map(|inner| inner.as_deref()),
        is_active: req.is_active,
    };

    let row = user_repo::update(&state.db, user_id, changes)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict { .. } => AppError::conflict("EMAIL_TAKEN", "email already in use"),
            other => other,
        })?
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(updated_by = %ctx.user_id, user_id = %row.id, "user updated");

    Ok(Json(row.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if user_id == ctx.user_id {
        return Err(AppError::conflict("SELF_DELETE", "cannot delete your own user"));
    }

    if !user_repo::delete(&state.db, user_id).await? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(deleted_by = %ctx.user_id, user_id = %user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
