//! Permission guard: 操作ごとに宣言した PermissionRequirement を評価する
//!
//! - route 単位で `guarded(get(handler), permissions::USERS_READ)` のように宣言する
//! - 判定は services::authz::evaluate に委譲 (principal 無し / 権限不足はどちらも 403)
//! - 同じ path でも method ごとに別の permission を要求できる (`MethodRouter::merge`)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::authz::{Decision, PermissionRequirement, evaluate};

/// Attaches a permission requirement to every handler in `route`.
pub fn guarded<S>(route: MethodRouter<S>, requirement: PermissionRequirement) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(requirement, permission_guard))
}

async fn permission_guard(
    State(requirement): State<PermissionRequirement>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req.extensions().get::<AuthCtx>();
    let decision = evaluate(&requirement, ctx.map(|c| &c.claims));

    match decision {
        Decision::Succeed => {
            tracing::debug!(
                user_id = ?ctx.map(|c| c.user_id),
                permission = %requirement,
                "permission granted"
            );
        }
        Decision::Fail => {
            tracing::warn!(
                user_id = ?ctx.map(|c| c.user_id),
                role = ?ctx.and_then(|c| c.claims.role()),
                permission = %requirement,
                decision = decision.as_str(),
                method = %req.method(),
                path = %req.uri().path(),
                "permission denied"
            );
            return Err(AppError::Forbidden);
        }
    }

    Ok(next.run(req).await)
}
