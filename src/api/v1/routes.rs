/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証不要 (health) と認証必須 (それ以外) を分け、認証必須側に access middleware を掛ける
 * - 各操作に必要な permission はここで宣言する (guarded + permissions catalog)
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    api::v1::handlers::{
        exchange_rates::{create_rate, get_rate, list_active_rates, rate_history},
        health::{health, ready},
        me::{authorize, me},
        users::{create_user, delete_user, get_user, list_users, update_user},
    },
    middleware::auth::{access, permission::guarded},
    services::authz::permissions,
    state::AppState,
};

fn protected_routes() -> Router<AppState> {
    Router::new()
        // authenticated only
        .route("/me", get(me))
        .route("/me/authorize", get(authorize))
        // users
        .route(
            "/users",
            guarded(get(list_users), permissions::USERS_READ)
                .merge(guarded(post(create_user), permissions::USERS_CREATE)),
        )
        .route(
            "/users/{user_id}",
            guarded(get(get_user), permissions::USERS_READ)
                .merge(guarded(put(update_user), permissions::USERS_UPDATE))
                .merge(guarded(delete(delete_user), permissions::USERS_DELETE)),
        )
        // exchange rates
        .route(
            "/exchange-rates",
            guarded(get(list_active_rates), permissions::EXCHANGE_RATES_READ)
                .merge(guarded(post(create_rate), permissions::EXCHANGE_RATES_CREATE)),
        )
        .route(
            "/exchange-rates/history",
            guarded(get(rate_history), permissions::EXCHANGE_RATES_READ),
        )
        .route(
            "/exchange-rates/{rate_id}",
            guarded(get(get_rate), permissions::EXCHANGE_RATES_READ),
        )
}

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready));

    public.merge(access::apply(protected_routes(), state))
}
