//! CORS policy for the admin dashboard (browser client).
//!
//! - Development: any origin, without credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`. An empty
//!   allowlist allows no cross-origin callers at all.
//!
//! Bearer tokens travel in the `Authorization` header, so credentials mode is
//! never enabled.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppEnv, Config};

fn allow_origin(app_env: AppEnv, origins: &[String]) -> AllowOrigin {
    if !app_env.is_production() {
        return Any.into();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| match HeaderValue::from_str(s) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %s, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(allowed)
}

pub fn layer(app_env: AppEnv, origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(app_env, origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(60 * 10))
}

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env, &config.cors_allowed_origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(app_env: AppEnv, origins: &[&str]) -> Router {
        let origins: Vec<String> = origins.iter().map(|s| s.to_string()).collect();
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(layer(app_env, &origins))
    }

    async fn allow_origin_header(app: Router, origin: &str) -> Option<String> {
        let req = Request::builder()
            .uri("/ping")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let got = allow_origin_header(app(AppEnv::Development, &[]), "http://localhost:3001").await;
        assert_eq!(got.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn production_allows_listed_origin_only() {
        let app = || app(AppEnv::Production, &["https://admin.camihogar.com"]);

        let listed = allow_origin_header(app(), "https://admin.camihogar.com").await;
        let other = allow_origin_header(app(), "https://evil.example.com").await;

        assert_eq!(listed.as_deref(), Some("https://admin.camihogar.com"));
        assert_eq!(other, None);
    }
}
