//! Route groups and the assembled application router.

mod common;
mod demons;
pub use common::common_routes;
pub use demons::demon_routes;

use crate::config::ServerConfig;
use crate::rate_limit::{limit_rate, RateLimiter};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::http::{HeaderValue, Method};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Open cross-origin policy limited to the read and create methods.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// All routes plus the per-client rate ceiling, CORS, hardening headers, body limit and
/// request tracing. Serve with connect info so clients are told apart by address.
pub fn app_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(demon_routes(state));
    if let Some(limiter) = RateLimiter::per_minute(config.rate_limit_per_minute) {
        router = router.layer(middleware::from_fn_with_state(Arc::new(limiter), limit_rate));
    }
    router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
