//! Reverse proxy in front of the user and chat services.
//!
//! `/api/user…` goes to the user service and `/api/chat…` to the chat
//! service, each call bounded by the upstream timeout. Every client IP gets
//! its own request budget.

mod limit;
mod proxy;

use axum::{Router, extract::FromRef, middleware, routing::any};

use crate::config::GatewayConfig;

pub use limit::RateLimiter;

#[derive(Clone, FromRef)]
pub struct GatewayState {
    pub http_client: reqwest::Client,
    pub upstreams: Upstreams,
    pub limiter: RateLimiter,
}

#[derive(Clone)]
pub struct Upstreams {
    pub user_service_url: String,
    pub chat_service_url: String,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> reqwest::Result<Self> {
        Ok(Self {
            http_client: reqwest::Client::builder()
                .timeout(config.upstream_timeout)
                .build()?,
            upstreams: Upstreams {
                user_service_url: config.user_service_url.trim_end_matches('/').to_owned(),
                chat_service_url: config.chat_service_url.trim_end_matches('/').to_owned(),
            },
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window),
        })
    }
}

pub fn router(limiter: RateLimiter) -> Router<GatewayState> {
    Router::new()
        .route("/api/user", any(proxy::forward_user))
        .route("/api/user/{*rest}", any(proxy::forward_user))
        .route("/api/chat", any(proxy::forward_chat))
        .route("/api/chat/{*rest}", any(proxy::forward_chat))
        .route_layer(middleware::from_fn_with_state(limiter, limit::rate_limit))
}

/// The complete gateway.
pub fn service(state: GatewayState) -> Router {
    crate::finish(router(state.limiter.clone()).with_state(state))
}
