pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod shorten;
pub mod types;

use std::sync::Arc;

use actix_web::web;

pub use health::{AppStartTime, HealthService, health_routes};
pub use links::{LinkLookupService, links_resource};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{ShortUrlBase, ShortenService, compose_short_url, shorten_resource};

use crate::api::middleware::RateLimitMiddleware;
use crate::config::StaticConfig;
use crate::services::{LinkService, RateLimiter};

/// HTTP 层依赖的全部状态，启动时构建一次，每个 worker 克隆一份
#[derive(Clone)]
pub struct ApiState {
    pub link_service: Arc<LinkService>,
    pub limiter: Arc<RateLimiter>,
    pub base: ShortUrlBase,
    pub trusted_proxies: Vec<String>,
    pub start_time: AppStartTime,
}

impl ApiState {
    pub fn new(link_service: Arc<LinkService>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            link_service,
            limiter,
            base: ShortUrlBase::default(),
            trusted_proxies: Vec::new(),
            start_time: AppStartTime::default(),
        }
    }

    pub fn from_config(
        link_service: Arc<LinkService>,
        limiter: Arc<RateLimiter>,
        config: &StaticConfig,
    ) -> Self {
        Self {
            base: ShortUrlBase(config.shortener.base_url.clone()),
            trusted_proxies: config.server.trusted_proxies.clone(),
            ..Self::new(link_service, limiter)
        }
    }
}

/// 注册全部路由
///
/// 顺序很重要：`/api`、`/test`、`/health` 必须先于短码通配路由注册。
pub fn app_routes(state: ApiState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let rate_limit = RateLimitMiddleware::new(state.limiter.clone())
            .with_trusted_proxies(state.trusted_proxies.clone());

        cfg.app_data(web::Data::new(state.link_service))
            .app_data(web::Data::new(state.limiter))
            .app_data(web::Data::new(state.base))
            .app_data(web::Data::new(state.start_time))
            .service(
                web::scope("/api")
                    .service(shorten_resource().wrap(rate_limit))
                    .service(links_resource()),
            )
            .configure(health_routes)
            .service(redirect_routes());
    }
}
