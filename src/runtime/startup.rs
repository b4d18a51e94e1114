use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::api::services::ApiState;
use crate::config::StaticConfig;
use crate::services::{LinkService, RateLimiter};
use crate::storage::{LinkStore, MemoryLinkStore};

pub struct StartupContext {
    pub link_service: Arc<LinkService>,
    pub limiter: Arc<RateLimiter>,
    pub api_state: ApiState,
}

/// Prepare the server startup context
///
/// The store and the limiter are created here and nowhere else; handlers only
/// see them through the injected `ApiState`.
pub fn prepare_server_startup(config: &StaticConfig) -> StartupContext {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store: Arc<dyn LinkStore> = Arc::new(MemoryLinkStore::new());
    info!("Using storage backend: {}", store.backend_name());

    let link_service = Arc::new(LinkService::from_config(store, &config.shortener));
    let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
    info!(
        "Rate limit: {} requests per {:?} per client",
        limiter.max_requests(),
        Duration::from_secs(config.rate_limit.window_secs)
    );

    match &config.shortener.base_url {
        Some(base) => info!("Short URLs use configured base: {}", base),
        None => info!("Short URLs use the request host as base"),
    }

    let api_state = ApiState::from_config(link_service.clone(), limiter.clone(), config);

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    StartupContext {
        link_service,
        limiter,
        api_state,
    }
}
