use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use std::sync::Arc;
use tracing::{error, trace};

use crate::services::{LinkService, RateLimiter};

use super::helpers::json_response;
use super::types::{HealthResponse, MessageResponse};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl Default for AppStartTime {
    fn default() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    /// 简单存活检查
    pub async fn ping() -> impl Responder {
        json_response(
            StatusCode::OK,
            &MessageResponse {
                message: "Server is working".to_string(),
            },
        )
    }

    pub async fn health_check(
        link_service: web::Data<Arc<LinkService>>,
        limiter: web::Data<Arc<RateLimiter>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let links_count = match link_service.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                error!("Storage health check failed: {}", e);
                None
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let (status, code) = if links_count.is_some() {
            ("healthy", StatusCode::OK)
        } else {
            ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
        };

        json_response(
            code,
            &HealthResponse {
                status: status.to_string(),
                timestamp: now,
                uptime,
                storage_backend: link_service.backend_name().to_string(),
                links_count,
                rate_limited_clients: limiter.tracked_clients(),
            },
        )
    }
}

/// Health 路由配置
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/test", web::get().to(HealthService::ping))
        .route("/health", web::get().to(HealthService::health_check));
}
