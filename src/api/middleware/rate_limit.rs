//! 限流中间件
//!
//! 包在需要限流的路由外面，限流器由调用方注入，不依赖全局状态。
//! 被拒绝的请求直接返回 429，不会进入 handler。

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::api::services::types::ErrorBody;
use crate::services::{Admission, RateLimiter};
use crate::utils::ip::extract_client_id;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded";

/// 限流中间件工厂
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
    trusted_proxies: Arc<[String]>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            limiter,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    /// 对端属于这些代理时，使用转发头作为客户端标识
    pub fn with_trusted_proxies(mut self, trusted_proxies: Vec<String>) -> Self {
        self.trusted_proxies = Arc::from(trusted_proxies);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trusted_proxies: self.trusted_proxies.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
    trusted_proxies: Arc<[String]>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_id = extract_client_id(req.request(), &self.trusted_proxies);

        match self.limiter.admit(&client_id) {
            Admission::Admitted => {
                debug!("Request admitted for client {}", client_id);
                let srv = self.service.clone();
                Box::pin(async move {
                    let res = srv.call(req).await?;
                    Ok(res.map_into_left_body())
                })
            }
            Admission::Rejected { retry_after } => {
                // 向上取整，至少 1 秒
                let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                let response = HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, retry_secs.max(1).to_string()))
                    .json(ErrorBody::new(RATE_LIMIT_MESSAGE));
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}
