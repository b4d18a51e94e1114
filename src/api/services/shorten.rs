//! `POST /api/shorten` 创建短链接

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::ShortenerError;
use crate::services::LinkService;

use super::helpers::{error_from_shortener, error_response, json_response};
use super::types::ShortenResponse;

pub const MISSING_LONG_URL_MESSAGE: &str = "Missing long_url parameter";

/// 短链接前缀；`None` 表示从请求推断
#[derive(Clone, Debug, Default)]
pub struct ShortUrlBase(pub Option<String>);

pub struct ShortenService;

impl ShortenService {
    pub async fn shorten(
        req: HttpRequest,
        body: web::Bytes,
        link_service: web::Data<Arc<LinkService>>,
        base: web::Data<ShortUrlBase>,
    ) -> impl Responder {
        // 无法解析的 body 和缺少字段一样处理
        let payload: Option<Value> = serde_json::from_slice(&body).ok();
        let Some(long_url) = payload.as_ref().and_then(|v| v.get("long_url")) else {
            debug!("Missing long_url in request");
            return error_response(StatusCode::BAD_REQUEST, MISSING_LONG_URL_MESSAGE);
        };

        // long_url 不是字符串时按格式错误处理
        let Some(long_url) = long_url.as_str() else {
            debug!("Non-string long_url: {}", long_url);
            return error_from_shortener(&ShortenerError::invalid_url("long_url is not a string"));
        };

        match link_service.allocate(long_url).await {
            Ok(mapping) => {
                let short_url = compose_short_url(base.0.as_deref(), &req, &mapping.short_id);
                info!("Created shortened URL: {}", short_url);
                json_response(
                    StatusCode::CREATED,
                    &ShortenResponse {
                        short_url,
                        original_url: mapping.original_url,
                        created_at: mapping.created_at,
                    },
                )
            }
            Err(e @ ShortenerError::InvalidUrl(_)) => error_from_shortener(&e),
            Err(e) => {
                error!("Error processing shorten request: {}", e);
                error_from_shortener(&e)
            }
        }
    }
}

/// 拼接短链接：配置的 base_url 优先，否则使用请求的 scheme + host
pub fn compose_short_url(base_url: Option<&str>, req: &HttpRequest, short_id: &str) -> String {
    let base = match base_url {
        Some(base) => base.to_string(),
        None => {
            let conn = req.connection_info();
            format!("{}://{}/", conn.scheme(), conn.host())
        }
    };

    if base.ends_with('/') {
        format!("{}{}", base, short_id)
    } else {
        format!("{}/{}", base, short_id)
    }
}

/// Shorten 路由配置
pub fn shorten_resource() -> actix_web::Resource {
    web::resource("/shorten").route(web::post().to(ShortenService::shorten))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_compose_with_configured_base() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(
            compose_short_url(Some("https://sho.rt/s"), &req, "abc123"),
            "https://sho.rt/s/abc123"
        );
        assert_eq!(
            compose_short_url(Some("https://sho.rt/s/"), &req, "abc123"),
            "https://sho.rt/s/abc123"
        );
    }

    #[test]
    fn test_compose_infers_from_host() {
        let req = TestRequest::default()
            .insert_header(("host", "links.example.org:5001"))
            .to_http_request();
        assert_eq!(
            compose_short_url(None, &req, "abc123"),
            "http://links.example.org:5001/abc123"
        );
    }
}
