use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::errors::ShortenerError;
use crate::services::LinkService;
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        link_service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let short_id = path.into_inner();

        if !is_valid_short_code(&short_id) {
            // 非法短码，直接 404（不查存储）
            trace!("Invalid short code rejected: {}", &short_id);
            return Self::not_found_response();
        }

        match link_service.resolve(&short_id).await {
            Ok(mapping) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                .insert_header(("Location", mapping.original_url))
                .finish(),
            Err(ShortenerError::NotFound(_)) => {
                debug!("Redirect link not found: {}", &short_id);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Store error during redirect lookup: {}", e);
                HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .body("Internal Server Error")
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Not Found")
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{short_id}", web::get().to(RedirectService::handle_redirect))
        .route("/{short_id}", web::head().to(RedirectService::handle_redirect))
}
