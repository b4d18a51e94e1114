//! `GET /api/links/{short_id}`

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::error;

use crate::errors::ShortenerError;
use crate::services::LinkService;
use crate::utils::is_valid_short_code;

use super::helpers::{error_from_shortener, json_response};
use super::types::LinkResponse;

pub struct LinkLookupService;

impl LinkLookupService {
    pub async fn get_link(
        path: web::Path<String>,
        link_service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let short_id = path.into_inner();

        if !is_valid_short_code(&short_id) {
            return error_from_shortener(&ShortenerError::not_found(short_id));
        }

        match link_service.resolve(&short_id).await {
            Ok(mapping) => json_response(StatusCode::OK, &LinkResponse::from(mapping)),
            Err(e) => {
                if matches!(e, ShortenerError::Internal(_)) {
                    error!("Store error during link lookup: {}", e);
                }
                error_from_shortener(&e)
            }
        }
    }
}

pub fn links_resource() -> actix_web::Resource {
    web::resource("/links/{short_id}").route(web::get().to(LinkLookupService::get_link))
}
