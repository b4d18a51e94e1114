//! 响应构建帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::ShortenerError;

use super::types::ErrorBody;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &ErrorBody::new(message))
}

/// 从 ShortenerError 构建错误响应，内部错误细节不返回给客户端
pub fn error_from_shortener(err: &ShortenerError) -> HttpResponse {
    error_response(err.http_status(), err.public_message())
}
