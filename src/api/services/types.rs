//! API 请求/响应类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::UrlMapping;

/// 错误响应体：`{"error": "..."}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// `POST /api/shorten` 成功响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/links/{short_id}` 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinkResponse {
    pub short_id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<UrlMapping> for LinkResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            short_id: mapping.short_id,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
        }
    }
}

/// `GET /test` 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /health` 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
    pub storage_backend: String,
    pub links_count: Option<usize>,
    pub rate_limited_clients: usize,
}
