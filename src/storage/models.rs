use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short id → long URL mapping.
///
/// Created once by the allocator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub short_id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    pub fn new(short_id: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            original_url: original_url.into(),
            created_at: Utc::now(),
        }
    }
}
