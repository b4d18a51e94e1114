//! Short id allocation and lookup
//!
//! The HTTP handlers only talk to the mapping store through this service.

use std::sync::Arc;

use tracing::{debug, error, info, trace};

use crate::config::ShortenerConfig;
use crate::errors::{Result, ShortenerError};
use crate::storage::{LinkStore, UrlMapping};
use crate::utils::{generate_random_code, is_reserved_short_code};
use crate::utils::url_validator::validate_url;

/// Service for allocating and resolving short ids
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    code_length: usize,
    max_attempts: u32,
}

impl LinkService {
    /// Create a new LinkService instance
    pub fn new(store: Arc<dyn LinkStore>, code_length: usize, max_attempts: u32) -> Self {
        Self {
            store,
            code_length,
            max_attempts,
        }
    }

    pub fn from_config(store: Arc<dyn LinkStore>, config: &ShortenerConfig) -> Self {
        Self::new(store, config.code_length, config.max_attempts)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Validate `long_url`, pick an unused short id and record the mapping.
    ///
    /// Candidates are drawn at random until the store accepts one. The loop
    /// gives up after `max_attempts` collisions and reports an internal
    /// error, which only happens when the keyspace is close to full.
    pub async fn allocate(&self, long_url: &str) -> Result<UrlMapping> {
        validate_url(long_url).map_err(|e| {
            debug!("Rejected long URL {:?}: {}", long_url, e);
            ShortenerError::invalid_url(e.to_string())
        })?;

        for attempt in 1..=self.max_attempts {
            let code = generate_random_code(self.code_length);
            if is_reserved_short_code(&code) {
                trace!("Generated reserved short id {}, retrying", code);
                continue;
            }
            let candidate = UrlMapping::new(code, long_url);

            let inserted = self.store.insert_if_absent(&candidate).await.map_err(|e| {
                error!("Store error while allocating short id: {}", e);
                ShortenerError::internal(e.message())
            })?;

            if inserted {
                info!(
                    "Created short id {} -> {} (attempt {})",
                    candidate.short_id, candidate.original_url, attempt
                );
                return Ok(candidate);
            }

            trace!("Short id collision on {}, retrying", candidate.short_id);
        }

        error!(
            "No free short id of length {} after {} attempts ({} links stored)",
            self.code_length,
            self.max_attempts,
            self.store.count().await.unwrap_or_default()
        );
        Err(ShortenerError::internal(format!(
            "short id space exhausted after {} attempts",
            self.max_attempts
        )))
    }

    /// Look up the mapping for `short_id`
    pub async fn resolve(&self, short_id: &str) -> Result<UrlMapping> {
        match self.store.get(short_id).await {
            Ok(Some(mapping)) => Ok(mapping),
            Ok(None) => Err(ShortenerError::not_found(format!(
                "Short id '{}' not found",
                short_id
            ))),
            Err(e) => {
                error!("Store error while resolving {}: {}", short_id, e);
                Err(ShortenerError::internal(e.message()))
            }
        }
    }

    /// Number of live mappings
    pub async fn count(&self) -> Result<usize> {
        self.store
            .count()
            .await
            .map_err(|e| ShortenerError::internal(e.message()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
