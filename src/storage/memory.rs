use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{LinkStore, UrlMapping};
use crate::errors::Result;

/// Process-local store, lost on restart. Entries are never evicted.
#[derive(Default)]
pub struct MemoryLinkStore {
    inner: DashMap<String, UrlMapping>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert_if_absent(&self, mapping: &UrlMapping) -> Result<bool> {
        // entry() holds the shard write lock until the insert is done
        match self.inner.entry(mapping.short_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
                Ok(true)
            }
        }
    }

    async fn get(&self, short_id: &str) -> Result<Option<UrlMapping>> {
        Ok(self.inner.get(short_id).map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
