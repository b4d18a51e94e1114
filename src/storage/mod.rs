use async_trait::async_trait;

use crate::errors::Result;

pub mod memory;
pub mod models;

pub use memory::MemoryLinkStore;
pub use models::UrlMapping;

/// 短码映射存储
///
/// `insert_if_absent` 必须在一个临界区内完成“检查 + 插入”，
/// 两个并发分配永远不能拿到同一个 key。
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 插入映射；key 已存在时返回 `Ok(false)` 且不修改原值
    async fn insert_if_absent(&self, mapping: &UrlMapping) -> Result<bool>;

    async fn get(&self, short_id: &str) -> Result<Option<UrlMapping>>;

    async fn count(&self) -> Result<usize>;

    fn backend_name(&self) -> &'static str;
}
