//! News storage - retrieval primitives the search gateway builds on / 新闻存储
//!
//! Storage only exposes primitives (probe, count, fetch page); parsing,
//! rendering and paging decisions stay in the search gateway.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::render::LikeClause;
use crate::search::schema::NewsRecord;

pub mod db_index;
pub mod schema;

pub use db_index::NewsIndex;

/// A rendered query, one variant per backend / 渲染后的查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedQuery {
    /// FTS5 MATCH expression / 全文索引表达式
    Fts(String),
    /// Substring fallback WHERE clause / LIKE 回退条件
    Like(LikeClause),
}

/// Storage interface (primitive operations only) / 存储接口
#[async_trait]
pub trait NewsStorage: Send + Sync {
    /// Whether the full-text index is usable. Probed once at start-up and
    /// fixed for the lifetime of the storage value / 全文索引是否可用
    fn probe_capability(&self) -> bool;

    /// Count records matching the query / 统计匹配数
    async fn count(&self, query: &RenderedQuery) -> Result<i64>;

    /// One page of matching records, newest first / 分页获取匹配记录
    async fn fetch_page(
        &self,
        query: &RenderedQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<NewsRecord>>;
}
