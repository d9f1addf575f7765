//! Search gateway - parse, render, page through storage / 搜索网关
//!
//! Architecture principle: the gateway controls flow, storage only provides
//! primitives (count, fetch page) / 架构原则
//! - search: raw text -> AST -> rendered query -> count + page / 搜索
//! - register_session / resolve_session: opaque keys for pagination / 会话

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::storage::{NewsStorage, RenderedQuery};

use super::parser::parse_user_query;
use super::render::{build_fts_query, build_like_clause};
use super::schema::{Node, SearchPage};
use super::session::{normalize_query, session_key, SessionStore};

/// Columns searched by the substring fallback
const TITLE_COLUMN: &str = "title";
const BODY_COLUMN: &str = "summary";

/// Search gateway / 搜索网关
///
/// The renderer is chosen once, from the capability the storage advertised
/// when the gateway was built.
pub struct SearchGateway<S: NewsStorage> {
    storage: Arc<S>,
    sessions: Arc<dyn SessionStore>,
    use_fts: bool,
}

impl<S: NewsStorage> SearchGateway<S> {
    pub fn new(storage: Arc<S>, sessions: Arc<dyn SessionStore>) -> Self {
        let use_fts = storage.probe_capability();
        tracing::info!(
            "Search gateway ready ({})",
            if use_fts { "fts5 index" } else { "substring fallback" }
        );
        Self { storage, sessions, use_fts }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn uses_fts(&self) -> bool {
        self.use_fts
    }

    /// Render an AST for the active backend / 按后端渲染查询
    pub fn render(&self, ast: &Node) -> RenderedQuery {
        if self.use_fts {
            RenderedQuery::Fts(build_fts_query(ast))
        } else {
            RenderedQuery::Like(build_like_clause(ast, TITLE_COLUMN, BODY_COLUMN))
        }
    }

    /// Search one page / 搜索一页
    ///
    /// Input that parses to nothing returns an empty page without touching
    /// storage; a valid query with no matches still runs both storage calls.
    pub async fn search(&self, raw: &str, limit: usize, offset: usize) -> Result<SearchPage> {
        let ast = match parse_user_query(raw) {
            Some(ast) => ast,
            None => {
                tracing::debug!("Nothing to search for in {:?}", raw);
                return Ok(SearchPage::nothing_to_search());
            }
        };

        let query = self.render(&ast);
        tracing::debug!("Rendered query: {:?}", query);

        let total = self.storage.count(&query).await?;
        let records = self.storage.fetch_page(&query, limit, offset).await?;

        Ok(SearchPage { records, total, parsed: true })
    }

    /// Remember the normalized query under a short key / 注册搜索会话
    pub fn register_session(&self, raw: &str) -> String {
        let normalized = normalize_query(raw);
        let key = session_key(&normalized);
        self.sessions.insert(key.clone(), normalized);
        tracing::debug!("Search session registered: {}", key);
        key
    }

    /// Look up a session key / 查询搜索会话
    pub fn resolve_session(&self, key: &str) -> Option<String> {
        let query = self.sessions.get(key);
        if query.is_none() {
            tracing::debug!("Search session miss: {}", key);
        }
        query
    }

    /// Resolve a key, then search with its query / 按会话键分页搜索
    pub async fn search_session(
        &self,
        key: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(String, SearchPage)> {
        let query = self
            .resolve_session(key)
            .ok_or_else(|| SearchError::SessionNotFound(key.to_string()))?;
        let page = self.search(&query, limit, offset).await?;
        Ok((query, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::schema::{NewsItem, NewsRecord};
    use crate::search::session::MemorySessionStore;
    use crate::storage::NewsIndex;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Storage stub recording every call
    struct RecordingStorage {
        fts: bool,
        calls: Mutex<Vec<RenderedQuery>>,
    }

    impl RecordingStorage {
        fn new(fts: bool) -> Self {
            Self { fts, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl NewsStorage for RecordingStorage {
        fn probe_capability(&self) -> bool {
            self.fts
        }

        async fn count(&self, query: &RenderedQuery) -> Result<i64> {
            self.calls.lock().push(query.clone());
            Ok(0)
        }

        async fn fetch_page(
            &self,
            query: &RenderedQuery,
            _limit: usize,
            _offset: usize,
        ) -> Result<Vec<NewsRecord>> {
            self.calls.lock().push(query.clone());
            Ok(Vec::new())
        }
    }

    fn gateway<S: NewsStorage>(storage: S) -> SearchGateway<S> {
        SearchGateway::new(Arc::new(storage), Arc::new(MemorySessionStore::new(64, 3600)))
    }

    #[tokio::test]
    async fn test_empty_query_skips_storage() {
        let gw = gateway(RecordingStorage::new(true));
        for raw in ["", "   ", "NOT", "+ - |"] {
            let page = gw.search(raw, 10, 0).await.unwrap();
            assert!(!page.parsed);
            assert_eq!(page.total, 0);
            assert!(page.records.is_empty());
        }
        assert!(gw.storage().calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_zero_matches_hits_storage() {
        let gw = gateway(RecordingStorage::new(true));
        let page = gw.search("nothing", 10, 0).await.unwrap();
        assert!(page.parsed);
        assert_eq!(page.total, 0);
        assert_eq!(gw.storage().calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_renderer_follows_capability() {
        let gw = gateway(RecordingStorage::new(true));
        gw.search("cat -war", 10, 0).await.unwrap();
        assert_eq!(
            gw.storage().calls.lock()[0],
            RenderedQuery::Fts("cat NOT (war)".to_string())
        );

        let gw = gateway(RecordingStorage::new(false));
        gw.search("cat", 10, 0).await.unwrap();
        let calls = gw.storage().calls.lock();
        match &calls[0] {
            RenderedQuery::Like(clause) => assert_eq!(clause.params, vec!["%cat%", "%cat%"]),
            other => panic!("expected LIKE query, got {:?}", other),
        };
    }

    #[tokio::test]
    async fn test_sessions() {
        let gw = gateway(RecordingStorage::new(true));
        let key = gw.register_session("  Cat OR Dog ");
        assert_eq!(key, gw.register_session("cat or dog"));
        assert_eq!(gw.resolve_session(&key).as_deref(), Some("cat or dog"));
        assert_eq!(gw.resolve_session("deadbeef"), None);

        let err = gw.search_session("deadbeef", 10, 0).await.unwrap_err();
        assert!(matches!(err, SearchError::SessionNotFound(ref k) if k == "deadbeef"));

        let (query, page) = gw.search_session(&key, 10, 0).await.unwrap();
        assert_eq!(query, "cat or dog");
        assert!(page.parsed);
    }

    fn news(id: u32, title: &str) -> NewsItem {
        NewsItem {
            source: "wire".to_string(),
            title: title.to_string(),
            link: format!("https://example.org/{}", id),
            published: None,
            summary: None,
            hash: format!("h{}", id),
        }
    }

    #[tokio::test]
    async fn test_search_against_sqlite_both_backends() {
        for fts in [true, false] {
            let index = NewsIndex::in_memory(fts).await.unwrap();
            index
                .insert_many(&[
                    news(1, "Election results"),
                    news(2, "Storm warning"),
                    news(3, "Election storm"),
                    news(4, "Market update"),
                ])
                .await
                .unwrap();
            let gw = gateway(index);
            assert_eq!(gw.uses_fts(), fts);

            let page = gw.search("election OR market", 2, 0).await.unwrap();
            assert_eq!(page.total, 3);
            let titles: Vec<_> = page.records.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(titles, vec!["Market update", "Election storm"]);

            let page = gw.search("election OR market", 2, 2).await.unwrap();
            assert_eq!(page.records.len(), 1);
            assert_eq!(page.records[0].title, "Election results");

            let page = gw.search("election storm", 10, 0).await.unwrap();
            assert_eq!(page.total, 1);

            let page = gw.search("weather", 10, 0).await.unwrap();
            assert!(page.parsed);
            assert_eq!(page.total, 0);
            assert!(page.records.is_empty());
        }
    }
}
