use newsfeed_search::config::{self, AppConfig};
use newsfeed_search::search::SearchGateway;
use newsfeed_search::storage::NewsIndex;

/// Upper bound for any requested page size / 分页大小上限
const MAX_PAGE_SIZE: usize = 100;

pub struct AppState {
    pub gateway: SearchGateway<NewsIndex>,
    pub config: AppConfig,
}

impl AppState {
    /// Captures the global config snapshot / 读取全局配置快照
    pub fn new(gateway: SearchGateway<NewsIndex>) -> Self {
        Self {
            gateway,
            config: config::config(),
        }
    }

    /// 搜索分页大小（未指定时使用配置值）
    pub fn search_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or_else(|| self.config.search.search_page_size())
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// 新闻列表分页大小
    pub fn list_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.search.page_size)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn index(&self) -> &NewsIndex {
        self.gateway.storage().as_ref()
    }
}
