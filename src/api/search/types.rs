use serde::{Deserialize, Serialize};

use newsfeed_search::search::SearchPage;

/// GET /api/search 查询参数
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

/// 分页参数
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

/// 创建搜索会话请求
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// 搜索会话响应：会话键 + 规范化查询 + 当前页
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub key: String,
    pub query: String,
    pub offset: usize,
    pub limit: usize,
    pub page: SearchPage,
}
