use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use newsfeed_search::search::{NewsRecord, SourceCount};

use crate::api::{ApiError, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub records: Vec<NewsRecord>,
    pub total: i64,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: i64,
    pub sources: Vec<SourceCount>,
}

fn internal_error(e: newsfeed_search::SearchError) -> ApiError {
    tracing::error!("News query failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(500, "News query failed")),
    )
}

/// GET /api/news/latest - 最新新闻分页
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LatestParams>,
) -> Result<Json<ApiResponse<LatestResponse>>, ApiError> {
    let limit = state.list_limit(params.limit);
    let index = state.index();
    let records = index
        .latest_page(params.offset, limit)
        .await
        .map_err(internal_error)?;
    let total = index.total().await.map_err(internal_error)?;

    Ok(Json(ApiResponse::success(LatestResponse {
        records,
        total,
        offset: params.offset,
        limit,
    })))
}

/// GET /api/news/stats - 按来源统计
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let index = state.index();
    let sources = index.count_by_source().await.map_err(internal_error)?;
    let total = index.total().await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(StatsResponse { total, sources })))
}
