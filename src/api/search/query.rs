use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use newsfeed_search::search::SearchPage;
use newsfeed_search::SearchError;

use super::types::*;
use crate::api::{ApiError, ApiResponse};
use crate::state::AppState;

/// 将搜索错误映射为 HTTP 响应
fn map_search_error(e: SearchError) -> ApiError {
    match e {
        SearchError::SessionNotFound(key) => {
            tracing::debug!("Search session expired: {}", key);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(404, "Search session expired, resubmit the query")),
            )
        }
        other => {
            tracing::error!("Search failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(500, "Search failed")),
            )
        }
    }
}

/// GET /api/search?q=&limit=&offset= - 搜索
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchPage>>, ApiError> {
    let limit = state.search_limit(params.limit);
    let page = state
        .gateway
        .search(&params.q, limit, params.offset)
        .await
        .map_err(map_search_error)?;
    Ok(Json(ApiResponse::success(page)))
}

/// POST /api/search/session - 注册搜索会话并返回第一页
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    if req.query.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(400, "Search query must not be empty")),
        ));
    }

    let limit = state.search_limit(req.limit);
    let key = state.gateway.register_session(&req.query);
    let (query, page) = state
        .gateway
        .search_session(&key, limit, 0)
        .await
        .map_err(map_search_error)?;

    Ok(Json(ApiResponse::success(SessionResponse {
        key,
        query,
        offset: 0,
        limit,
        page,
    })))
}

/// GET /api/search/session/:key?limit=&offset= - 按会话键翻页
pub async fn session_page(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let limit = state.search_limit(params.limit);
    let (query, page) = state
        .gateway
        .search_session(&key, limit, params.offset)
        .await
        .map_err(map_search_error)?;

    Ok(Json(ApiResponse::success(SessionResponse {
        key,
        query,
        offset: params.offset,
        limit,
        page,
    })))
}
