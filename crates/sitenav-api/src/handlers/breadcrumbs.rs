//! Breadcrumb trail of the caller's session

use axum::{extract::State, http::HeaderMap, Json};

use sitenav_core::domain::Crumb;

use crate::middleware::session_from_headers;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/breadcrumbs
///
/// Reads the trail without changing it; callers without a session see
/// the root crumb only.
pub async fn list_crumbs(State(state): State<AppState>, headers: HeaderMap) -> Json<ApiResponse<Vec<Crumb>>> {
    let crumbs = match session_from_headers(&headers) {
        Some(session_id) => state.breadcrumbs.crumbs(&session_id).await,
        None => state.breadcrumbs.root_crumbs(),
    };
    Json(ApiResponse::success(crumbs))
}
