// ============================================================================
// Sitenav API - Menu Handlers
// File: crates/sitenav-api/src/handlers/menu.rs
// ============================================================================
//! Renders a menu group for a given page path

use axum::{
    extract::{Path, Query, State},
    http::{header::HOST, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use sitenav_core::domain::{MenuRequest, RequestUser};
use sitenav_core::services::MenuTags;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Ul,
    Div,
}

impl Layout {
    pub fn tags(self) -> MenuTags {
        match self {
            Layout::Ul => MenuTags::list(),
            Layout::Div => MenuTags::div(),
        }
    }
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Page the menu is rendered for.
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub layout: Layout,
    /// Overrides the layout's level element.
    pub group_tag: Option<String>,
    /// Overrides the layout's item element.
    pub item_tag: Option<String>,
}

impl MenuQuery {
    /// Tags from `layout`, with any explicit tag names validated on top.
    pub fn tags(&self) -> Result<MenuTags, ApiError> {
        let layout = self.layout.tags();
        if self.group_tag.is_none() && self.item_tag.is_none() {
            return Ok(layout);
        }
        let group_tag = self.group_tag.as_deref().unwrap_or(layout.group_tag());
        let item_tag = self.item_tag.as_deref().unwrap_or(layout.item_tag());
        MenuTags::new(group_tag, item_tag).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct MenuHtml {
    pub group: String,
    pub path: String,
    pub html: String,
}

/// Builds the engine's view of a request for `path`.
pub fn menu_request(state: &AppState, user: RequestUser, headers: &HeaderMap, path: &str) -> MenuRequest {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    MenuRequest::new(user, &state.config.app.public_scheme, host, path)
}

/// GET /api/v1/menus/{name}?path=..&layout=ul|div&group_tag=..&item_tag=..
///
/// An unknown group renders as empty HTML.
pub async fn render_menu(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(name): Path<String>,
    Query(query): Query<MenuQuery>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MenuHtml>>, ApiError> {
    if !query.path.starts_with('/') {
        return Err(ApiError::BadRequest("Path must start with '/'".to_string()));
    }

    let tags = query.tags()?;
    let request = menu_request(&state, user, &headers, &query.path);
    let html = state.menus.render(name.as_str(), &request, &tags).await;

    Ok(Json(ApiResponse::success(MenuHtml {
        group: name,
        path: query.path,
        html,
    })))
}
