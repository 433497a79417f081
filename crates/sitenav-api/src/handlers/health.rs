use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use sitenav_core::services::GroupRef;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    /// Routes known to the URL resolver.
    routes: usize,
    /// Whether the page menu group exists in storage.
    page_menu: bool,
}

/// Reports `degraded` with 503 when the menu store cannot be read.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let page_menu = state.config.navigation.page_menu.as_str();
    let (status, found) = match state.menus.find_group(GroupRef::Name(page_menu)).await {
        Ok(group) => (StatusCode::OK, group.is_some()),
        Err(e) => {
            error!("Health check could not read menu store: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false)
        }
    };

    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            routes: state.route_count,
            page_menu: found,
        }),
    )
}
