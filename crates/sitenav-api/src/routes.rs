use axum::{handler::Handler, middleware::from_fn_with_state, routing::get, Router};

use crate::handlers::{breadcrumbs, health, menu, page};
use crate::middleware::track_breadcrumbs;
use crate::state::AppState;

/// Health, API and page routes. Every path the API does not claim falls
/// through to the page shell, which tracks breadcrumbs.
pub fn router(state: AppState) -> Router {
    let pages = page::render_page.layer(from_fn_with_state(state.clone(), track_breadcrumbs));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/menus/{name}", get(menu::render_menu))
        .route("/api/v1/breadcrumbs", get(breadcrumbs::list_crumbs))
        .fallback(pages)
        .with_state(state)
}
