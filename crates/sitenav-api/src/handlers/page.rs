//! Minimal page shell: the configured menu plus the breadcrumb trail

use axum::{
    extract::{Request, State},
    response::Html,
};
use tracing::debug;

use sitenav_core::domain::{BreadcrumbTrail, Crumb};
use sitenav_core::services::MenuTags;
use sitenav_shared::utils::escape_html;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::menu::menu_request;
use crate::state::AppState;

fn render_crumbs(crumbs: &[Crumb]) -> String {
    let last = crumbs.len().saturating_sub(1);
    crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            let title = escape_html(&crumb.title);
            if i == last {
                format!("<span>{}</span>", title)
            } else {
                format!("<a href=\"{}\">{}</a>", escape_html(&crumb.url), title)
            }
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Fallback for every path the router knows.
pub async fn render_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    request: Request,
) -> Result<Html<String>, ApiError> {
    let path = request.uri().path().to_string();
    let resolved = state
        .urls
        .resolve(&path)
        .ok_or_else(|| ApiError::NotFound(format!("No page at {}", path)))?;

    let crumbs = match request.extensions().get::<BreadcrumbTrail>() {
        Some(trail) => trail.crumbs(),
        None => state.breadcrumbs.root_crumbs(),
    };

    let menu_request = menu_request(&state, user, request.headers(), &path);
    let menu = state
        .menus
        .render(state.config.navigation.page_menu.as_str(), &menu_request, &MenuTags::list())
        .await;

    debug!(path = %path, view = %resolved.view, "Rendering page");

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <nav class=\"breadcrumbs\">{crumbs}</nav>\n<nav class=\"menu\">\n{menu}\n</nav>\n\
         <main data-view=\"{view}\"></main>\n</body>\n</html>\n",
        title = escape_html(&state.config.app.name),
        crumbs = render_crumbs(&crumbs),
        menu = menu,
        view = escape_html(&resolved.view),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_crumb_is_not_a_link() {
        let crumbs = vec![
            Crumb {
                url: "/".to_string(),
                title: "Home".to_string(),
            },
            Crumb {
                url: "/blog/".to_string(),
                title: "Blog & News".to_string(),
            },
        ];
        assert_eq!(render_crumbs(&crumbs), "<a href=\"/\">Home</a> / <span>Blog &amp; News</span>");
        assert_eq!(render_crumbs(&[]), "");
    }
}
