// ============================================================================
// Sitenav API - Breadcrumb Middleware
// File: crates/sitenav-api/src/middleware/breadcrumb.rs
// Description: Session cookie handling and trail tracking for page routes
// ============================================================================

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use uuid::Uuid;

use sitenav_core::domain::CrumbContext;
use sitenav_shared::constants::SESSION_COOKIE;

use crate::state::AppState;

const MAX_SESSION_ID_LENGTH: usize = 128;

/// Breadcrumb session of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Reads the session id from the `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| {
            !value.is_empty()
                && value.len() <= MAX_SESSION_ID_LENGTH
                && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Applies the visited view's breadcrumb policy before the page handler
/// runs.
///
/// The updated trail and the session id are stored in the request
/// extensions. Paths the router cannot resolve are not tracked. A request
/// without a session cookie gets a fresh id, sent back with `Set-Cookie`.
pub async fn track_breadcrumbs(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    // 1. Request user; a bad token ends the request here
    let user = match state.jwt.user_from_headers(request.headers()) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    // 2. Session
    let existing = session_from_headers(request.headers());
    let is_new = existing.is_none();
    let session_id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());

    // 3. Track
    let path = request.uri().path().to_string();
    if let Some(resolved) = state.urls.resolve(&path) {
        let ctx = CrumbContext {
            path,
            view: Some(resolved.view),
            kwargs: resolved.kwargs,
            user,
        };
        let trail = state.breadcrumbs.track(&session_id, &ctx).await;
        request.extensions_mut().insert(trail);
    } else {
        debug!(path = %path, "Unroutable path, breadcrumbs unchanged");
    }
    request.extensions_mut().insert(SessionId(session_id.clone()));

    let mut response = next.run(request).await;

    // 4. Issue the cookie for new sessions
    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Cannot build session cookie: {}", e),
        }
    }

    response
}
