//! Route protection by path prefix.
//!
//! Requests whose path falls under one of the configured prefixes
//! (`KIOSK_PROTECTED_PATHS`) are only let through for signed-in users. This
//! guards whole sections of the site without each handler having to ask for
//! `RequireAuth`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::auth::{AuthRejection, current_user};
use crate::state::AppState;

/// Whether `path` is `prefix` itself or nested beneath it.
#[must_use]
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Middleware that rejects anonymous requests to protected paths.
pub async fn protect_routes_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let protected = state
        .config()
        .protected_paths
        .iter()
        .any(|prefix| matches_prefix(path, prefix));

    if protected && current_user(&session).await.is_none() {
        tracing::debug!(path, "Rejecting anonymous request to protected path");
        return AuthRejection::for_path(path).into_response();
    }

    next.run(request).await
}
