//! Sign-in route handlers.
//!
//! Handles the OAuth authorization-code flow against the identity provider:
//! - Sign-in: Redirects to the provider's authorization page
//! - Callback: Exchanges the code for tokens and records the signed-in user
//! - Sign-out: Clears the session and redirects to the provider's logout page

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use kiosk_core::Email;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::identity::AccessToken;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::users::initialize_user;
use crate::state::AppState;

/// Query parameters from the provider's callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Length of the generated `state` and `nonce` values.
const RANDOM_TOKEN_LEN: usize = 32;

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|&b| char::from(b))
        .collect()
}

/// Redirect home with an error reason the UI can show.
fn error_redirect(reason: &str) -> Response {
    Redirect::to(&format!("/?error={reason}")).into_response()
}

/// Start sign-in.
///
/// Generates state and nonce parameters, stores them in the session,
/// and redirects to the provider's authorization page.
///
/// # Route
///
/// `GET /auth/sign-in`
pub async fn sign_in(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(RANDOM_TOKEN_LEN);
    let nonce = generate_random_string(RANDOM_TOKEN_LEN);

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return error_redirect("session");
    }

    if let Err(e) = session.insert(session_keys::OAUTH_NONCE, &nonce).await {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return error_redirect("session");
    }

    let redirect_uri = state.config().callback_url();
    let auth_url = state
        .identity()
        .authorization_url(&redirect_uri, &oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle the provider's callback.
///
/// Validates the state parameter, exchanges the authorization code for
/// tokens, makes sure a user document exists, and stores the signed-in user
/// in the session.
///
/// # Route
///
/// `GET /auth/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("Identity provider error: {} - {}", error, description);
        return error_redirect("provider_denied");
    }

    let Some(code) = query.code else {
        tracing::warn!("Sign-in callback missing code");
        return error_redirect("missing_code");
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("Sign-in callback missing state");
        return error_redirect("missing_state");
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Sign-in state mismatch");
        return error_redirect("invalid_state");
    }

    // One-time use
    for key in [session_keys::OAUTH_STATE, session_keys::OAUTH_NONCE] {
        if let Err(e) = session.remove::<String>(key).await {
            tracing::warn!(key, "Failed to remove sign-in value from session: {}", e);
        }
    }

    let redirect_uri = state.config().callback_url();

    let token = match state.identity().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange authorization code: {}", e);
            return error_redirect("token_exchange");
        }
    };

    let identity_user = match state.identity().user_info(&token.access_token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to fetch user info: {}", e);
            return error_redirect("user_info");
        }
    };

    initialize_user(state.store(), &identity_user).await;

    let user = CurrentUser::from(&identity_user);

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {}", e);
        return error_redirect("session");
    }

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store current user in session: {}", e);
        return error_redirect("session");
    }

    if let Err(e) = session.insert(session_keys::ACCESS_TOKEN, &token).await {
        tracing::error!("Failed to store access token in session: {}", e);
        return error_redirect("session");
    }

    set_sentry_user(&user.id, user.email.as_ref().map(Email::as_str));
    tracing::info!(user_id = %user.id, "User signed in");

    Redirect::to("/").into_response()
}

/// Sign out.
///
/// Clears the signed-in user and tokens from the session and, when the
/// provider issued an id token, redirects to its logout endpoint.
///
/// # Route
///
/// `GET|POST /auth/sign-out`
pub async fn sign_out(State(state): State<AppState>, session: Session) -> Response {
    let token: Option<AccessToken> = session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();

    if let Err(e) = session
        .remove::<AccessToken>(session_keys::ACCESS_TOKEN)
        .await
    {
        tracing::warn!("Failed to remove access token from session: {}", e);
    }
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear current user from session: {}", e);
    }
    clear_sentry_user();

    if let Some(token) = token
        && let Some(id_token) = token.id_token
    {
        let post_logout_uri = format!("{}/", state.config().base_url);
        let logout_url = state.identity().logout_url(&id_token, &post_logout_uri);
        return Redirect::to(&logout_url).into_response();
    }

    Redirect::to("/").into_response()
}

/// The signed-in user.
///
/// # Route
///
/// `GET /api/me`
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}
