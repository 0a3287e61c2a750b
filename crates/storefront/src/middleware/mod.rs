//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions)
//! 5. Route protection (reject anonymous requests to protected prefixes)

pub mod auth;
pub mod protect;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use protect::protect_routes_middleware;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
