//! Session-facing models for the storefront.
//!
//! Document shapes live in `kiosk_core`; this module only holds what the
//! storefront keeps in the user's session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
