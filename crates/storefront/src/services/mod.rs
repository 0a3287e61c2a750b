//! Business logic services for storefront.
//!
//! # Services
//!
//! - `users` - User initializer run on sign-in
//! - `catalog` - One-shot product catalog upload

pub mod catalog;
pub mod users;
