//! Kiosk Core - Shared document types.
//!
//! This crate provides the types used across all Kiosk components:
//! - `storefront` - Public JSON API and identity-provider sign-in
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Every model mirrors a document in the hosted document
//! store; the store is the sole source of truth and nothing here enforces
//! invariants beyond the shape of the data.
//!
//! # Modules
//!
//! - [`types`] - Newtype document ids, emails, and status enums
//! - [`models`] - Product, order, store, and user document shapes
//! - [`collections`] - Names of the document collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collections;
pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
