//! Document shapes stored in the document store.
//!
//! Field names are camelCase on the wire to match the stored documents.
//! Every model carries its document id as `id`; the id is the key the
//! document is stored under, not necessarily a field inside the body.

pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use order::{DeliveryInfo, Order, OrderItem};
pub use product::Product;
pub use store::{ContactInfo, Store, StoreSettings};
pub use user::UserProfile;
