//! Document collection names.

/// Product catalog documents.
pub const PRODUCTS: &str = "products";

/// Customer orders.
pub const ORDERS: &str = "orders";

/// Seller storefronts.
pub const STORES: &str = "stores";

/// User profiles created on first sign-in.
pub const USERS: &str = "users";
