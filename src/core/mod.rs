//! Core business logic - framework-agnostic user, product and order operations.
//!
//! Every protected operation takes the caller's verified [`crate::auth::Identity`]
//! and applies the access policy before it reads or writes the store.

/// Order placement, visibility and status changes
pub mod order;
/// Order amount calculation
pub mod pricing;
/// Product catalogue
pub mod product;
/// Registration, login and account administration
pub mod user;
