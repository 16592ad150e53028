//! Authentication and authorization.
//!
//! - [`token`]: issuing and verifying signed access tokens
//! - [`policy`]: role and ownership checks applied before domain logic
//! - [`approval`]: login gate for unapproved client accounts
//! - [`password`]: argon2 password hashing

pub mod approval;
pub mod password;
pub mod policy;
pub mod token;

pub use policy::{require_identity, require_owner_or_admin, require_role};
pub use token::{Claims, Identity, TOKEN_LIFETIME_MINUTES, TokenService};
