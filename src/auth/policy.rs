//! Access policy
//!
//! Role and ownership checks shared by every protected operation. Each check
//! runs on an already verified [`Identity`] and fails closed.

use crate::auth::Identity;
use crate::entities::Role;
use crate::errors::{Error, Result};
use tracing::warn;

/// Turns an optional identity into a required one.
///
/// An absent identity means verification never ran or did not succeed; it is
/// always rejected, never treated as anonymous access.
pub fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or(Error::Unauthenticated)
}

/// Allows the call iff `identity.role()` is one of `allowed`.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&identity.role()) {
        return Ok(());
    }

    warn!(
        user_id = identity.id(),
        role = %identity.role(),
        required = ?allowed,
        "permission_denied"
    );

    let reason = match allowed {
        [Role::Admin] => "Admin access required",
        [Role::Client] => "Client only",
        _ => "Role not permitted",
    };
    Err(Error::forbidden(reason))
}

/// Allows the call iff the caller is an administrator or owns the resource.
pub fn require_owner_or_admin(identity: &Identity, owner_id: i64) -> Result<()> {
    if identity.is_admin() || identity.id() == owner_id {
        return Ok(());
    }

    warn!(
        user_id = identity.id(),
        owner_id,
        "ownership_denied"
    );
    Err(Error::forbidden("Not the resource owner"))
}
