//! Login gate for unapproved client accounts.

use crate::entities::{Role, UserModel};
use crate::errors::{Error, Result};

/// Rejects clients whose account has not been approved yet.
///
/// Administrators pass without the `approved` flag being read.
pub fn ensure_can_authenticate(user: &UserModel) -> Result<()> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Client if user.approved => Ok(()),
        Role::Client => Err(Error::PendingApproval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, approved: bool) -> UserModel {
        UserModel {
            id: 42,
            name: "Someone".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            approved,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_unapproved_client_is_pending() {
        assert!(matches!(
            ensure_can_authenticate(&user(Role::Client, false)),
            Err(Error::PendingApproval)
        ));
        assert!(ensure_can_authenticate(&user(Role::Client, true)).is_ok());
    }

    #[test]
    fn test_admin_ignores_approval_flag() {
        assert!(ensure_can_authenticate(&user(Role::Admin, false)).is_ok());
        assert!(ensure_can_authenticate(&user(Role::Admin, true)).is_ok());
    }
}
