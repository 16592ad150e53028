//! User entity - Accounts that can authenticate against the order desk.
//!
//! Clients register themselves and stay unapproved until an administrator
//! clears them. Administrators are never gated on the `approved` flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role carried by a user account and embedded in issued tokens
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Manages users, products and order status
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Browses products and places orders
    #[sea_orm(string_value = "CLIENT")]
    Client,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => f.write_str("ADMIN"),
            Self::Client => f.write_str("CLIENT"),
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, unique across all accounts
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// ADMIN or CLIENT
    pub role: Role,
    /// Whether an administrator has cleared this account for login
    pub approved: bool,
    /// When the account was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client owns many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
