//! Order entity - A client's request for a quantity of one product.
//!
//! Pricing columns are computed once when the order is placed and never
//! recomputed. `status` is the only column that changes afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Initial status of every new order
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Accepted by an administrator
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined by an administrator
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Handed over for delivery
    #[sea_orm(string_value = "SHIPPED")]
    Shipped,
    /// Received by the client
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
}

impl OrderStatus {
    /// Statuses an administrator may assign. `Pending` is only ever set at creation.
    pub const ASSIGNABLE: [Self; 4] = [
        Self::Approved,
        Self::Rejected,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Whether an administrator may set this status through a status update.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
        };
        f.write_str(s)
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the client who placed the order
    pub client_id: i64,
    /// ID of the ordered product (not a foreign key)
    pub product_id: i64,
    /// Number of units ordered
    pub quantity: i32,
    /// Unit price times quantity
    pub subtotal: Decimal,
    /// Tax on the subtotal
    pub tax: Decimal,
    /// Shipping cost supplied by the client
    pub shipping_cost: Decimal,
    /// Subtotal plus tax plus shipping
    pub total_price: Decimal,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one client; removing the client removes their orders
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
