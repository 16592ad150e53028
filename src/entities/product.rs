//! Product entity - Items clients can order, priced per unit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Rice", "Cooking Oil")
    pub name: String,
    /// Price per unit, always positive
    pub price: Decimal,
    /// Unit the price refers to (e.g., "kg", "box")
    pub unit: String,
}

/// Products have no declared relations; orders keep a plain `product_id`
/// so that removing a product leaves order history untouched.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
