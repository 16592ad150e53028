//! Order business logic - Placement, visibility and status changes.
//!
//! Clients place orders and list their own; reads and deletes of a single
//! order are open to its owner and to administrators; only administrators
//! change status or list every order. Authorization always runs before the
//! store is queried.
//!
//! Status updates overwrite the current status with any assignable value. No
//! transition graph is enforced, so an administrator can move an order from
//! `DELIVERED` back to `APPROVED`.

use crate::{
    auth::{Identity, require_owner_or_admin, require_role},
    core::pricing,
    entities::{Order, OrderStatus, Product, Role, User, order, product, user},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Input for a new order
#[derive(Debug, Clone, Copy)]
pub struct NewOrder {
    /// Product being ordered
    pub product_id: i64,
    /// Number of units, must be positive
    pub quantity: i32,
    /// Flat shipping charge added after tax, zero or more
    pub shipping_cost: Decimal,
}

/// An order together with the names of its product and client, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    /// The stored order row
    #[serde(flatten)]
    pub order: order::Model,
    /// `None` once the product has been removed from the catalogue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Only filled in for administrator listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

fn order_not_found(order_id: i64) -> Error {
    Error::NotFound {
        resource: "Order",
        id: order_id,
    }
}

async fn find_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| order_not_found(order_id))
}

/// Places an order for the calling client with status `PENDING`.
///
/// The product's current price is looked up and the amounts are fixed at
/// this point; they are never recomputed.
///
/// # Errors
/// Returns an error if:
/// - The caller is not a client (checked before anything else)
/// - The product does not exist
/// - Quantity, shipping cost or product price are out of range
#[instrument(skip(db))]
pub async fn create_order(
    db: &DatabaseConnection,
    identity: &Identity,
    new_order: NewOrder,
) -> Result<order::Model> {
    require_role(identity, &[Role::Client])?;

    let product = Product::find_by_id(new_order.product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound {
            id: new_order.product_id,
        })?;

    let quote = pricing::price(product.price, new_order.quantity, new_order.shipping_cost)?;

    let order = order::ActiveModel {
        client_id: Set(identity.id()),
        product_id: Set(product.id),
        quantity: Set(new_order.quantity),
        subtotal: Set(quote.subtotal),
        tax: Set(quote.tax),
        shipping_cost: Set(quote.shipping_cost),
        total_price: Set(quote.total),
        status: Set(OrderStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = order.insert(db).await?;

    info!(
        order_id = created.id,
        client_id = identity.id(),
        total = %created.total_price,
        "Order submitted"
    );
    Ok(created)
}

/// Fetches one order. Visible to its owner and to administrators.
pub async fn get_order(
    db: &DatabaseConnection,
    identity: &Identity,
    order_id: i64,
) -> Result<order::Model> {
    let order = find_order(db, order_id).await?;
    require_owner_or_admin(identity, order.client_id)?;
    Ok(order)
}

/// Lists the calling client's orders, newest first. Client only.
pub async fn list_my_orders(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<OrderDetails>> {
    require_role(identity, &[Role::Client])?;

    let orders = Order::find()
        .filter(order::Column::ClientId.eq(identity.id()))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    let product_names = product_names(db, &orders).await?;
    Ok(orders
        .into_iter()
        .map(|order| OrderDetails {
            product_name: product_names.get(&order.product_id).cloned(),
            client_name: None,
            order,
        })
        .collect())
}

/// Lists every order with client and product names, newest first. Admin only.
pub async fn list_all_orders(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<OrderDetails>> {
    require_role(identity, &[Role::Admin])?;

    let orders = Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    let product_names = product_names(db, &orders).await?;
    let client_names = client_names(db, &orders).await?;
    Ok(orders
        .into_iter()
        .map(|order| OrderDetails {
            product_name: product_names.get(&order.product_id).cloned(),
            client_name: client_names.get(&order.client_id).cloned(),
            order,
        })
        .collect())
}

async fn product_names(
    db: &DatabaseConnection,
    orders: &[order::Model],
) -> Result<HashMap<i64, String>> {
    if orders.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.product_id).collect();
    let products = Product::find()
        .filter(product::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(products.into_iter().map(|p| (p.id, p.name)).collect())
}

async fn client_names(
    db: &DatabaseConnection,
    orders: &[order::Model],
) -> Result<HashMap<i64, String>> {
    if orders.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.client_id).collect();
    let users = User::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
}

/// Overwrites an order's status. Admin only.
///
/// `PENDING` cannot be assigned. Setting the status an order already has is
/// a harmless overwrite.
///
/// # Errors
/// Returns an error if:
/// - The caller is not an administrator
/// - `new_status` is `PENDING`
/// - The order does not exist
#[instrument(skip(db))]
pub async fn update_order_status(
    db: &DatabaseConnection,
    identity: &Identity,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<order::Model> {
    require_role(identity, &[Role::Admin])?;

    if !new_status.is_assignable() {
        return Err(Error::validation(format!(
            "Status must be one of {:?}",
            OrderStatus::ASSIGNABLE
        )));
    }

    let mut order: order::ActiveModel = find_order(db, order_id).await?.into();
    order.status = Set(new_status);
    let updated = order.update(db).await?;

    info!(order_id, status = %new_status, "Order status updated");
    Ok(updated)
}

/// Permanently removes an order. Allowed for its owner and for administrators.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, identity: &Identity, order_id: i64) -> Result<()> {
    let order = find_order(db, order_id).await?;
    require_owner_or_admin(identity, order.client_id)?;

    Order::delete_by_id(order_id).exec(db).await?;

    info!(order_id, deleted_by = identity.id(), "Order deleted");
    Ok(())
}
