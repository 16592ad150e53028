//! Shared test utilities for the order desk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    auth::{Identity, TokenService, password},
    core::order::{self, NewOrder},
    entities::{self, Role},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Password given to every user created by these helpers.
pub const TEST_PASSWORD: &str = "password123";

/// Signing secret used by [`test_token_service`].
pub const TEST_SECRET: &str = "order-desk-test-secret-0123456789abcdef";

/// Routes tracing output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Token service with a fixed secret.
#[must_use]
pub fn test_token_service() -> TokenService {
    TokenService::new(TEST_SECRET)
}

/// The identity a token issued to `user` would carry.
#[must_use]
pub const fn identity_of(user: &entities::user::Model) -> Identity {
    Identity::new(user.id, user.role)
}

fn user_active_model(email: &str, role: Role, approved: bool) -> Result<entities::user::ActiveModel> {
    Ok(entities::user::ActiveModel {
        name: Set(format!("User {email}")),
        email: Set(email.to_string()),
        password_hash: Set(password::hash_password(TEST_PASSWORD)?),
        role: Set(role),
        approved: Set(approved),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    })
}

/// Inserts a user directly, bypassing registration rules.
///
/// # Defaults
/// * `name`: `"User <email>"`
/// * `password`: [`TEST_PASSWORD`]
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
    approved: bool,
) -> Result<entities::user::Model> {
    user_active_model(email, role, approved)?
        .insert(db)
        .await
        .map_err(Into::into)
}

/// Inserts a user with a fixed id.
pub async fn create_test_user_with_id(
    db: &DatabaseConnection,
    id: i64,
    email: &str,
    role: Role,
    approved: bool,
) -> Result<entities::user::Model> {
    let mut user = user_active_model(email, role, approved)?;
    user.id = Set(id);
    user.insert(db).await.map_err(Into::into)
}

/// Inserts a product priced per `"kg"`.
///
/// `price` is a decimal literal such as `"12.50"`.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: &str,
) -> Result<entities::product::Model> {
    let price: Decimal = price.parse().map_err(|_| crate::errors::Error::validation("bad test price"))?;
    entities::product::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        unit: Set("kg".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Places an order as `client` through the normal order path, with free shipping.
pub async fn create_test_order(
    db: &DatabaseConnection,
    client: &entities::user::Model,
    product_id: i64,
    quantity: i32,
) -> Result<entities::order::Model> {
    order::create_order(
        db,
        &identity_of(client),
        NewOrder {
            product_id,
            quantity,
            shipping_cost: Decimal::ZERO,
        },
    )
    .await
}
