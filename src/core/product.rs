//! Product business logic - Catalogue reads for everyone, writes for administrators.
//!
//! Updates use a field mask: only the fields present in a [`ProductUpdate`]
//! are written, and a mask with no fields is rejected before the store is touched.

use crate::{
    auth::{Identity, require_role},
    entities::{Product, Role, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{NotSet, QueryOrder, Set, Unchanged, prelude::*};
use tracing::{info, instrument};

/// Input for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name
    pub name: String,
    /// Unit price, must be positive
    pub price: Decimal,
    /// Sales unit, e.g. `kg`
    pub unit: String,
}

/// Partial product update. `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New display name
    pub name: Option<String>,
    /// New unit price
    pub price: Option<Decimal>,
    /// New sales unit
    pub unit: Option<String>,
}

impl ProductUpdate {
    /// True when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.unit.is_none()
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::validation("No updates provided"));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(unit) = &self.unit {
            validate_unit(unit)?;
        }
        Ok(())
    }

    fn into_active_model(self, product_id: i64) -> product::ActiveModel {
        product::ActiveModel {
            id: Unchanged(product_id),
            name: self.name.map_or(NotSet, |name| Set(name.trim().to_string())),
            price: self.price.map_or(NotSet, Set),
            unit: self.unit.map_or(NotSet, |unit| Set(unit.trim().to_string())),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().chars().count() < 3 {
        return Err(Error::validation("Product name must be at least 3 characters"));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

fn validate_unit(unit: &str) -> Result<()> {
    if unit.trim().is_empty() {
        return Err(Error::validation("Product unit cannot be empty"));
    }
    Ok(())
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            resource: "Product",
            id: product_id,
        })
}

/// Creates a new product. Admin only.
///
/// # Errors
/// Returns an error if:
/// - The caller is not an administrator
/// - The name is shorter than 3 characters or the unit is empty
/// - The price is not positive
/// - The database insert operation fails
#[instrument(skip(db, new_product), fields(name = %new_product.name))]
pub async fn create_product(
    db: &DatabaseConnection,
    identity: &Identity,
    new_product: NewProduct,
) -> Result<product::Model> {
    require_role(identity, &[Role::Admin])?;

    validate_name(&new_product.name)?;
    validate_price(new_product.price)?;
    validate_unit(&new_product.unit)?;

    let product = product::ActiveModel {
        name: Set(new_product.name.trim().to_string()),
        price: Set(new_product.price),
        unit: Set(new_product.unit.trim().to_string()),
        ..Default::default()
    };
    let created = product.insert(db).await?;

    info!(product_id = created.id, "Product added");
    Ok(created)
}

/// Applies a partial update to a product. Admin only.
///
/// # Errors
/// Returns an error if:
/// - The caller is not an administrator
/// - No field is present, or a present field fails validation
/// - The product does not exist
#[instrument(skip(db, update))]
pub async fn update_product(
    db: &DatabaseConnection,
    identity: &Identity,
    product_id: i64,
    update: ProductUpdate,
) -> Result<product::Model> {
    require_role(identity, &[Role::Admin])?;
    update.validate()?;

    get_product(db, product_id).await?;
    let updated = update.into_active_model(product_id).update(db).await?;

    info!(product_id, "Product updated");
    Ok(updated)
}

/// Permanently removes a product. Admin only.
///
/// Orders that reference the product keep their stored prices.
#[instrument(skip(db))]
pub async fn delete_product(
    db: &DatabaseConnection,
    identity: &Identity,
    product_id: i64,
) -> Result<()> {
    require_role(identity, &[Role::Admin])?;

    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            resource: "Product",
            id: product_id,
        });
    }

    info!(product_id, "Product deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn admin() -> Identity {
        Identity::new(1, Role::Admin)
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let short_name = NewProduct {
            name: "  ab ".to_string(),
            price: dec("1"),
            unit: "kg".to_string(),
        };
        assert!(matches!(
            create_product(&db, &admin(), short_name).await,
            Err(Error::Validation { .. })
        ));

        let zero_price = NewProduct {
            name: "Rice".to_string(),
            price: Decimal::ZERO,
            unit: "kg".to_string(),
        };
        assert!(matches!(
            create_product(&db, &admin(), zero_price).await,
            Err(Error::InvalidAmount { .. })
        ));

        let no_unit = NewProduct {
            name: "Rice".to_string(),
            price: dec("1"),
            unit: " ".to_string(),
        };
        assert!(matches!(
            create_product(&db, &admin(), no_unit).await,
            Err(Error::Validation { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_require_admin() -> Result<()> {
        // No query results are configured: any store access would fail the test
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let client = Identity::new(5, Role::Client);

        let new_product = NewProduct {
            name: "Rice".to_string(),
            price: dec("1"),
            unit: "kg".to_string(),
        };
        assert!(matches!(
            create_product(&db, &client, new_product).await,
            Err(Error::Forbidden { .. })
        ));

        let update = ProductUpdate {
            price: Some(dec("2")),
            ..Default::default()
        };
        assert!(matches!(
            update_product(&db, &client, 1, update).await,
            Err(Error::Forbidden { .. })
        ));
        assert!(matches!(
            delete_product(&db, &client, 1).await,
            Err(Error::Forbidden { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_list_products() -> Result<()> {
        let db = setup_test_db().await?;

        let sugar = create_product(
            &db,
            &admin(),
            NewProduct {
                name: "Sugar".to_string(),
                price: dec("3.25"),
                unit: "kg".to_string(),
            },
        )
        .await?;
        let oil = create_test_product(&db, "Cooking Oil", "7.90").await?;

        let products = list_products(&db).await?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, oil.id);
        assert_eq!(products[1].id, sugar.id);
        assert_eq!(products[1].price, dec("3.25"));

        let fetched = get_product(&db, sugar.id).await?;
        assert_eq!(fetched.unit, "kg");
        assert!(matches!(
            get_product(&db, 999).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_update_rejected() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = update_product(&db, &admin(), 1, ProductUpdate::default()).await;
        match result {
            Err(Error::Validation { message }) => assert_eq!(message, "No updates provided"),
            other => panic!("expected validation error, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_update_only_touches_supplied_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Rice", "12.50").await?;

        let updated = update_product(
            &db,
            &admin(),
            product.id,
            ProductUpdate {
                price: Some(dec("13.00")),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.price, dec("13.00"));
        assert_eq!(updated.name, "Rice");
        assert_eq!(updated.unit, product.unit);

        let renamed = update_product(
            &db,
            &admin(),
            product.id,
            ProductUpdate {
                name: Some("Jasmine Rice".to_string()),
                unit: Some("bag".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(renamed.name, "Jasmine Rice");
        assert_eq!(renamed.unit, "bag");
        assert_eq!(renamed.price, dec("13.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product() -> Result<()> {
        let db = setup_test_db().await?;
        let update = ProductUpdate {
            unit: Some("box".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            update_product(&db, &admin(), 999, update).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Rice", "12.50").await?;

        delete_product(&db, &admin(), product.id).await?;
        assert!(list_products(&db).await?.is_empty());

        assert!(matches!(
            delete_product(&db, &admin(), product.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
