//! Order pricing.
//!
//! Prices are computed once, when an order is placed, with exact decimal
//! arithmetic. The tax rate is fixed.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// Tax applied to every order subtotal (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Computed amounts for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Unit price times quantity
    pub subtotal: Decimal,
    /// `subtotal * TAX_RATE`
    pub tax: Decimal,
    /// Shipping cost as supplied
    pub shipping_cost: Decimal,
    /// `subtotal + tax + shipping_cost`
    pub total: Decimal,
}

/// Prices `quantity` units at `product_price` plus `shipping_cost`.
///
/// # Errors
/// - [`Error::Validation`] if `quantity` is not positive or the amounts overflow
/// - [`Error::InvalidAmount`] if `product_price` is not positive or
///   `shipping_cost` is negative
pub fn price(product_price: Decimal, quantity: i32, shipping_cost: Decimal) -> Result<Quote> {
    if quantity <= 0 {
        return Err(Error::validation("Quantity must be a positive integer"));
    }
    if product_price <= Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: product_price,
        });
    }
    if shipping_cost < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: shipping_cost,
        });
    }

    let overflow = || Error::validation("Order amount is too large");

    let subtotal = product_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(overflow)?;
    let tax = subtotal.checked_mul(TAX_RATE).ok_or_else(overflow)?;
    let total = subtotal
        .checked_add(tax)
        .and_then(|sum| sum.checked_add(shipping_cost))
        .ok_or_else(overflow)?;

    Ok(Quote {
        subtotal,
        tax,
        shipping_cost,
        total,
    })
}
