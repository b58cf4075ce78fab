//! Cart pricing.

use std::{fmt, str::FromStr};

use crate::domain::{checkout::errors::CheckoutError, products::records::ProductUuid};

/// Delivery fee charged for orders delivered outside Nairobi.
pub const OUTSIDE_NAIROBI_DELIVERY_FEE: u64 = 500;

/// Where an order is delivered, which decides the delivery fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryZone {
    Nairobi,
    Outside,
}

impl DeliveryZone {
    #[must_use]
    pub const fn delivery_fee(self) -> u64 {
        match self {
            Self::Nairobi => 0,
            Self::Outside => OUTSIDE_NAIROBI_DELIVERY_FEE,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nairobi => "nairobi",
            Self::Outside => "outside",
        }
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryZone {
    type Err = CheckoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nairobi" => Ok(Self::Nairobi),
            "outside" => Ok(Self::Outside),
            _ => Err(CheckoutError::UnknownDeliveryZone),
        }
    }
}

/// One product line in a client-held cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

impl CartLine {
    /// Quantity times unit price, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// Client-held cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart is empty, a line has a zero quantity or
    /// the sum does not fit in a `u64`.
    pub fn subtotal(&self) -> Result<u64, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.lines.iter().try_fold(0_u64, |subtotal, line| {
            if line.quantity == 0 {
                return Err(CheckoutError::InvalidQuantity);
            }

            line.line_total()
                .and_then(|total| subtotal.checked_add(total))
                .ok_or(CheckoutError::AmountOverflow)
        })
    }
}

/// Server-computed checkout totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub subtotal: u64,
    pub delivery_zone: DeliveryZone,
    pub delivery_fee: u64,
    pub total: u64,
}

/// Price a cart for delivery to `zone`.
///
/// # Errors
///
/// Returns an error when the cart cannot be priced, see [`Cart::subtotal`].
pub fn summarize(cart: &Cart, zone: DeliveryZone) -> Result<CheckoutSummary, CheckoutError> {
    let subtotal = cart.subtotal()?;
    let delivery_fee = zone.delivery_fee();

    let total = subtotal
        .checked_add(delivery_fee)
        .ok_or(CheckoutError::AmountOverflow)?;

    Ok(CheckoutSummary {
        subtotal,
        delivery_zone: zone,
        delivery_fee,
        total,
    })
}
