//! Products and line items.
//!
//! A [`Product`] is what the catalog hands to the cart. A [`CartLineItem`] is
//! what the cart keeps: the product's display fields frozen at add time plus a
//! strictly positive quantity.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ProductId;

/// Single-unit stepper direction for quantity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Add one unit.
    Increment,
    /// Take one unit away.
    Decrement,
}

impl Step {
    /// Signed quantity delta for this step.
    pub const fn delta(self) -> i64 {
        match self {
            Step::Increment => 1,
            Step::Decrement => -1,
        }
    }
}

impl From<bool> for Step {
    /// `true` increments, `false` decrements.
    fn from(up: bool) -> Self {
        if up {
            Step::Increment
        } else {
            Step::Decrement
        }
    }
}

/// A product record as supplied by the catalog, product detail or reorder
/// flows.
///
/// `quantity` is the number of units to put in the cart. It is signed: when
/// the product is already in the cart a negative value takes units away.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(
        default,
        rename = "userId",
        alias = "sellerName",
        deserialize_with = "null_as_default"
    )]
    pub seller: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_media_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with the given id, unit price and quantity.
    pub fn new(id: impl Into<ProductId>, price: f64, quantity: i64) -> Self {
        Self {
            id: id.into(),
            price,
            quantity,
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the seller.
    pub fn seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = seller.into();
        self
    }

    /// Append an image media id.
    pub fn image_media_id(mut self, media_id: impl Into<String>) -> Self {
        self.image_media_ids.push(media_id.into());
        self
    }

    /// Set the primary image URL.
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Whether the unit price is a finite, non-negative number.
    pub fn has_valid_price(&self) -> bool {
        is_valid_price(self.price)
    }
}

/// One distinct product held in the cart.
///
/// This is also the persisted record shape. `id`, `price` and `quantity` are
/// required when decoding; display fields default when missing or `null`.
/// A stored quantity at or below zero decodes as `0`, which
/// [`CartSnapshot::from_records`](crate::CartSnapshot::from_records) drops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub price: f64,
    #[serde(deserialize_with = "clamped_quantity")]
    pub quantity: u32,
    #[serde(
        default,
        rename = "userId",
        alias = "sellerName",
        deserialize_with = "null_as_default"
    )]
    pub seller: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_media_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// Build a line item from a product, copying its display fields.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity,
            seller: product.seller.clone(),
            image_media_ids: product.image_media_ids.clone(),
            image_url: product.image_url.clone(),
        }
    }

    /// Price of this line: unit price times quantity.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Apply a signed delta to the quantity.
    ///
    /// Returns `None` when the result would not be positive; large results
    /// saturate at `u32::MAX`.
    pub fn adjusted_quantity(&self, delta: i64) -> Option<u32> {
        let next = i64::from(self.quantity).saturating_add(delta);
        if next <= 0 {
            None
        } else {
            Some(u32::try_from(next).unwrap_or(u32::MAX))
        }
    }
}

/// Whether a unit price is acceptable in a cart.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Catalog records carry explicit `null` for absent display fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Signed integer on the wire, floored at zero and saturated at `u32::MAX`.
fn clamped_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}
