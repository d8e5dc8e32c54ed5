//! Cart Model
//!
//! The cart lives on the server. The client keeps the last snapshot and only
//! derives read-only aggregates from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Identified, Ref};
use crate::money;

/// Product as embedded in a cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: u32,
}

impl Identified for CartProduct {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(alias = "_id")]
    pub id: String,
    pub product: Ref<CartProduct>,
    pub quantity: u32,
    /// Unit price recorded by the server when the item was added
    pub price: f64,
}

impl Identified for CartItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Server cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Σ quantity
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ price × quantity, rounded to 2 places
    pub fn total_price(&self) -> f64 {
        let total: Decimal = self
            .items
            .iter()
            .map(|i| money::line_total(i.price, i.quantity))
            .sum();
        money::to_f64(total)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `POST /cart` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: String,
    pub quantity: u32,
}

/// `PUT /cart/{itemId}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCartItem {
    pub quantity: u32,
}
