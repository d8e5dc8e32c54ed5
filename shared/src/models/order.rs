//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, NamedRef, Ref, UserRef};

/// Order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Online,
}

/// Shipping address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// One order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: Ref<NamedRef>,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<Ref<UserRef>>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

/// `POST /orders` payload; items are taken from the server cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `PUT /orders/{id}/status` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
