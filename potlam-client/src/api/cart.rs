//! Cart endpoints
//!
//! Every call answers with the full cart after the change.

use shared::models::{AddToCart, Cart, UpdateCartItem};

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn get<C: HttpClient>(client: &C) -> ClientResult<Cart> {
    client.get("/cart").await
}

pub async fn add<C: HttpClient>(client: &C, product_id: &str, quantity: u32) -> ClientResult<Cart> {
    let body = AddToCart {
        product_id: product_id.to_string(),
        quantity,
    };
    client.post("/cart", &body).await
}

pub async fn update<C: HttpClient>(client: &C, item_id: &str, quantity: u32) -> ClientResult<Cart> {
    client
        .put(&format!("/cart/{item_id}"), &UpdateCartItem { quantity })
        .await
}

pub async fn remove<C: HttpClient>(client: &C, item_id: &str) -> ClientResult<Cart> {
    client.delete(&format!("/cart/{item_id}")).await
}

pub async fn clear<C: HttpClient>(client: &C) -> ClientResult<Cart> {
    client.delete("/cart").await
}
