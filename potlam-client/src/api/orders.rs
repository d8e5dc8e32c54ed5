//! Order endpoints

use shared::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate};

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn place<C: HttpClient>(client: &C, body: &OrderCreate) -> ClientResult<Order> {
    client.post("/orders", body).await
}

/// Orders of the signed-in customer
pub async fn my_orders<C: HttpClient>(client: &C) -> ClientResult<Vec<Order>> {
    client.get("/orders/my-orders").await
}

/// All orders (admin)
pub async fn all<C: HttpClient>(client: &C) -> ClientResult<Vec<Order>> {
    client.get("/orders").await
}

pub async fn fetch<C: HttpClient>(client: &C, id: &str) -> ClientResult<Order> {
    client.get(&format!("/orders/{id}")).await
}

pub async fn update_status<C: HttpClient>(
    client: &C,
    id: &str,
    status: OrderStatus,
) -> ClientResult<Order> {
    client
        .put(&format!("/orders/{id}/status"), &OrderStatusUpdate { status })
        .await
}
