//! Storefront catalog
//!
//! Shoppers only ever see active products and categories; the admin
//! screens use the unfiltered resource calls.

use shared::models::{Category, Product, ProductQuery};

use crate::error::ClientResult;
use crate::http::HttpClient;

/// `GET /products` with optional category/search, active products only
pub async fn browse<C: HttpClient>(client: &C, query: &ProductQuery) -> ClientResult<Vec<Product>> {
    let products: Vec<Product> = client.get_query("/products", query).await?;
    Ok(products.into_iter().filter(|p| p.is_active).collect())
}

/// `GET /products/{id}`
pub async fn product<C: HttpClient>(client: &C, id: &str) -> ClientResult<Product> {
    client.get(&format!("/products/{id}")).await
}

/// Active categories for the storefront menu
pub async fn categories<C: HttpClient>(client: &C) -> ClientResult<Vec<Category>> {
    let categories: Vec<Category> = client.get("/categories").await?;
    Ok(categories.into_iter().filter(|c| c.is_active).collect())
}
