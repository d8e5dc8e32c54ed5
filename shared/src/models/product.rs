//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::default_true;
use super::{Identified, NamedRef, Ref};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Populated on catalog endpoints, bare id elsewhere
    pub category: Ref<NamedRef>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Category display name when populated
    pub fn category_name(&self) -> Option<&str> {
        self.category.doc().map(|c| c.name.as_str())
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create product payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Category id
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock: u32,
}

/// Update product payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Catalog query (`GET /products?category=..&search=..`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Response of `POST /upload/image`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[serde(alias = "imageUrl")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_with_populated_category() {
        let json = r#"{
            "_id": "p1",
            "name": "Gongura Pickle",
            "description": "Sorrel leaves",
            "price": 249.5,
            "category": { "_id": "c1", "name": "Pickles" },
            "imageUrl": "https://cdn.example/p1.jpg",
            "stock": 12,
            "isActive": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category.id(), "c1");
        assert_eq!(product.category_name(), Some("Pickles"));
        assert!(product.in_stock());
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let json = r#"{"_id":"p1","name":"x","price":1.0,"category":"c1","stock":-1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_uploaded_image_alias() {
        let img: UploadedImage = serde_json::from_str(r#"{"imageUrl":"https://x/y.png"}"#).unwrap();
        assert_eq!(img.url, "https://x/y.png");
    }
}
