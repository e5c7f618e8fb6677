//! Catalog records: products and categories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, ProductId};

/// Lifecycle status of a product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
}

/// A product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// References into the `categories` collection
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// A category document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
