//! Inventory records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{InventoryId, ProductId};

/// Stock level of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Reorder point, used only by low-stock alerts
    #[serde(default)]
    pub threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Stock is at or below the reorder point
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.threshold
    }
}
