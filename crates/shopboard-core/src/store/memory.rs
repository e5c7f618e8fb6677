//! In-memory document store backed by a JSON snapshot
//!
//! The snapshot is immutable once loaded, so readers share it without locking.

use std::path::Path;
use tracing::info;

use super::{FindOptions, InventoryFilter, OrderFilter, Snapshot, Store, UserFilter};
use crate::error::Result;
use crate::models::{Category, InventoryItem, Order, Product, User};

pub struct MemoryStore {
    data: Snapshot,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            data: snapshot,
        }
    }

    /// Load a snapshot file into a new store
    pub fn open(path: &Path) -> Result<Self> {
        let snapshot = Snapshot::load(path)?;
        info!(
            path = %path.display(),
            documents = snapshot.document_count(),
            "Loaded snapshot into memory store"
        );
        Ok(Self::new(snapshot))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl Store for MemoryStore {
    fn count_users(&self) -> Result<u64> {
        Ok(self.data.users.len() as u64)
    }

    fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>> {
        let matched = self
            .data
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        Ok(options.apply(matched, |u: &User| u.created_at))
    }

    fn count_orders(&self, filter: &OrderFilter) -> Result<u64> {
        let count = self
            .data
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .count();
        Ok(count as u64)
    }

    fn find_orders(&self, filter: &OrderFilter, options: &FindOptions) -> Result<Vec<Order>> {
        let matched = self
            .data
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        Ok(options.apply(matched, |o: &Order| o.created_at))
    }

    fn find_products(&self) -> Result<Vec<Product>> {
        Ok(self.data.products.clone())
    }

    fn find_categories(&self) -> Result<Vec<Category>> {
        Ok(self.data.categories.clone())
    }

    fn count_inventory(&self) -> Result<u64> {
        Ok(self.data.inventory.len() as u64)
    }

    fn find_inventory(
        &self,
        filter: &InventoryFilter,
        options: &FindOptions,
    ) -> Result<Vec<InventoryItem>> {
        let matched = self
            .data
            .inventory
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        Ok(options.apply(matched, |i: &InventoryItem| i.created_at))
    }
}
