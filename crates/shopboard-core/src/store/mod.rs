//! Store access layer
//!
//! Typed, read-only queries over the five collections. Implementations filter,
//! sort on `createdAt`, and paginate; grouped aggregation happens above this
//! layer in [`crate::pipeline`].
//!
//! The store handle is opened once at startup and passed explicitly to every
//! aggregation (`Arc<dyn Store>`).

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::models::{Category, InventoryItem, Order, OrderStatus, Product, User, UserId};
use crate::range::Window;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sorting and pagination for `find_*` queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Sort by creation time; `None` keeps the store's natural order
    pub sort: Option<SortOrder>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Every matching document in natural order
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` most recently created documents
    pub fn newest(limit: usize) -> Self {
        Self {
            sort: Some(SortOrder::Desc),
            skip: 0,
            limit: Some(limit),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply sort, skip and limit to an in-memory result set
    pub(crate) fn apply<T>(
        &self,
        mut docs: Vec<T>,
        created_at: impl Fn(&T) -> DateTime<Utc>,
    ) -> Vec<T> {
        match self.sort {
            Some(SortOrder::Asc) => docs.sort_by_key(|d| created_at(d)),
            Some(SortOrder::Desc) => docs.sort_by_key(|d| std::cmp::Reverse(created_at(d))),
            None => {}
        }
        docs.into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Filter on the `users` collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Restrict to these ids (`None` = all users)
    pub ids: Option<Vec<UserId>>,
}

impl UserFilter {
    pub fn by_ids(ids: Vec<UserId>) -> Self {
        Self { ids: Some(ids) }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(&user.id))
    }
}

/// Filter on the `orders` collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Half-open bounds on `createdAt`
    pub window: Option<Window>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Orders created inside `window`, or all orders when `None`
    pub fn within(window: Option<&Window>) -> Self {
        Self {
            window: window.copied(),
            status: None,
        }
    }

    pub fn delivered(mut self) -> Self {
        self.status = Some(OrderStatus::Delivered);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.window.is_none_or(|window| window.contains(order.created_at))
            && self.status.is_none_or(|status| order.status == status)
    }
}

/// Filter on the `inventory` collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Only rows whose quantity is at or below their reorder threshold
    pub needs_reorder: bool,
}

impl InventoryFilter {
    pub fn low_stock() -> Self {
        Self {
            needs_reorder: true,
        }
    }

    pub fn matches(&self, item: &InventoryItem) -> bool {
        !self.needs_reorder || item.needs_reorder()
    }
}

/// Read-only document store
///
/// Implementations are synchronous; async callers run queries on the blocking
/// pool.
pub trait Store: Send + Sync {
    fn count_users(&self) -> Result<u64>;
    fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>>;

    fn count_orders(&self, filter: &OrderFilter) -> Result<u64>;
    fn find_orders(&self, filter: &OrderFilter, options: &FindOptions) -> Result<Vec<Order>>;

    fn find_products(&self) -> Result<Vec<Product>>;
    fn find_categories(&self) -> Result<Vec<Category>>;

    fn count_inventory(&self) -> Result<u64>;
    fn find_inventory(
        &self,
        filter: &InventoryFilter,
        options: &FindOptions,
    ) -> Result<Vec<InventoryItem>>;
}

/// Full contents of a store, as exchanged in JSON snapshot files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Snapshot {
    /// Load a snapshot document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| CoreError::SnapshotParse {
            path: path.to_path_buf(),
            message: source.to_string(),
            source,
        })
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn document_count(&self) -> usize {
        self.users.len()
            + self.orders.len()
            + self.products.len()
            + self.inventory.len()
            + self.categories.len()
    }
}
