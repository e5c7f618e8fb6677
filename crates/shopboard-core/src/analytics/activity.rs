//! Recent activity feed: newest orders, newest users, low-stock alerts
//!
//! Plain bounded reads, not windowed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AnalyticsConfig;
use crate::error::Result;
use crate::models::{InventoryItem, Order, UserContact, UserId};
use crate::pipeline::index_by;
use crate::store::{FindOptions, InventoryFilter, OrderFilter, Store, UserFilter};

/// An order with its owner's contact details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrder {
    #[serde(flatten)]
    pub order: Order,
    /// `None` when the owning user no longer exists
    pub user: Option<UserContact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductName {
    pub name: String,
}

/// An inventory row at or below its reorder threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub product: Option<ProductName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_orders: Vec<RecentOrder>,
    pub new_users: Vec<NewUser>,
    pub low_stock_alerts: Vec<LowStockAlert>,
}

pub fn recent_orders(store: &dyn Store, limit: usize) -> Result<Vec<RecentOrder>> {
    let orders = store.find_orders(&OrderFilter::default(), &FindOptions::newest(limit))?;

    let mut owner_ids: Vec<UserId> = orders.iter().map(|o| o.user_id.clone()).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners = store.find_users(&UserFilter::by_ids(owner_ids), &FindOptions::all())?;
    let owner_index = index_by(&owners, |u| &u.id);

    Ok(orders
        .into_iter()
        .map(|order| RecentOrder {
            user: owner_index.get(&order.user_id).map(|u| UserContact::from(*u)),
            order,
        })
        .collect())
}

pub fn new_users(store: &dyn Store, limit: usize) -> Result<Vec<NewUser>> {
    let users = store.find_users(&UserFilter::default(), &FindOptions::newest(limit))?;
    Ok(users
        .into_iter()
        .map(|u| NewUser {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        })
        .collect())
}

/// First `limit` rows needing reorder, in store order
pub fn low_stock_alerts(store: &dyn Store, limit: usize) -> Result<Vec<LowStockAlert>> {
    let items = store.find_inventory(
        &InventoryFilter::low_stock(),
        &FindOptions::all().with_limit(limit),
    )?;
    let products = store.find_products()?;
    let catalog = index_by(&products, |p| &p.id);

    Ok(items
        .into_iter()
        .map(|item| LowStockAlert {
            product: catalog.get(&item.product_id).map(|p| ProductName {
                name: p.name.clone(),
            }),
            item,
        })
        .collect())
}

pub fn recent_activity(store: &dyn Store, config: &AnalyticsConfig) -> Result<RecentActivity> {
    Ok(RecentActivity {
        recent_orders: recent_orders(store, config.recent_limit)?,
        new_users: new_users(store, config.recent_limit)?,
        low_stock_alerts: low_stock_alerts(store, config.low_stock_limit)?,
    })
}
