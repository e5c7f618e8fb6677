//! Headline KPIs over the whole store (not windowed)

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::{average, round2, unwind_items};
use crate::store::{FindOptions, InventoryFilter, OrderFilter, Store};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_users: u64,
    /// Sum of `totalAmount` over delivered orders
    pub total_revenue: f64,
    pub total_orders: u64,
    /// Cost of goods sold ÷ average stock quantity, rounded to 2 decimals
    pub inventory_turnover: f64,
}

impl Kpis {
    /// Assemble KPIs from the individual rollups
    pub fn from_parts(
        total_users: u64,
        total_revenue: f64,
        total_orders: u64,
        cost_of_goods_sold: f64,
        average_stock: Option<f64>,
    ) -> Self {
        Self {
            total_users,
            total_revenue,
            total_orders,
            inventory_turnover: inventory_turnover(cost_of_goods_sold, average_stock),
        }
    }
}

/// Turnover is `0` whenever either side of the ratio is empty or zero
pub fn inventory_turnover(cost_of_goods_sold: f64, average_stock: Option<f64>) -> f64 {
    match average_stock {
        Some(avg) if avg != 0.0 && cost_of_goods_sold != 0.0 => round2(cost_of_goods_sold / avg),
        _ => 0.0,
    }
}

/// Revenue from delivered orders only
pub fn delivered_revenue(store: &dyn Store) -> Result<f64> {
    let orders = store.find_orders(&OrderFilter::default().delivered(), &FindOptions::all())?;
    Ok(orders.iter().map(|o| o.total_amount).sum())
}

/// Σ quantity × unit price across every line item of every order
pub fn cost_of_goods_sold(store: &dyn Store) -> Result<f64> {
    let orders = store.find_orders(&OrderFilter::default(), &FindOptions::all())?;
    Ok(unwind_items(&orders).map(|item| item.revenue()).sum())
}

/// Mean inventory quantity, `None` when there is no inventory
pub fn average_stock(store: &dyn Store) -> Result<Option<f64>> {
    let items = store.find_inventory(&InventoryFilter::default(), &FindOptions::all())?;
    Ok(average(items.iter().map(|i| f64::from(i.quantity))))
}

/// Compute all KPIs sequentially against one store
pub fn compute_kpis(store: &dyn Store) -> Result<Kpis> {
    let kpis = Kpis::from_parts(
        store.count_users()?,
        delivered_revenue(store)?,
        store.count_orders(&OrderFilter::default())?,
        cost_of_goods_sold(store)?,
        average_stock(store)?,
    );
    debug!(?kpis, "KPIs computed");
    Ok(kpis)
}
