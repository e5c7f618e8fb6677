//! Sales rollups: daily trend, regional totals, profit margin
//!
//! Days are UTC calendar dates (`YYYY-MM-DD`). The trend series is sparse:
//! days without delivered orders are absent, not zero-filled.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::error::Result;
use crate::models::Order;
use crate::pipeline::{sum_by, sum_by_ordered, unwind_items};
use crate::range::Window;
use crate::store::{FindOptions, OrderFilter, Store};

/// Country label for orders without a shipping address
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Revenue of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint {
    pub date: String,
    pub value: f64,
}

/// Revenue per UTC day from delivered orders, ascending by date
///
/// `window = None` covers all time.
pub fn sales_trend(store: &dyn Store, window: Option<&Window>) -> Result<Vec<SalesPoint>> {
    let orders = store.find_orders(
        &OrderFilter::within(window).delivered(),
        &FindOptions::all(),
    )?;

    let daily = sum_by_ordered(
        orders.iter(),
        |o| o.created_at.date_naive().format("%Y-%m-%d").to_string(),
        |o| o.total_amount,
    );

    let series: Vec<SalesPoint> = daily
        .into_iter()
        .map(|(date, value)| SalesPoint { date, value })
        .collect();

    debug!(days = series.len(), "Sales trend computed");
    Ok(series)
}

/// Order totals for one shipping country
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSales {
    pub country: String,
    pub total_sales: f64,
    pub order_count: u64,
}

/// All orders grouped by shipping country, largest total first
pub fn region_sales(store: &dyn Store) -> Result<Vec<RegionSales>> {
    let orders = store.find_orders(&OrderFilter::default(), &FindOptions::all())?;

    let country = |o: &&Order| {
        o.shipping_address
            .as_ref()
            .map(|a| a.country.clone())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    };
    let totals = sum_by(orders.iter(), country, |o| o.total_amount);
    let counts = sum_by(orders.iter(), country, |_| 1u64);

    let mut regions: Vec<RegionSales> = totals
        .into_iter()
        .map(|(country, total_sales)| RegionSales {
            order_count: counts.get(&country).copied().unwrap_or_default(),
            country,
            total_sales,
        })
        .collect();

    regions.sort_by(|a, b| {
        b.total_sales
            .partial_cmp(&a.total_sales)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });

    Ok(regions)
}

/// Profit margin in percent over every line item ever sold
///
/// Unit cost is not tracked per product, so a flat `unit_cost` is assumed.
/// Returns `0` when there is no revenue.
pub fn profit_margin(store: &dyn Store, unit_cost: f64) -> Result<f64> {
    let orders = store.find_orders(&OrderFilter::default(), &FindOptions::all())?;

    let (revenue, cost) = unwind_items(&orders).fold((0.0, 0.0), |(revenue, cost), item| {
        (revenue + item.revenue(), cost + f64::from(item.quantity) * unit_cost)
    });

    if revenue == 0.0 {
        return Ok(0.0);
    }
    Ok((revenue - cost) / revenue * 100.0)
}
