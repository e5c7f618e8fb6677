//! Product performance: units sold ranking and period-over-period trend

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Order, ProductId};
use crate::pipeline::{index_by, round_half_up, sum_by, unwind_items};
use crate::range::Window;
use crate::store::{FindOptions, OrderFilter, Store};

/// Name reported for line items whose product no longer exists
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Units sold of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_sold: u64,
}

/// Top and bottom slices of one ranked list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub top_selling: Vec<ProductSales>,
    pub slow_moving: Vec<ProductSales>,
}

/// Units sold per product across the line items of `orders`
fn units_by_product(orders: &[Order]) -> HashMap<ProductId, u64> {
    sum_by(
        unwind_items(orders),
        |item| item.product_id.clone(),
        |item| u64::from(item.quantity),
    )
}

/// Products ranked by units sold within `window`, best first
///
/// Line items whose product is missing from the catalog are dropped. Ties are
/// broken by name so the ranking is stable.
pub fn rank_products(store: &dyn Store, window: Option<&Window>) -> Result<Vec<ProductSales>> {
    let orders = store.find_orders(&OrderFilter::within(window), &FindOptions::all())?;
    let products = store.find_products()?;
    let catalog = index_by(&products, |p| &p.id);

    let mut ranked: Vec<ProductSales> = units_by_product(&orders)
        .into_iter()
        .filter_map(|(product_id, total_sold)| {
            let Some(product) = catalog.get(&product_id) else {
                warn!(%product_id, "Line item references unknown product, skipping");
                return None;
            };
            Some(ProductSales {
                product_name: product.name.clone(),
                product_id,
                total_sold,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then_with(|| a.product_name.cmp(&b.product_name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    debug!(products = ranked.len(), "Products ranked");
    Ok(ranked)
}

/// First `n` and last `n` entries of the same ranked list
///
/// With fewer than `2n` products the two slices overlap.
pub fn split_performance(ranked: &[ProductSales], n: usize) -> ProductPerformance {
    let top_selling = ranked.iter().take(n).cloned().collect();
    let slow_moving = ranked[ranked.len().saturating_sub(n)..].to_vec();
    ProductPerformance {
        top_selling,
        slow_moving,
    }
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trending {
    Up,
    Down,
}

/// Units sold this window compared with the preceding one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTrend {
    pub id: ProductId,
    pub name: String,
    pub sales: u64,
    pub trending: Trending,
    /// Percentage change, halves rounded up
    pub percentage: i64,
}

/// Percentage change from `previous` to `current`
///
/// Growth from zero is reported as exactly `100`. Only a strictly positive
/// change counts as `Up`; no change is `Down`.
pub fn trend_percentage(current: u64, previous: u64) -> (f64, Trending) {
    let percentage = if previous == 0 {
        100.0
    } else {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    };
    let trending = if percentage > 0.0 {
        Trending::Up
    } else {
        Trending::Down
    };
    (percentage, trending)
}

/// Per-product trend for every product sold within `window`
pub fn product_trends(store: &dyn Store, window: &Window) -> Result<Vec<ProductTrend>> {
    let previous_window = window.previous();
    let current = store.find_orders(&OrderFilter::within(Some(window)), &FindOptions::all())?;
    let previous =
        store.find_orders(&OrderFilter::within(Some(&previous_window)), &FindOptions::all())?;
    let products = store.find_products()?;
    let catalog = index_by(&products, |p| &p.id);

    let previous_units = units_by_product(&previous);

    let mut trends: Vec<ProductTrend> = units_by_product(&current)
        .into_iter()
        .map(|(id, sales)| {
            let before = previous_units.get(&id).copied().unwrap_or_default();
            let (percentage, trending) = trend_percentage(sales, before);
            ProductTrend {
                name: catalog
                    .get(&id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                id,
                sales,
                trending,
                percentage: round_half_up(percentage),
            }
        })
        .collect();

    trends.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.id.cmp(&b.id)));

    debug!(products = trends.len(), "Product trends computed");
    Ok(trends)
}
