//! Revenue broken down by product category

use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::{index_by, share, sum_by, unwind_items};
use crate::range::Window;
use crate::store::{FindOptions, OrderFilter, Store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub name: String,
    pub value: f64,
    /// Share of the summed category revenue
    pub percentage: f64,
}

/// Line-item revenue per category for orders inside `window`
///
/// A line item counts in full towards every category of its product; there is
/// no proportional split, so the summed category revenue can exceed order
/// revenue. Percentages are shares of that sum and are all `0` when it is `0`.
pub fn revenue_by_category(store: &dyn Store, window: &Window) -> Result<Vec<CategoryRevenue>> {
    let orders = store.find_orders(&OrderFilter::within(Some(window)), &FindOptions::all())?;
    let products = store.find_products()?;
    let categories = store.find_categories()?;

    let product_index = index_by(&products, |p| &p.id);
    let category_index = index_by(&categories, |c| &c.id);

    let contributions = unwind_items(&orders)
        .filter_map(|item| {
            let product = product_index.get(&item.product_id);
            if product.is_none() {
                warn!(product_id = %item.product_id, "Line item references unknown product, skipping");
            }
            product.map(|p| (item, *p))
        })
        .flat_map(|(item, product)| {
            product
                .categories
                .iter()
                .filter_map(|id| category_index.get(id))
                .map(move |category| (category.name.as_str(), item.revenue()))
        });

    let totals = sum_by(contributions, |c| c.0, |c| c.1);
    let total: f64 = totals.values().sum();

    let mut breakdown: Vec<CategoryRevenue> = totals
        .into_iter()
        .map(|(name, value)| CategoryRevenue {
            name: name.to_string(),
            value,
            percentage: share(value, total),
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!(categories = breakdown.len(), total, "Revenue by category computed");
    Ok(breakdown)
}
