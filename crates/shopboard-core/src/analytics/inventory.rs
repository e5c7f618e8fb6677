//! Inventory rollups: stock-status buckets and the filtered stock listing

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use super::AnalyticsParams;
use crate::error::Result;
use crate::models::{Category, Product};
use crate::pipeline::{index_by, share};
use crate::store::{FindOptions, InventoryFilter, SortOrder, Store};

/// Quantities strictly above this are `available`
pub const LOW_STOCK_CEILING: u32 = 10;

/// Disjoint stock-status bucket of one inventory row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBucket {
    Available,
    LowStock,
    OutOfStock,
}

impl StockBucket {
    /// Fixed thresholds, independent of the row's own reorder threshold
    pub fn classify(quantity: u32) -> Self {
        match quantity {
            0 => StockBucket::OutOfStock,
            q if q <= LOW_STOCK_CEILING => StockBucket::LowStock,
            _ => StockBucket::Available,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatus {
    pub available: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

impl InventoryStatus {
    pub fn total(&self) -> u64 {
        self.available + self.low_stock + self.out_of_stock
    }
}

/// Count inventory rows per bucket in a single scan
pub fn inventory_status(store: &dyn Store) -> Result<InventoryStatus> {
    let items = store.find_inventory(&InventoryFilter::default(), &FindOptions::all())?;

    let status = items
        .iter()
        .fold(InventoryStatus::default(), |mut acc, item| {
            match StockBucket::classify(item.quantity) {
                StockBucket::Available => acc.available += 1,
                StockBucket::LowStock => acc.low_stock += 1,
                StockBucket::OutOfStock => acc.out_of_stock += 1,
            }
            acc
        });

    debug!(?status, "Inventory status computed");
    Ok(status)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventorySortField {
    #[default]
    Name,
    Stock,
}

/// Filters, sorting and paging for the stock listing
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    /// Case-insensitive pattern on the product name
    pub search: Option<Regex>,
    /// Exact category name
    pub category: Option<String>,
    pub sort_field: InventorySortField,
    pub sort_order: SortOrder,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl InventoryQuery {
    /// Build from raw request parameters, silently defaulting bad values
    pub fn from_params(params: &AnalyticsParams) -> Self {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let count = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<usize>().ok());

        Self {
            search: non_empty(&params.search).and_then(|s| search_pattern(&s)),
            category: non_empty(&params.category),
            sort_field: match params.sort_field.as_deref() {
                Some("stock") => InventorySortField::Stock,
                _ => InventorySortField::Name,
            },
            sort_order: match params.sort_order.as_deref() {
                Some("desc") => SortOrder::Desc,
                _ => SortOrder::Asc,
            },
            skip: count(&params.skip).unwrap_or(0),
            limit: count(&params.limit),
        }
    }
}

/// Case-insensitive regex, or a literal match if `pattern` is not valid regex
fn search_pattern(pattern: &str) -> Option<Regex> {
    let build = |p: &str| RegexBuilder::new(p).case_insensitive(true).build();
    build(pattern)
        .or_else(|_| build(&regex::escape(pattern)))
        .ok()
}

/// One row of the stock listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockShare {
    pub name: String,
    pub stock: u64,
    /// Share of the returned page's total stock
    pub stock_percentage: f64,
}

fn in_category(product: &Product, categories: &[Category], wanted: &str) -> bool {
    categories
        .iter()
        .any(|c| c.name == wanted && product.categories.contains(&c.id))
}

/// Inventory rows joined to their products, filtered, sorted and paged
pub fn inventory_listing(store: &dyn Store, query: &InventoryQuery) -> Result<Vec<StockShare>> {
    let items = store.find_inventory(&InventoryFilter::default(), &FindOptions::all())?;
    let products = store.find_products()?;
    let categories = match query.category {
        Some(_) => store.find_categories()?,
        None => Vec::new(),
    };
    let catalog = index_by(&products, |p| &p.id);

    let mut rows: Vec<(String, u64)> = items
        .iter()
        .filter_map(|item| catalog.get(&item.product_id).map(|p| (item, *p)))
        .filter(|(_, product)| {
            query
                .category
                .as_deref()
                .is_none_or(|wanted| in_category(product, &categories, wanted))
        })
        .filter(|(_, product)| query.search.as_ref().is_none_or(|re| re.is_match(&product.name)))
        .map(|(item, product)| (product.name.clone(), u64::from(item.quantity)))
        .collect();

    rows.sort_by(|a, b| {
        let ord = match query.sort_field {
            InventorySortField::Name => a.0.cmp(&b.0),
            InventorySortField::Stock => a.1.cmp(&b.1),
        };
        match query.sort_order {
            SortOrder::Desc => ord.reverse(),
            SortOrder::Asc => ord,
        }
    });

    let page: Vec<(String, u64)> = rows
        .into_iter()
        .skip(query.skip)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    let total: u64 = page.iter().map(|(_, stock)| stock).sum();

    Ok(page
        .into_iter()
        .map(|(name, stock)| StockShare {
            stock_percentage: share(stock as f64, total as f64),
            name,
            stock,
        })
        .collect())
}
