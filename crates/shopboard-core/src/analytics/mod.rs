//! Analytics aggregations for the admin dashboard
//!
//! Every function here is a pure read: given the same store contents and the
//! same parameters it returns the same result. Nothing is cached; each request
//! recomputes from the store.

pub mod activity;
pub mod inventory;
pub mod kpi;
pub mod products;
pub mod revenue;
pub mod sales;


pub use activity::{recent_activity, LowStockAlert, NewUser, ProductName, RecentActivity, RecentOrder};
pub use inventory::{
    inventory_listing, inventory_status, InventoryQuery, InventorySortField, InventoryStatus,
    StockBucket, StockShare,
};
pub use kpi::{compute_kpis, Kpis};
pub use products::{
    product_trends, rank_products, split_performance, trend_percentage, ProductPerformance,
    ProductSales, ProductTrend, Trending,
};
pub use revenue::{revenue_by_category, CategoryRevenue};
pub use sales::{profit_margin, region_sales, sales_trend, RegionSales, SalesPoint};

/// Tunables for the aggregations
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Cost assumed per unit sold when computing profit margin
    pub assumed_unit_cost: f64,
    /// Length of the top-selling and slow-moving lists
    pub top_n: usize,
    /// Recent orders and new users listed in the activity feed
    pub recent_limit: usize,
    /// Low-stock alerts listed in the activity feed
    pub low_stock_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            assumed_unit_cost: 10.0,
            top_n: 5,
            recent_limit: 5,
            low_stock_limit: 5,
        }
    }
}

/// Raw query parameters of the combined analytics endpoint
///
/// Everything stays a string so malformed values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsParams {
    pub time_range: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl AnalyticsParams {
    /// Collect parameters from decoded query pairs
    ///
    /// Unknown keys are ignored. A repeated key keeps its first value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "timeRange" => &mut params.time_range,
                "search" => &mut params.search,
                "sortField" => &mut params.sort_field,
                "sortOrder" => &mut params.sort_order,
                "category" => &mut params.category,
                "limit" => &mut params.limit,
                "skip" => &mut params.skip,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}
