//! Dashboard facade
//!
//! Each method backs one endpoint. Independent aggregations are spawned
//! together on the blocking pool and merged by position; if any of them fails
//! the whole call fails and no partial result is returned. Nothing is retained
//! between calls.
//!
//! How much of that fan-out actually overlaps depends on the store:
//! `MemoryStore` reads in parallel, while `SqliteStore` serializes every query
//! on its single connection.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::analytics::{
    self, kpi, AnalyticsConfig, AnalyticsParams, CategoryRevenue, InventoryQuery,
    InventoryStatus, Kpis, ProductSales, ProductTrend, RecentActivity, RegionSales, SalesPoint,
    StockShare,
};
use crate::error::Result;
use crate::range::{Period, Window};
use crate::store::{OrderFilter, Store};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub sales_trends: Vec<SalesPoint>,
    pub top_selling: Vec<ProductSales>,
    pub slow_moving: Vec<ProductSales>,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryBreakdown {
    pub categories: Vec<StockShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTrends {
    pub products: Vec<ProductTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueBreakdown {
    pub categories: Vec<CategoryRevenue>,
}

/// Combined analytics view for one time range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub sales: Vec<SalesPoint>,
    pub inventory: InventoryBreakdown,
    pub products: ProductTrends,
    pub revenue: RevenueBreakdown,
}

/// Entry point for every dashboard read
#[derive(Clone)]
pub struct Dashboard {
    store: Arc<dyn Store>,
    config: AnalyticsConfig,
}

impl Dashboard {
    pub fn new(store: Arc<dyn Store>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run one synchronous read on the blocking pool
    async fn read<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Store, &AnalyticsConfig) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || f(store.as_ref(), &config)).await?
    }

    pub async fn kpis(&self) -> Result<Kpis> {
        let (users, revenue, orders, cogs, avg_stock) = tokio::try_join!(
            self.read(|s, _| s.count_users()),
            self.read(|s, _| kpi::delivered_revenue(s)),
            self.read(|s, _| s.count_orders(&OrderFilter::default())),
            self.read(|s, _| kpi::cost_of_goods_sold(s)),
            self.read(|s, _| kpi::average_stock(s)),
        )?;
        Ok(Kpis::from_parts(users, revenue, orders, cogs, avg_stock))
    }

    pub async fn charts(&self) -> Result<Charts> {
        let (sales_trends, ranked, profit_margin) = tokio::try_join!(
            self.read(|s, _| analytics::sales_trend(s, None)),
            self.read(|s, _| analytics::rank_products(s, None)),
            self.read(|s, c| analytics::profit_margin(s, c.assumed_unit_cost)),
        )?;
        let performance = analytics::split_performance(&ranked, self.config.top_n);

        Ok(Charts {
            sales_trends,
            top_selling: performance.top_selling,
            slow_moving: performance.slow_moving,
            profit_margin,
        })
    }

    /// Products ranked by units sold in the given period
    ///
    /// The period is validated before any query runs.
    pub async fn top_products(&self, period: Option<&str>) -> Result<Vec<ProductSales>> {
        let period = Period::parse_strict(period)?;
        let window = Window::resolve(Some(period));
        debug!(%period, start = %window.start, end = %window.end, "Top products window");
        self.read(move |s, _| analytics::rank_products(s, Some(&window)))
            .await
    }

    pub async fn inventory_status(&self) -> Result<InventoryStatus> {
        self.read(|s, _| analytics::inventory_status(s)).await
    }

    pub async fn recent_activity(&self) -> Result<RecentActivity> {
        self.read(|s, c| analytics::recent_activity(s, c)).await
    }

    pub async fn region_sales(&self) -> Result<Vec<RegionSales>> {
        self.read(|s, _| analytics::region_sales(s)).await
    }

    /// Sales series, stock listing, product trends and category revenue for
    /// one time range
    pub async fn analytics(&self, params: AnalyticsParams) -> Result<AnalyticsReport> {
        let window = Window::resolve(Period::parse_lenient(params.time_range.as_deref()));
        let query = InventoryQuery::from_params(&params);
        debug!(start = %window.start, end = %window.end, ?query, "Analytics window");

        let (sales, stock, trends, revenue) = tokio::try_join!(
            self.read(move |s, _| analytics::sales_trend(s, Some(&window))),
            self.read(move |s, _| analytics::inventory_listing(s, &query)),
            self.read(move |s, _| analytics::product_trends(s, &window)),
            self.read(move |s, _| analytics::revenue_by_category(s, &window)),
        )?;

        Ok(AnalyticsReport {
            sales,
            inventory: InventoryBreakdown { categories: stock },
            products: ProductTrends { products: trends },
            revenue: RevenueBreakdown {
                categories: revenue,
            },
        })
    }
}
