//! Web router using Axum

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use shopboard_core::analytics::{
    InventoryStatus, Kpis, ProductSales, RecentActivity, RegionSales,
};
use shopboard_core::{AnalyticsParams, AnalyticsReport, Charts, Dashboard};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResultExt};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Decoded query pairs in request order
///
/// Repeated keys are kept rather than rejected so handlers can pick the
/// first value themselves.
type QueryPairs = Query<Vec<(String, String)>>;

/// Envelope used by the list-style dashboard endpoints
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Create the web router
pub fn create_router(dashboard: Dashboard) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dashboard_routes = Router::new()
        .route("/kpis", get(kpis_handler))
        .route("/charts", get(charts_handler))
        .route("/top-products", get(top_products_handler))
        .route("/inventory-status", get(inventory_status_handler))
        .route("/recent-activity", get(recent_activity_handler));

    Router::new()
        .route("/api/health", get(health_handler))
        .nest("/api/dashboard", dashboard_routes)
        .route("/api/analytics", get(analytics_handler))
        .route("/api/sales/region-sales", get(region_sales_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(dashboard)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn kpis_handler(State(dashboard): State<Dashboard>) -> ApiResult<Kpis> {
    let kpis = dashboard.kpis().await.or_api("Error fetching KPIs")?;
    Ok(Json(kpis))
}

async fn charts_handler(State(dashboard): State<Dashboard>) -> ApiResult<Charts> {
    let charts = dashboard.charts().await.or_api("Error fetching charts")?;
    Ok(Json(charts))
}

async fn top_products_handler(
    State(dashboard): State<Dashboard>,
    Query(pairs): QueryPairs,
) -> ApiResult<Data<Vec<ProductSales>>> {
    let period = pairs
        .iter()
        .find(|(key, _)| key == "period")
        .map(|(_, value)| value.as_str());
    let data = dashboard
        .top_products(period)
        .await
        .or_api("Server error while fetching product performance")?;
    Ok(Json(Data { data }))
}

async fn inventory_status_handler(
    State(dashboard): State<Dashboard>,
) -> ApiResult<Data<InventoryStatus>> {
    let data = dashboard
        .inventory_status()
        .await
        .or_api("Error fetching inventory status")?;
    Ok(Json(Data { data }))
}

async fn recent_activity_handler(
    State(dashboard): State<Dashboard>,
) -> ApiResult<Data<RecentActivity>> {
    let data = dashboard
        .recent_activity()
        .await
        .or_api("Error fetching recent activity")?;
    Ok(Json(Data { data }))
}

/// Malformed parameters fall back to their defaults
async fn analytics_handler(
    State(dashboard): State<Dashboard>,
    Query(pairs): QueryPairs,
) -> ApiResult<AnalyticsReport> {
    let report = dashboard
        .analytics(AnalyticsParams::from_pairs(pairs))
        .await
        .or_api("Error fetching analytics")?;
    Ok(Json(report))
}

async fn region_sales_handler(State(dashboard): State<Dashboard>) -> ApiResult<Vec<RegionSales>> {
    let regions = dashboard
        .region_sales()
        .await
        .or_api("Error fetching sales by region")?;
    Ok(Json(regions))
}
