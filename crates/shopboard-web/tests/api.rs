//! Integration tests for the dashboard HTTP API

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shopboard_core::{AnalyticsConfig, Dashboard, MemoryStore, Snapshot, SqliteStore};
use std::sync::Arc;
use tower::ServiceExt;

const SAMPLE: &str = include_str!("../../../demos/sample-store.json");

fn sample_router() -> Router {
    let store = MemoryStore::new(Snapshot::parse(SAMPLE).unwrap());
    shopboard_web::create_router(Dashboard::new(Arc::new(store), AnalyticsConfig::default()))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(sample_router(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_kpis_json_shape() {
    let (status, body) = get(sample_router(), "/api/dashboard/kpis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 4);
    assert_eq!(body["totalOrders"], 6);
    assert_eq!(body["totalRevenue"], 149.0);
    assert_eq!(body["inventoryTurnover"], 14.11);
}

#[tokio::test]
async fn test_charts_json_shape() {
    let (status, body) = get(sample_router(), "/api/dashboard/charts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salesTrends"][0]["date"], "2024-03-01");
    assert_eq!(body["salesTrends"][0]["value"], 125.0);
    assert_eq!(body["topSelling"][0]["productName"], "Mystery Novel");
    assert_eq!(body["topSelling"][0]["totalSold"], 5);
    assert_eq!(body["slowMoving"].as_array().unwrap().len(), 5);
    assert!(body["profitMargin"].is_f64());
}

#[tokio::test]
async fn test_top_products_rejects_unknown_period() {
    for uri in [
        "/api/dashboard/top-products?period=yearly",
        "/api/dashboard/top-products",
    ] {
        let (status, body) = get(sample_router(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body["error"],
            "Invalid period. Use daily, weekly, or monthly."
        );
    }
}

#[tokio::test]
async fn test_top_products_wraps_data() {
    let (status, body) = get(sample_router(), "/api/dashboard/top-products?period=weekly").await;

    assert_eq!(status, StatusCode::OK);
    // sample orders are from 2024, outside any current window
    assert_eq!(body["data"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_inventory_status() {
    let (status, body) = get(sample_router(), "/api/dashboard/inventory-status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], 2);
    assert_eq!(body["data"]["lowStock"], 2);
    assert_eq!(body["data"]["outOfStock"], 1);
}

#[tokio::test]
async fn test_recent_activity_embeds_references() {
    let (status, body) = get(sample_router(), "/api/dashboard/recent-activity").await;
    assert_eq!(status, StatusCode::OK);

    let orders = body["data"]["recentOrders"].as_array().unwrap();
    assert_eq!(orders.len(), 5);
    assert_eq!(orders[0]["id"], "order-6");
    assert_eq!(orders[0]["totalAmount"], 30.0);
    assert_eq!(orders[0]["user"]["name"], "Di");
    assert_eq!(orders[0]["user"]["email"], "di@shop.test");
    assert!(orders[1]["user"].is_null());

    assert_eq!(body["data"]["newUsers"][0]["createdAt"], "2024-03-01T08:00:00Z");

    let alerts = body["data"]["lowStockAlerts"].as_array().unwrap();
    assert_eq!(alerts[0]["productId"], "prod-chess");
    assert_eq!(alerts[0]["product"]["name"], "Chess Set");
}

#[tokio::test]
async fn test_analytics_defaults() {
    let (status, body) = get(sample_router(), "/api/analytics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["sales"].is_array());
    assert!(body["products"]["products"].is_array());
    assert!(body["revenue"]["categories"].is_array());

    let stock = body["inventory"]["categories"].as_array().unwrap();
    assert_eq!(stock.len(), 5);
    assert_eq!(stock[0]["name"], "Card Game");
    assert!(stock[0]["stockPercentage"].is_number());
}

#[tokio::test]
async fn test_analytics_malformed_params_fall_back() {
    let (status, body) = get(
        sample_router(),
        "/api/analytics?timeRange=yearly&sortField=price&sortOrder=up&limit=abc&skip=-1&search=%5B",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // "[" is matched literally, so nothing matches
    assert_eq!(body["inventory"]["categories"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_analytics_listing_filters() {
    let (status, body) = get(
        sample_router(),
        "/api/analytics?category=Games&sortField=stock&sortOrder=desc&limit=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["inventory"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Jigsaw Puzzle", "Chess Set"]);
}

#[tokio::test]
async fn test_repeated_query_keys_keep_first_value() {
    let (status, body) = get(
        sample_router(),
        "/api/analytics?category=Games&sortField=stock&sortOrder=desc&limit=1&limit=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"]["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["inventory"]["categories"][0]["name"], "Jigsaw Puzzle");

    let (status, body) =
        get(sample_router(), "/api/dashboard/top-products?period=daily&period=weekly").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_array());

    let (status, body) =
        get(sample_router(), "/api/dashboard/top-products?period=yearly&period=daily").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid period. Use daily, weekly, or monthly.");
}

#[tokio::test]
async fn test_region_sales() {
    let (status, body) = get(sample_router(), "/api/sales/region-sales").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["country"], "France");
    assert_eq!(body[0]["totalSales"], 125.0);
    assert_eq!(body[0]["orderCount"], 2);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("shop.db");
    let store = SqliteStore::open(&path).unwrap();

    // Corrupt one stored document behind the store's back
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO users (id, created_at, doc) VALUES ('broken', '2024-01-01T00:00:00.000000Z', 'not json')",
        [],
    )
    .unwrap();
    drop(conn);

    let router =
        shopboard_web::create_router(Dashboard::new(Arc::new(store), AnalyticsConfig::default()));
    let (status, body) = get(router, "/api/dashboard/recent-activity").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error fetching recent activity");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/api/dashboard/kpis")
        .header(header::ORIGIN, "http://admin.example")
        .body(Body::empty())
        .unwrap();
    let response = sample_router().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
