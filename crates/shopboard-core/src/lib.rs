//! shopboard-core - Core library for shopboard
//!
//! Provides the read-only store access layer, date-range resolution, and the
//! analytics aggregations behind the e-commerce admin dashboard.

pub mod analytics;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod range;
pub mod store;

pub use analytics::{AnalyticsConfig, AnalyticsParams};
pub use dashboard::{AnalyticsReport, Charts, Dashboard};
pub use error::CoreError;
pub use range::{Period, Window};
pub use store::{MemoryStore, Snapshot, SqliteStore, Store};
