//! SQLite document store
//!
//! Each collection is a table of JSON documents:
//!
//! ```sql
//! CREATE TABLE orders (id TEXT PRIMARY KEY, created_at TEXT NOT NULL, doc TEXT NOT NULL);
//! ```
//!
//! `created_at` is a fixed-width RFC 3339 string (microseconds, `Z`), so
//! string comparison orders it chronologically. Field filters reach into the
//! document with `json_extract`.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::{
    FindOptions, InventoryFilter, OrderFilter, Snapshot, SortOrder, Store, UserFilter,
};
use crate::error::{CoreError, Result};
use crate::models::{Category, InventoryItem, Order, Product, User};

const USERS: &str = "users";
const ORDERS: &str = "orders";
const PRODUCTS: &str = "products";
const INVENTORY: &str = "inventory";
const CATEGORIES: &str = "categories";

const COLLECTIONS: [&str; 5] = [USERS, ORDERS, PRODUCTS, INVENTORY, CATEGORIES];

/// SQLite-backed document store (thread-safe)
///
/// One connection behind a mutex, so concurrent readers take turns.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// A WHERE clause and its positional parameters
#[derive(Default)]
struct Clause {
    conditions: Vec<String>,
    params: Vec<String>,
}

impl Clause {
    fn push(&mut self, condition: impl Into<String>, param: Option<String>) {
        self.conditions.push(condition.into());
        self.params.extend(param);
    }

    fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SqliteStore {
    /// Create or open a store database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(CoreError::sqlite("open database"))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(CoreError::sqlite("enable WAL mode"))?;

        let store = Self::init(conn)?;
        info!(path = %path.display(), "Opened SQLite document store");
        Ok(store)
    }

    /// Transient store, used by tests and one-off imports
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(CoreError::sqlite("open database"))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        let schema: String = COLLECTIONS
            .iter()
            .map(|table| {
                format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        id TEXT PRIMARY KEY,
                        created_at TEXT NOT NULL,
                        doc TEXT NOT NULL
                    );
                    CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at);"
                )
            })
            .collect();

        conn.execute_batch(&schema)
            .map_err(CoreError::sqlite("create schema"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Upsert every document of a snapshot in one transaction
    ///
    /// Returns the number of documents written.
    pub fn import_snapshot(&self, snapshot: &Snapshot) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(CoreError::sqlite("begin import"))?;

        let mut written = 0;
        written += insert_docs(&tx, USERS, &snapshot.users, |u| (u.id.as_str(), &u.created_at))?;
        written += insert_docs(&tx, ORDERS, &snapshot.orders, |o| (o.id.as_str(), &o.created_at))?;
        written += insert_docs(&tx, PRODUCTS, &snapshot.products, |p| {
            (p.id.as_str(), &p.created_at)
        })?;
        written += insert_docs(&tx, INVENTORY, &snapshot.inventory, |i| {
            (i.id.as_str(), &i.created_at)
        })?;
        written += insert_docs(&tx, CATEGORIES, &snapshot.categories, |c| {
            (c.id.as_str(), &c.created_at)
        })?;

        tx.commit().map_err(CoreError::sqlite("commit import"))?;

        info!(documents = written, "Snapshot imported");
        Ok(written)
    }

    fn count(&self, collection: &'static str, clause: &Clause) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {collection}{}", clause.to_sql());
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(&sql, params_from_iter(clause.params.iter()), |row| row.get(0))
            .map_err(CoreError::sqlite("count documents"))?;
        Ok(count.max(0) as u64)
    }

    fn find<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        clause: &Clause,
        options: &FindOptions,
    ) -> Result<Vec<T>> {
        let order = match options.sort {
            Some(SortOrder::Asc) => "created_at ASC, rowid ASC",
            Some(SortOrder::Desc) => "created_at DESC, rowid ASC",
            None => "rowid ASC",
        };
        let limit = options
            .limit
            .and_then(|l| i64::try_from(l).ok())
            .unwrap_or(-1);
        let skip = i64::try_from(options.skip).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT id, doc FROM {collection}{} ORDER BY {order} LIMIT {limit} OFFSET {skip}",
            clause.to_sql()
        );

        let rows: Vec<(String, String)> = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare(&sql)
                .map_err(CoreError::sqlite("prepare find"))?;
            let mapped = stmt
                .query_map(params_from_iter(clause.params.iter()), |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .map_err(CoreError::sqlite("run find"))?;
            mapped
                .collect::<rusqlite::Result<_>>()
                .map_err(CoreError::sqlite("read row"))?
        };

        debug!(collection, rows = rows.len(), "Documents fetched");

        rows.into_iter()
            .map(|(id, doc)| {
                serde_json::from_str(&doc).map_err(|source| CoreError::Document {
                    collection,
                    id,
                    source,
                })
            })
            .collect()
    }
}

fn insert_docs<T: Serialize>(
    tx: &Transaction<'_>,
    collection: &'static str,
    docs: &[T],
    key: impl Fn(&T) -> (&str, &DateTime<Utc>),
) -> Result<usize> {
    let sql = format!("INSERT OR REPLACE INTO {collection} (id, created_at, doc) VALUES (?, ?, ?)");
    let mut stmt = tx
        .prepare(&sql)
        .map_err(CoreError::sqlite("prepare insert"))?;

    for doc in docs {
        let (id, created_at) = key(doc);
        let json = serde_json::to_string(doc).map_err(|source| CoreError::Document {
            collection,
            id: id.to_string(),
            source,
        })?;
        stmt.execute(params![id, timestamp(created_at), json])
            .map_err(CoreError::sqlite("insert document"))?;
    }

    Ok(docs.len())
}

fn order_clause(filter: &OrderFilter) -> Clause {
    let mut clause = Clause::default();
    if let Some(window) = &filter.window {
        clause.push("created_at >= ?", Some(timestamp(&window.start)));
        clause.push("created_at < ?", Some(timestamp(&window.end)));
    }
    if let Some(status) = filter.status {
        clause.push(
            "json_extract(doc, '$.status') = ?",
            Some(status.as_str().to_string()),
        );
    }
    clause
}

fn user_clause(filter: &UserFilter) -> Clause {
    let mut clause = Clause::default();
    if let Some(ids) = &filter.ids {
        if ids.is_empty() {
            clause.push("0", None);
        } else {
            let placeholders = vec!["?"; ids.len()].join(", ");
            clause.conditions.push(format!("id IN ({placeholders})"));
            clause
                .params
                .extend(ids.iter().map(|id| id.as_str().to_string()));
        }
    }
    clause
}

fn inventory_clause(filter: &InventoryFilter) -> Clause {
    let mut clause = Clause::default();
    if filter.needs_reorder {
        clause.push(
            "json_extract(doc, '$.quantity') <= json_extract(doc, '$.threshold')",
            None,
        );
    }
    clause
}

impl Store for SqliteStore {
    fn count_users(&self) -> Result<u64> {
        self.count(USERS, &Clause::default())
    }

    fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>> {
        self.find(USERS, &user_clause(filter), options)
    }

    fn count_orders(&self, filter: &OrderFilter) -> Result<u64> {
        self.count(ORDERS, &order_clause(filter))
    }

    fn find_orders(&self, filter: &OrderFilter, options: &FindOptions) -> Result<Vec<Order>> {
        self.find(ORDERS, &order_clause(filter), options)
    }

    fn find_products(&self) -> Result<Vec<Product>> {
        self.find(PRODUCTS, &Clause::default(), &FindOptions::all())
    }

    fn find_categories(&self) -> Result<Vec<Category>> {
        self.find(CATEGORIES, &Clause::default(), &FindOptions::all())
    }

    fn count_inventory(&self) -> Result<u64> {
        self.count(INVENTORY, &Clause::default())
    }

    fn find_inventory(
        &self,
        filter: &InventoryFilter,
        options: &FindOptions,
    ) -> Result<Vec<InventoryItem>> {
        self.find(INVENTORY, &inventory_clause(filter), options)
    }
}
