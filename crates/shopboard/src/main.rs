//! shopboard - E-commerce admin dashboard analytics

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use shopboard_core::analytics::Kpis;
use shopboard_core::{AnalyticsConfig, Dashboard, MemoryStore, Snapshot, SqliteStore, Store};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "shopboard=info,tower_http=info";

#[derive(Parser)]
#[command(
    name = "shopboard",
    version,
    about = "E-commerce admin dashboard analytics",
    long_about = "Read-only analytics API over an e-commerce store: KPIs, sales trends,\n\
                  product performance, inventory status and category revenue.\n\
                  \n\
                  Examples:\n\
                    shopboard --data demos/sample-store.json               # Serve API (default)\n\
                    shopboard --database shop.db web --port 8080           # Custom port\n\
                    shopboard --database shop.db import snapshot.json      # Load a snapshot\n\
                    shopboard --data demos/sample-store.json kpis --json   # Print KPIs\n\
                  \n\
                  Environment Variables:\n\
                    SHOPBOARD_DATA                   # JSON snapshot path\n\
                    SHOPBOARD_DATABASE               # SQLite store path\n\
                    SHOPBOARD_UNIT_COST              # Assumed unit cost for profit margin\n\
                    RUST_LOG                         # Log filter (default: shopboard=info)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// JSON snapshot served from memory
    #[arg(long, env = "SHOPBOARD_DATA", conflicts_with = "database")]
    data: Option<PathBuf>,

    /// SQLite document store
    #[arg(long, env = "SHOPBOARD_DATABASE")]
    database: Option<PathBuf>,

    /// Cost assumed per unit sold when computing profit margin
    #[arg(long, env = "SHOPBOARD_UNIT_COST", default_value_t = AnalyticsConfig::default().assumed_unit_cost)]
    unit_cost: f64,
}

#[derive(Subcommand)]
enum Mode {
    /// Serve the dashboard API (default)
    Web {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port for web server
        #[arg(long, default_value = "3333")]
        port: u16,
    },
    /// Print headline KPIs and exit
    Kpis {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a JSON snapshot into the SQLite store
    Import {
        /// Snapshot file to import
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AnalyticsConfig {
        assumed_unit_cost: cli.unit_cost,
        ..Default::default()
    };

    let mode = cli.mode.unwrap_or(Mode::Web {
        host: IpAddr::from([127, 0, 0, 1]),
        port: 3333,
    });

    match mode {
        Mode::Web { host, port } => {
            let store = open_store(cli.data, cli.database)?;
            run_web(Dashboard::new(store, config), SocketAddr::new(host, port)).await?;
        }
        Mode::Kpis { json } => {
            let store = open_store(cli.data, cli.database)?;
            run_kpis(Dashboard::new(store, config), json).await?;
        }
        Mode::Import { snapshot } => {
            let Some(database) = cli.database else {
                bail!("import needs a SQLite store: pass --database or set SHOPBOARD_DATABASE");
            };
            run_import(&database, &snapshot)?;
        }
    }

    Ok(())
}

/// Open whichever store the flags select
fn open_store(data: Option<PathBuf>, database: Option<PathBuf>) -> Result<Arc<dyn Store>> {
    match (data, database) {
        (_, Some(path)) => {
            let store = SqliteStore::open(&path)
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        (Some(path), None) => {
            let store = MemoryStore::open(&path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            Ok(Arc::new(store))
        }
        (None, None) => bail!(
            "No store configured: pass --data <snapshot.json> or --database <store.db> \
             (or set SHOPBOARD_DATA / SHOPBOARD_DATABASE)"
        ),
    }
}

async fn run_web(dashboard: Dashboard, addr: SocketAddr) -> Result<()> {
    info!(%addr, unit_cost = dashboard.config().assumed_unit_cost, "Starting dashboard API");
    shopboard_web::run(dashboard, addr).await
}

async fn run_kpis(dashboard: Dashboard, json: bool) -> Result<()> {
    let kpis = dashboard.kpis().await.context("Failed to compute KPIs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&kpis)?);
    } else {
        println!("{}", kpi_table(&kpis));
    }

    Ok(())
}

fn kpi_table(kpis: &Kpis) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    table.add_row(vec![Cell::new("Total users"), Cell::new(kpis.total_users)]);
    table.add_row(vec![Cell::new("Total orders"), Cell::new(kpis.total_orders)]);
    table.add_row(vec![
        Cell::new("Revenue (delivered)"),
        Cell::new(format!("{:.2}", kpis.total_revenue)),
    ]);
    table.add_row(vec![
        Cell::new("Inventory turnover"),
        Cell::new(format!("{:.2}", kpis.inventory_turnover)),
    ]);

    table
}

fn run_import(database: &std::path::Path, snapshot: &std::path::Path) -> Result<()> {
    let snapshot_doc = Snapshot::load(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;

    let store = SqliteStore::open(database)
        .with_context(|| format!("Failed to open store {}", database.display()))?;

    let written = store
        .import_snapshot(&snapshot_doc)
        .context("Failed to import snapshot")?;

    println!(
        "Imported {} documents from {} into {}",
        written,
        snapshot.display(),
        database.display()
    );
    Ok(())
}
