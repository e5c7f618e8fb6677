//! shopboard-web - HTTP API for the shopboard admin dashboard

pub mod error;
pub mod router;

pub use error::ApiError;
pub use router::create_router;

use anyhow::Result;
use shopboard_core::Dashboard;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server until Ctrl-C
pub async fn run(dashboard: Dashboard, addr: SocketAddr) -> Result<()> {
    let router = create_router(dashboard);

    let listener = TcpListener::bind(addr).await?;

    info!("Web server listening on http://{}", addr);
    println!("Web server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
