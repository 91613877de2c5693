//! stdio and Streamable HTTP transports for the matscout server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::tower::{
    StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use tracing::info;

use crate::config::TransportType;
use crate::mcp::MatscoutServer;

/// Serve one client over stdin/stdout until it disconnects.
pub async fn run_stdio(server: MatscoutServer) -> Result<()> {
    info!(transport = "stdio", "matscout MCP server starting");
    server.serve(stdio()).await?.waiting().await?;
    info!("Client disconnected");
    Ok(())
}

/// Serve MCP sessions on `port` until Ctrl-C.
pub async fn run_http(server: MatscoutServer, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(transport = "http", %addr, "matscout MCP server listening");

    axum::serve(listener, router(server))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// MCP on every path except `/health`.
///
/// Sessions share one agent, and with it the demo dataset.
fn router(server: MatscoutServer) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .fallback_service(mcp)
}

/// Run the MCP server with the given transport.
pub async fn run_server(server: MatscoutServer, transport: TransportType, port: u16) -> Result<()> {
    match transport {
        TransportType::Stdio => run_stdio(server).await,
        TransportType::Http => run_http(server, port).await,
    }
}
