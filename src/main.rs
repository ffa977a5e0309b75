// medium-mcp: Medium reading tools over MCP stdio
//
// stdout carries the protocol, so all logging goes to stderr.

use anyhow::{Context, Result};
use medium_mcp::{BrowserManager, MediumServer};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_FORMAT_ENV: &str = "MEDIUM_MCP_LOG_FORMAT";

static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Tear the browser down once, however many signals arrive.
async fn shutdown(manager: &BrowserManager, reason: &str) {
    if SHUTTING_DOWN.swap(true, Ordering::SeqCst) {
        return;
    }
    info!(reason, "Shutting down");
    manager.shutdown().await;
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        },
        Err(e) => {
            error!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "SIGINT"
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let server = MediumServer::with_defaults().context("Failed to build HTTP client")?;
    let manager = server.manager().clone();
    info!(version = env!("CARGO_PKG_VERSION"), "medium-mcp listening on stdio");

    tokio::select! {
        result = medium_mcp::serve_stdio(server) => {
            if let Err(e) = &result {
                error!(error = %e, "Server stopped");
            }
            shutdown(&manager, "client disconnected").await;
            result
        }
        signal = wait_for_signal() => {
            shutdown(&manager, signal).await;
            Ok(())
        }
    }
}
