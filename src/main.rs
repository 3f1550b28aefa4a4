//! # Pitchside Notes
//!
//! A small web backend that scrapes football news headlines into a document
//! store and lets clients annotate them with free-text notes.
//!
//! ## Features
//!
//! - Scrapes the Premier League news listing on demand (`GET /scrape`)
//! - Stores each headline as an Article in SQLite or in memory
//! - Lists articles and reads one with its note resolved
//! - Attaches a note to an article in a single atomic step
//! - Serves a static `public/` directory for everything else
//!
//! ## Usage
//!
//! ```sh
//! pitchside_notes --port 3000 --store-url sqlite://scrape_app.db
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: [`cli::Cli`] gathers flags and environment variables
//! 2. **Storage**: [`store::open_store`] picks a backend from the store URL
//! 3. **Scraping**: [`scrape::run_scrape`] fetches, extracts and persists
//! 4. **Serving**: [`api::router`] exposes the routes behind request tracing

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod error;
mod models;
mod scrape;
mod scrapers;
mod store;
mod utils;

use api::AppState;
use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pitchside_notes starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // --- Store ---
    let store = match store::open_store(&args.store_url) {
        Ok(store) => store,
        Err(e) => {
            error!(store_url = %args.store_url, error = %e, "Failed to open document store");
            return Err(e.into());
        }
    };

    // --- Outbound client ---
    let client = scrapers::build_client(args.fetch_timeout())?;
    let target = args.scrape_target();
    info!(source = %target.source_url, link_base = %target.link_base, "Scrape target configured");

    // --- Router ---
    let static_dir = if args.static_dir.is_dir() {
        Some(args.static_dir.as_path())
    } else {
        warn!(dir = %args.static_dir.display(), "Static directory missing; static files disabled");
        None
    };
    let app = api::router(AppState::new(store, client, target), static_dir);

    // --- Serve ---
    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "App running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
