//! Page fetching and headline extraction.
//!
//! Scraping is split in two phases, the same way for every source:
//!
//! 1. **Fetching**: [`fetch_page`] downloads the listing page as text
//! 2. **Extracting**: a source module turns that text into [`ScrapedHeadline`]s
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Premier League news | [`premier_league`] | HTML scraping of `figcaption` cards |
//!
//! [`ScrapedHeadline`]: crate::models::ScrapedHeadline

use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub mod premier_league;

/// Build the shared HTTP client used for every outbound fetch.
///
/// `timeout` of `None` leaves requests unbounded.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Download `url` and return its body as text.
///
/// Non-success statuses are turned into errors so callers never try to
/// extract headlines from an error page.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(client: &Client, url: &Url) -> reqwest::Result<String> {
    let html = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    info!(bytes = html.len(), "Fetched listing page");
    debug!(preview = %truncate_for_log(&html, 200), "Listing page body");
    Ok(html)
}
