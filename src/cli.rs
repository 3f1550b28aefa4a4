//! Command-line interface definitions for Pitchside Notes.
//!
//! This module defines the server options using the `clap` crate.
//! Every option can be provided via a command-line flag or an environment
//! variable, and every option has a default, so the binary starts bare.

use crate::scrape::ScrapeTarget;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the Pitchside Notes server.
///
/// # Examples
///
/// ```sh
/// # Defaults: port 3000, ./scrape_app.db, ./public
/// pitchside_notes
///
/// # Throwaway store on another port
/// pitchside_notes --port 8080 --store-url memory://
///
/// # Bounded upstream fetches
/// FETCH_TIMEOUT_SECS=15 pitchside_notes
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Document store connection string (`sqlite://path`, `sqlite::memory:` or `memory://`)
    #[arg(short, long, env = "STORE_URL", default_value = "sqlite://scrape_app.db")]
    pub store_url: String,

    /// News listing page to scrape
    #[arg(long, env = "SCRAPE_SOURCE_URL", default_value = "https://www.premierleague.com/news")]
    pub source_url: Url,

    /// Prefix prepended to each scraped `href`
    #[arg(long, env = "SCRAPE_LINK_BASE", default_value = "https://www.premiereleague.com")]
    pub link_base: String,

    /// Directory served for paths no route matches (skipped when missing)
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Timeout for the upstream page fetch, in seconds (unbounded when unset)
    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: Option<u64>,
}

impl Cli {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn scrape_target(&self) -> ScrapeTarget {
        ScrapeTarget {
            source_url: self.source_url.clone(),
            link_base: self.link_base.clone(),
        }
    }
}
