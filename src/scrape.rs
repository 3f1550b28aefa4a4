//! The scrape workflow: fetch the listing, extract headlines, store each one.
//!
//! Every extracted headline gets its own create call, issued in page order.
//! A failed create is logged and counted; it never stops the rest. The
//! caller gets a [`ScrapeReport`] only after every create has finished.

use crate::error::AppError;
use crate::models::{ScrapeReport, ScrapedHeadline};
use crate::scrapers::{fetch_page, premier_league};
use crate::store::DocumentStore;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Where to scrape from and how to build absolute links.
#[derive(Debug, Clone)]
pub struct ScrapeTarget {
    /// Listing page to fetch.
    pub source_url: Url,
    /// Prefix prepended to each card's `href`.
    pub link_base: String,
}

/// Run one scrape against `target` and persist what it finds.
///
/// # Errors
///
/// [`AppError::UpstreamUnavailable`] when the listing page cannot be fetched.
/// Store failures are not errors here; they show up in
/// [`ScrapeReport::failed`].
#[instrument(level = "info", skip_all, fields(source = %target.source_url))]
pub async fn run_scrape(
    client: &Client,
    store: &dyn DocumentStore,
    target: &ScrapeTarget,
) -> Result<ScrapeReport, AppError> {
    let html = fetch_page(client, &target.source_url).await.map_err(|e| {
        error!(error = %e, "Listing page fetch failed");
        AppError::UpstreamUnavailable(format!("failed to fetch {}: {e}", target.source_url))
    })?;

    let headlines = premier_league::extract_headlines(&html, &target.link_base);
    if headlines.is_empty() {
        warn!("Listing page produced no headlines; markup may have changed");
    }

    let report = persist_headlines(store, headlines).await;
    info!(
        extracted = report.extracted,
        created = report.created,
        failed = report.failed,
        "Scrape finished"
    );
    Ok(report)
}

/// Store each headline as its own article, one after another.
#[instrument(level = "info", skip_all, fields(count = headlines.len()))]
pub async fn persist_headlines(
    store: &dyn DocumentStore,
    headlines: Vec<ScrapedHeadline>,
) -> ScrapeReport {
    let extracted = headlines.len();

    let outcomes: Vec<bool> = stream::iter(headlines.into_iter().enumerate())
        .then(move |(i, headline)| async move {
            match store.create_article(&headline).await {
                Ok(article) => {
                    info!(index = i, id = %article.id, title = %article.title, "Stored article");
                    true
                }
                Err(e) => {
                    error!(index = i, title = %headline.title, error = %e, "Failed to store article");
                    false
                }
            }
        })
        .collect()
        .await;

    let created = outcomes.iter().filter(|ok| **ok).count();
    ScrapeReport::new(extracted, created, extracted - created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{Article, Note, NoteFields};
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use axum::Router;
    use axum::routing::get;
    use std::time::Duration;
    use uuid::Uuid;

    const PAGE: &str = r#"
        <html><body>
          <a href="/news/123"><figure><figcaption><h2 class="title">Team X Wins</h2></figcaption></figure></a>
          <a href="/news/124"><figure><figcaption><h2 class="title">Team Y Draws</h2></figcaption></figure></a>
        </body></html>
    "#;

    /// Serve `body` at `/news` on an ephemeral local port.
    async fn serve_page(body: &'static str) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/news", get(move || async move { axum::response::Html(body) }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/news")).unwrap()
    }

    fn target(source_url: Url) -> ScrapeTarget {
        ScrapeTarget {
            source_url,
            link_base: "https://www.premiereleague.com".to_string(),
        }
    }

    /// Store that rejects every headline whose title starts with "bad".
    struct PickyStore(MemoryStore);

    #[async_trait]
    impl DocumentStore for PickyStore {
        async fn create_article(&self, headline: &ScrapedHeadline) -> Result<Article, StoreError> {
            if headline.title.starts_with("bad") {
                return Err(StoreError::Corrupt("rejected".into()));
            }
            self.0.create_article(headline).await
        }

        async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
            self.0.list_articles().await
        }

        async fn find_article(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
            self.0.find_article(id).await
        }

        async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
            self.0.find_note(id).await
        }

        async fn attach_note(
            &self,
            article_id: Uuid,
            fields: NoteFields,
        ) -> Result<Option<Article>, StoreError> {
            self.0.attach_note(article_id, fields).await
        }
    }

    #[tokio::test]
    async fn test_scrape_stores_every_headline() {
        let url = serve_page(PAGE).await;
        let store = MemoryStore::new();
        let client = Client::new();

        let report = run_scrape(&client, &store, &target(url)).await.unwrap();
        assert_eq!(report, ScrapeReport::new(2, 2, 0));

        let articles = store.list_articles().await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Team X Wins");
        assert_eq!(articles[0].link, "https://www.premiereleague.com/news/123");
        assert_eq!(articles[0].note, None);
        assert_eq!(articles[1].title, "Team Y Draws");
    }

    #[tokio::test]
    async fn test_scraping_twice_duplicates_articles() {
        let url = serve_page(PAGE).await;
        let store = MemoryStore::new();
        let client = Client::new();

        run_scrape(&client, &store, &target(url.clone())).await.unwrap();
        run_scrape(&client, &store, &target(url)).await.unwrap();

        let articles = store.list_articles().await.unwrap();
        assert_eq!(articles.len(), 4);
        assert_eq!(articles[0].title, articles[2].title);
        assert_ne!(articles[0].id, articles[2].id);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_upstream_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/news")).unwrap();
        let store = MemoryStore::new();
        let err = run_scrape(&Client::new(), &store, &target(url))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "upstream_unavailable");
        assert!(store.list_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let url = serve_page(PAGE).await;
        let missing = url.join("/elsewhere").unwrap();

        let err = run_scrape(&Client::new(), &MemoryStore::new(), &target(missing))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_slow_source_past_timeout_is_upstream_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/news",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                axum::response::Html(PAGE)
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let url = Url::parse(&format!("http://{addr}/news")).unwrap();

        let client = crate::scrapers::build_client(Some(Duration::from_secs(1))).unwrap();
        let store = MemoryStore::new();
        let err = run_scrape(&client, &store, &target(url)).await.unwrap_err();

        assert_eq!(err.kind(), "upstream_unavailable");
        assert!(store.list_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_creates_are_counted_not_fatal() {
        let store = PickyStore(MemoryStore::new());
        let headlines = vec![
            ScrapedHeadline { title: "good one".into(), link: "l1".into() },
            ScrapedHeadline { title: "bad one".into(), link: "l2".into() },
            ScrapedHeadline { title: "good two".into(), link: "l3".into() },
        ];

        let report = persist_headlines(&store, headlines).await;
        assert_eq!(report, ScrapeReport::new(3, 2, 1));

        let titles: Vec<_> = store
            .list_articles()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["good one", "good two"]);
    }

    #[tokio::test]
    async fn test_page_without_cards_stores_nothing() {
        let url = serve_page("<html><body><p>maintenance</p></body></html>").await;
        let store = MemoryStore::new();

        let report = run_scrape(&Client::new(), &store, &target(url)).await.unwrap();
        assert_eq!(report, ScrapeReport::new(0, 0, 0));
        assert_eq!(report.message, "Scrape Complete");
    }
}
