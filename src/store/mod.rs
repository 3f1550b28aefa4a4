//! Document store client for the Article and Note collections.
//!
//! The HTTP layer talks to storage only through the [`DocumentStore`] trait,
//! so the backend is picked once at startup from a connection string:
//!
//! | URL | Backend | Notes |
//! |-----|---------|-------|
//! | `sqlite://path/to.db` | [`sqlite::SqliteStore`] | Embedded file, survives restarts |
//! | `sqlite::memory:` | [`sqlite::SqliteStore`] | SQLite without a file |
//! | `memory://` | [`memory::MemoryStore`] | Process-local, lost on exit |
//!
//! Articles come back in insertion order. Nothing enforces uniqueness of
//! title or link, so storing the same headline twice yields two documents.

use crate::error::StoreError;
use crate::models::{Article, ArticleWithNote, Note, NoteFields, ScrapedHeadline};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

/// Operations over the Article and Note collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert exactly one article built from `headline`, with no note.
    async fn create_article(&self, headline: &ScrapedHeadline) -> Result<Article, StoreError>;

    /// Every article, in insertion order.
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError>;

    /// The article with this identifier, or `None`.
    async fn find_article(&self, id: Uuid) -> Result<Option<Article>, StoreError>;

    /// The note with this identifier, or `None`.
    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;

    /// Create a note from `fields` and point the article at it, as one step.
    ///
    /// Returns the updated article. When no article has `article_id`, nothing
    /// is written and `None` comes back.
    async fn attach_note(
        &self,
        article_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Article>, StoreError>;

    /// The article with its note reference resolved to the full note.
    ///
    /// A reference to a note that no longer resolves yields `note: null`.
    async fn find_article_with_note(
        &self,
        id: Uuid,
    ) -> Result<Option<ArticleWithNote>, StoreError> {
        let Some(article) = self.find_article(id).await? else {
            return Ok(None);
        };
        let note = match article.note {
            Some(note_id) => self.find_note(note_id).await?,
            None => None,
        };
        Ok(Some(ArticleWithNote::new(article, note)))
    }
}

/// Open the backend named by `url`.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedUrl`] for schemes this build does not
/// know, or the backend's own error when the connection cannot be opened.
#[instrument(level = "info")]
pub fn open_store(url: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
    if url == "memory://" {
        info!("Using in-memory document store");
        return Ok(Arc::new(memory::MemoryStore::new()));
    }

    if url == "sqlite::memory:" {
        info!("Using in-memory SQLite document store");
        return Ok(Arc::new(sqlite::SqliteStore::open_in_memory()?));
    }

    if let Some(path) = url.strip_prefix("sqlite://") {
        if path.is_empty() {
            return Err(StoreError::UnsupportedUrl(url.to_string()));
        }
        info!(path, "Using SQLite document store");
        return Ok(Arc::new(sqlite::SqliteStore::open(path)?));
    }

    Err(StoreError::UnsupportedUrl(url.to_string()))
}
