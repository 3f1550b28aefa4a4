//! Process-local document store.
//!
//! Both collections live behind one [`RwLock`], so note attachment sees and
//! writes a consistent view without any extra coordination.

use super::DocumentStore;
use crate::error::StoreError;
use crate::models::{Article, Note, NoteFields, ScrapedHeadline};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Collections {
    articles: Vec<Article>,
    notes: HashMap<Uuid, Note>,
}

/// In-memory [`DocumentStore`]; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes, referenced or not.
    #[cfg(test)]
    pub async fn note_count(&self) -> usize {
        self.inner.read().await.notes.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_article(&self, headline: &ScrapedHeadline) -> Result<Article, StoreError> {
        let article = Article::from_headline(headline);
        self.inner.write().await.articles.push(article.clone());
        debug!(id = %article.id, "Inserted article");
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.inner.read().await.articles.clone())
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(self.inner.read().await.notes.get(&id).cloned())
    }

    async fn attach_note(
        &self,
        article_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Article>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(index) = inner.articles.iter().position(|a| a.id == article_id) else {
            return Ok(None);
        };

        let note = Note::new(fields);
        let note_id = note.id;
        inner.notes.insert(note_id, note);

        let article = &mut inner.articles[index];
        article.note = Some(note_id);
        debug!(article_id = %article_id, note_id = %note_id, "Attached note");
        Ok(Some(article.clone()))
    }
}
