//! SQLite-backed document store.
//!
//! Each collection is one table. Articles keep their scalar fields as columns;
//! notes keep their free-form fields as a JSON text column. An autoincrement
//! `seq` column preserves insertion order.
//!
//! `rusqlite` is blocking, so every call runs on the blocking pool while
//! holding the single connection's mutex.

use super::DocumentStore;
use crate::error::StoreError;
use crate::models::{Article, Note, NoteFields, ScrapedHeadline};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS articles (
        seq   INTEGER PRIMARY KEY AUTOINCREMENT,
        id    TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        link  TEXT NOT NULL,
        note  TEXT
    );

    CREATE TABLE IF NOT EXISTS notes (
        seq    INTEGER PRIMARY KEY AUTOINCREMENT,
        id     TEXT NOT NULL UNIQUE,
        fields TEXT NOT NULL
    );
";

/// [`DocumentStore`] over a single SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and ensure the schema.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Open a database that lives only as long as this store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        info!("SQLite schema ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut *guard)
        })
        .await?
    }
}

struct ArticleRow {
    id: String,
    title: String,
    link: String,
    note: Option<String>,
}

impl ArticleRow {
    const COLUMNS: &'static str = "id, title, link, note";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            link: row.get(2)?,
            note: row.get(3)?,
        })
    }

    fn into_article(self) -> Result<Article, StoreError> {
        Ok(Article {
            id: parse_id(&self.id)?,
            title: self.title,
            link: self.link,
            note: self.note.as_deref().map(parse_id).transpose()?,
        })
    }
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt(format!("bad id {raw:?}: {e}")))
}

fn select_article(conn: &Connection, id: Uuid) -> Result<Option<Article>, StoreError> {
    let sql = format!("SELECT {} FROM articles WHERE id = ?1", ArticleRow::COLUMNS);
    conn.query_row(&sql, params![id.to_string()], ArticleRow::from_row)
        .optional()?
        .map(ArticleRow::into_article)
        .transpose()
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_article(&self, headline: &ScrapedHeadline) -> Result<Article, StoreError> {
        let article = Article::from_headline(headline);
        let row = article.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO articles (id, title, link, note) VALUES (?1, ?2, ?3, NULL)",
                params![row.id.to_string(), row.title, row.link],
            )?;
            Ok(())
        })
        .await?;
        debug!(id = %article.id, "Inserted article");
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM articles ORDER BY seq", ArticleRow::COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], ArticleRow::from_row)?;

            let mut articles = Vec::new();
            for row in rows {
                articles.push(row?.into_article()?);
            }
            Ok(articles)
        })
        .await
    }

    async fn find_article(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        self.with_conn(move |conn| select_article(conn, id)).await
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.with_conn(move |conn| {
            let fields: Option<String> = conn
                .query_row(
                    "SELECT fields FROM notes WHERE id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;

            match fields {
                Some(raw) => Ok(Some(Note {
                    id,
                    fields: serde_json::from_str(&raw)?,
                })),
                None => Ok(None),
            }
        })
        .await
    }

    async fn attach_note(
        &self,
        article_id: Uuid,
        fields: NoteFields,
    ) -> Result<Option<Article>, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let exists = tx
                .query_row(
                    "SELECT 1 FROM articles WHERE id = ?1",
                    params![article_id.to_string()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Ok(None);
            }

            let note = Note::new(fields);
            tx.execute(
                "INSERT INTO notes (id, fields) VALUES (?1, ?2)",
                params![note.id.to_string(), serde_json::to_string(&note.fields)?],
            )?;
            tx.execute(
                "UPDATE articles SET note = ?1 WHERE id = ?2",
                params![note.id.to_string(), article_id.to_string()],
            )?;

            let updated = select_article(&tx, article_id)?;
            tx.commit()?;
            debug!(%article_id, note_id = %note.id, "Attached note");
            Ok(updated)
        })
        .await
    }
}
