//! Data models for scraped headlines, stored documents, and API payloads.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ScrapedHeadline`]: A `{title, link}` pair pulled off the listing page
//! - [`Article`]: A persisted headline, optionally pointing at a [`Note`]
//! - [`Note`]: Free-form client fields stored as their own document
//! - [`ArticleWithNote`]: An [`Article`] with its note reference resolved
//! - [`ScrapeReport`]: The outcome of one scrape run
//!
//! Stored documents serialize their identifier as `_id` so the JSON surface
//! matches what document-store clients expect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Arbitrary client-supplied note fields.
pub type NoteFields = Map<String, Value>;

/// A headline as extracted from the listing page, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedHeadline {
    /// Caption text of the headline. Empty when the page omits it.
    pub title: String,
    /// Absolute link built from the configured base and the anchor `href`.
    pub link: String,
}

/// A stored article.
///
/// The `note` field holds only the identifier of the attached [`Note`];
/// resolving it is an explicit lookup (see [`ArticleWithNote`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub link: String,
    /// Identifier of the attached note, `null` until one is attached.
    pub note: Option<Uuid>,
}

impl Article {
    /// Build a new, note-less article from a scraped headline.
    pub fn from_headline(headline: &ScrapedHeadline) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: headline.title.clone(),
            link: headline.link.clone(),
            note: None,
        }
    }
}

/// A stored note.
///
/// Every field the client supplied is kept and flattened next to `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: NoteFields,
}

impl Note {
    /// Build a new note from client fields. A client-supplied `_id` is dropped
    /// so it cannot shadow the store-assigned identifier.
    pub fn new(mut fields: NoteFields) -> Self {
        fields.remove("_id");
        Self {
            id: Uuid::new_v4(),
            fields,
        }
    }
}

/// An article with its note reference replaced by the full note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleWithNote {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub note: Option<Note>,
}

impl ArticleWithNote {
    pub fn new(article: Article, note: Option<Note>) -> Self {
        Self {
            id: article.id,
            title: article.title,
            link: article.link,
            note,
        }
    }
}

/// Summary returned by the scrape route once every record has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Fixed acknowledgement text.
    pub message: String,
    /// Number of headlines found on the page.
    pub extracted: usize,
    /// Number of articles stored.
    pub created: usize,
    /// Number of store calls that failed.
    pub failed: usize,
}

impl ScrapeReport {
    pub const MESSAGE: &'static str = "Scrape Complete";

    pub fn new(extracted: usize, created: usize, failed: usize) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            extracted,
            created,
            failed,
        }
    }
}
