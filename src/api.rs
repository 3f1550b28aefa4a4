//! HTTP surface: the scrape trigger plus the article and note routes.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/scrape` | [`ScrapeReport`] once every headline is stored |
//! | GET | `/articles` | Every [`Article`], insertion order |
//! | GET | `/articles/{id}` | [`ArticleWithNote`] or `null` |
//! | POST | `/articles/{id}` | Updated [`Article`] or `null` |
//!
//! A lookup that matches nothing is a successful `null`, not an error.
//! Everything that is an error goes through [`AppError`], which picks the
//! status code. Unmatched paths fall through to the static directory when one
//! is configured.

use crate::error::AppError;
use crate::models::{Article, ArticleWithNote, NoteFields, ScrapeReport};
use crate::scrape::{ScrapeTarget, run_scrape};
use crate::store::DocumentStore;
use crate::utils::parse_document_id;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::handler::HandlerWithoutStateExt;
use axum::http::{Uri, header};
use axum::routing::get;
use axum::{Form, Json, Router};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub client: Client,
    pub target: Arc<ScrapeTarget>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, client: Client, target: ScrapeTarget) -> Self {
        Self {
            store,
            client,
            target: Arc::new(target),
        }
    }
}

/// Build the application router.
///
/// # Arguments
///
/// * `state` - Store, HTTP client and scrape target shared by all handlers
/// * `static_dir` - Directory served for unmatched paths, if any
pub fn router(state: AppState, static_dir: Option<&std::path::Path>) -> Router {
    let router = Router::new()
        .route("/scrape", get(scrape))
        .route("/articles", get(list_articles))
        .route("/articles/{id}", get(get_article).post(attach_note))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static files");
            router.fallback_service(ServeDir::new(dir).not_found_service(not_found.into_service()))
        }
        None => router.fallback(not_found),
    };

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Note fields from either a JSON object or an urlencoded form body.
///
/// An empty JSON body, a missing `Content-Type`, or any other content type
/// yields an empty note rather than a rejection.
#[derive(Debug)]
pub struct NotePayload(pub NoteFields);

impl<S> FromRequest<S> for NotePayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type.as_deref() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                Ok(NotePayload(
                    fields
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                ))
            }
            Some(ct) if ct.contains("json") => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                if bytes.is_empty() {
                    return Ok(NotePayload(NoteFields::new()));
                }
                let Json(fields) = Json::<NoteFields>::from_bytes(&bytes)
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                Ok(NotePayload(fields))
            }
            _ => {
                debug!(content_type = ?content_type, "Unparsed note body; storing empty note");
                Ok(NotePayload(NoteFields::new()))
            }
        }
    }
}

#[instrument(level = "info", skip_all)]
async fn scrape(State(state): State<AppState>) -> Result<Json<ScrapeReport>, AppError> {
    run_scrape(&state.client, state.store.as_ref(), &state.target)
        .await
        .map(Json)
}

async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state.store.list_articles().await?;
    debug!(count = articles.len(), "Listed articles");
    Ok(Json(articles))
}

#[instrument(level = "info", skip(state))]
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ArticleWithNote>>, AppError> {
    let id = parse_document_id(&id)?;
    Ok(Json(state.store.find_article_with_note(id).await?))
}

#[instrument(level = "info", skip(state, payload))]
async fn attach_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: NotePayload,
) -> Result<Json<Option<Article>>, AppError> {
    let id = parse_document_id(&id)?;
    let updated = state.store.attach_note(id, payload.0).await?;
    match &updated {
        Some(article) => info!(note_id = ?article.note, "Attached note to article"),
        None => info!("No article matched; note not created"),
    }
    Ok(Json(updated))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {uri}"))
}
