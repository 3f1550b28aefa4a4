//! Small helpers shared by the scraper and the HTTP layer.
//!
//! - String truncation for log previews
//! - Identifier parsing for route parameters

use crate::error::AppError;
use tracing::warn;
use uuid::Uuid;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Parse a document identifier taken from a request path.
///
/// # Errors
///
/// [`AppError::Validation`] when `raw` is not a UUID.
pub fn parse_document_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| {
        warn!(id = %truncate_for_log(raw, 64), error = %e, "Rejected malformed identifier");
        AppError::Validation(format!("invalid identifier {raw:?}: {e}"))
    })
}
