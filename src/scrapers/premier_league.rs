//! Premier League news listing scraper.
//!
//! The listing at `https://www.premierleague.com/news` renders every story as
//! a card whose caption sits two levels below the story anchor:
//!
//! ```html
//! <a href="/news/123">
//!   <figure>
//!     <figcaption><span class="title">Team X Wins</span></figcaption>
//!   </figure>
//! </a>
//! ```
//!
//! The walk is fixed to that layout. When the markup drifts, records still
//! come out, just with empty titles or bare base links. A card with no
//! `href` gets the bare link base as its link; nothing like `undefined` is
//! appended to it.

use crate::models::ScrapedHeadline;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

static CAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".title").unwrap());

/// Extract every headline card from a listing page.
///
/// # Arguments
///
/// * `html` - Raw page markup; may be empty or malformed
/// * `link_base` - Prefix glued in front of each card's `href`
///
/// # Returns
///
/// One record per `figcaption`, in document order. Missing pieces degrade to
/// an empty title or a link equal to `link_base`.
#[instrument(level = "info", skip_all, fields(%link_base))]
pub fn extract_headlines(html: &str, link_base: &str) -> Vec<ScrapedHeadline> {
    let document = Html::parse_document(html);

    let headlines: Vec<ScrapedHeadline> = document
        .select(&CAPTION)
        .map(|caption| ScrapedHeadline {
            title: caption_title(caption),
            link: format!("{}{}", link_base, card_href(caption).unwrap_or_default()),
        })
        .collect();

    debug!(count = headlines.len(), "Extracted headlines");
    headlines
}

/// Concatenated text of every `.title` element inside the caption.
fn caption_title(caption: ElementRef<'_>) -> String {
    caption
        .select(&TITLE)
        .flat_map(|title| title.text())
        .collect()
}

/// `href` of the caption's grandparent, when that node is an element carrying one.
fn card_href(caption: ElementRef<'_>) -> Option<&str> {
    let grandparent = caption.parent()?.parent()?;
    ElementRef::wrap(grandparent)?.value().attr("href")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.premiereleague.com";

    #[test]
    fn test_single_card() {
        let html = r#"
            <ul><li>
              <a href="/news/123">
                <figure>
                  <figcaption><h2 class="title">Team X Wins</h2></figcaption>
                </figure>
              </a>
            </li></ul>
        "#;

        assert_eq!(
            extract_headlines(html, BASE),
            vec![ScrapedHeadline {
                title: "Team X Wins".to_string(),
                link: "https://www.premiereleague.com/news/123".to_string(),
            }]
        );
    }

    #[test]
    fn test_many_cards_keep_document_order() {
        let html = r#"
            <a href="/news/1"><figure><figcaption><span class="title">One</span></figcaption></figure></a>
            <a href="/news/2"><figure><figcaption><span class="title">Two</span></figcaption></figure></a>
            <a href="/news/3"><figure><figcaption><span class="title">Three</span></figcaption></figure></a>
        "#;

        let headlines = extract_headlines(html, BASE);
        let titles: Vec<_> = headlines.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(headlines[2].link, "https://www.premiereleague.com/news/3");
    }

    #[test]
    fn test_no_captions_yields_nothing() {
        let html = "<html><body><h2 class=\"title\">Not a card</h2></body></html>";
        assert!(extract_headlines(html, BASE).is_empty());
    }

    #[test]
    fn test_empty_and_malformed_documents() {
        assert!(extract_headlines("", BASE).is_empty());
        assert!(extract_headlines("<<<>>><div", BASE).is_empty());
    }

    #[test]
    fn test_caption_without_title_keeps_link() {
        let html = r#"<a href="/news/7"><figure><figcaption><p>No title here</p></figcaption></figure></a>"#;

        let headlines = extract_headlines(html, BASE);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "");
        assert_eq!(headlines[0].link, "https://www.premiereleague.com/news/7");
    }

    #[test]
    fn test_caption_without_anchor_gets_bare_base() {
        let html = r#"<section><div><figcaption><span class="title">Orphan</span></figcaption></div></section>"#;

        let headlines = extract_headlines(html, BASE);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Orphan");
        assert_eq!(headlines[0].link, BASE);
    }

    #[test]
    fn test_title_inside_caption_anchor() {
        let html = r#"<article><div><figcaption><a><h2 class="title">Team X Wins</h2></a></figcaption></div></article>"#;

        let headlines = extract_headlines(html, BASE);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Team X Wins");
        assert_eq!(headlines[0].link, BASE);
    }

    #[test]
    fn test_multiple_title_elements_concatenate() {
        let html = r#"<a href="/n"><div><figcaption><span class="title">Half </span><span class="title">Time</span></figcaption></div></a>"#;

        let headlines = extract_headlines(html, BASE);
        assert_eq!(headlines[0].title, "Half Time");
    }

    #[test]
    fn test_nested_title_text_is_collected() {
        let html = r#"<a href="/n"><div><figcaption><div class="title">Derby <em>Day</em></div></figcaption></div></a>"#;

        assert_eq!(extract_headlines(html, BASE)[0].title, "Derby Day");
    }
}
