//! Field extraction from recipe detail pages.
//!
//! Each field is read by its own function from a parsed document using the
//! selectors in [`crate::site`]. A missing structure yields `None` or an
//! empty list, never an error, so markup drift shows up field by field
//! instead of failing the import.

use crate::error::ImportError;
use crate::http_client::SiteClient;
use crate::model::{RecipeRecord, SessionToken};
use crate::site;
use scraper::{ElementRef, Html, Selector};

/// Parse a detail page into a record.
///
/// The parsed document is dropped before returning, so callers can hold
/// the result across `.await` points.
pub fn parse_recipe(url: &str, html: &str) -> RecipeRecord {
    let document = Html::parse_document(html);
    RecipeRecord {
        url: url.to_string(),
        title: title(&document),
        ingredients: ingredients(&document),
        instructions: instructions(&document),
        recipe_url: recipe_url(&document),
        tags: tags(&document),
        cooktime: cooktime(&document),
    }
}

/// Fetch one detail page and extract its record.
///
/// Transport failures are fatal; field-level gaps are not.
pub async fn extract_record(
    client: &SiteClient,
    token: &SessionToken,
    url: &str,
) -> Result<RecipeRecord, ImportError> {
    let body = client.get_page(url, token).await?;
    Ok(parse_recipe(url, &body))
}

/// Trimmed page heading, `None` if absent or blank.
///
/// If the heading selector matches more than once, the texts are joined
/// in document order before trimming.
pub fn title(document: &Html) -> Option<String> {
    let joined: String = select_all(document, site::TITLE)
        .iter()
        .map(text_of)
        .collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn ingredients(document: &Html) -> Vec<String> {
    trimmed_texts(document, site::INGREDIENTS)
}

pub fn instructions(document: &Html) -> Vec<String> {
    trimmed_texts(document, site::INSTRUCTIONS)
}

pub fn tags(document: &Html) -> Vec<String> {
    trimmed_texts(document, site::TAGS)
}

/// External source link.
///
/// The first citation anchor's href wins if it is non-empty. Otherwise every
/// anchor whose trimmed text is exactly "View recipe" is visited and the
/// last one decides, even when it has no href.
pub fn recipe_url(document: &Html) -> Option<String> {
    let cited = select_all(document, site::CITATION_ANCHOR)
        .first()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string);
    if cited.is_some() {
        return cited;
    }

    let mut found = None;
    for anchor in select_all(document, site::ANY_ANCHOR) {
        if text_of(&anchor).trim() == site::VIEW_RECIPE_TEXT {
            found = anchor.value().attr("href").map(str::to_string);
        }
    }
    found
}

/// Total time from the labelled time blocks.
///
/// A block qualifies when its label text trims to exactly "Total". The
/// value is the block's text with the first "Total" removed, trimmed.
/// Later qualifying blocks overwrite earlier ones.
pub fn cooktime(document: &Html) -> Option<String> {
    let Ok(label_sel) = Selector::parse(site::TIME_LABEL) else {
        return None;
    };

    let mut found = None;
    for block in select_all(document, site::TIME_BLOCKS) {
        let label: String = block.select(&label_sel).map(|l| text_of(&l)).collect();
        if label.trim() == site::TOTAL_LABEL {
            let text = text_of(&block).replacen(site::TOTAL_LABEL, "", 1);
            found = Some(text.trim().to_string());
        }
    }
    found
}

// ── Helpers ─────────────────────────────────────────────────────

/// All elements matching `css`, in document order. An unparsable
/// selector matches nothing.
pub(crate) fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => document.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

fn trimmed_texts(document: &Html, css: &str) -> Vec<String> {
    select_all(document, css)
        .iter()
        .map(|el| text_of(el).trim().to_string())
        .collect()
}
