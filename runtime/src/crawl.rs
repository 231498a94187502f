//! Listing crawl: walk `/recipes/recent/{page}` and collect detail URLs.
//!
//! Pages are fetched strictly in order, one at a time. The walk stops when
//! the termination predicate says so (by default: no "Next" control on the
//! page) or fails once the page cap is reached.

use crate::error::ImportError;
use crate::extract::{select_all, text_of};
use crate::http_client::SiteClient;
use crate::model::SessionToken;
use crate::site::{self, Site};
use scraper::Html;
use tracing::{debug, info, warn};

/// What one listing page contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute detail URLs, in document order.
    pub detail_urls: Vec<String>,
    /// Whether a pagination anchor's trimmed text starts with "Next".
    pub has_next: bool,
    /// Recipe anchors dropped for lacking an `href`.
    pub skipped_anchors: usize,
}

impl ListingPage {
    /// Default termination predicate: keep going while there is a next page.
    pub fn has_next(page: &ListingPage) -> bool {
        page.has_next
    }
}

/// Bounds on a listing walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of listing pages to fetch. `None` means unbounded.
    pub max_pages: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            max_pages: Some(1000),
        }
    }
}

impl Pagination {
    pub fn unbounded() -> Self {
        Self { max_pages: None }
    }

    pub fn capped(max_pages: u32) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }
}

/// Parse one listing page.
pub fn parse_listing(site: &Site, html: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let mut detail_urls = Vec::new();
    let mut skipped_anchors = 0;
    for anchor in select_all(&document, site::LISTING_ANCHORS) {
        match anchor.value().attr("href") {
            Some(href) => detail_urls.push(site.absolutize(href)),
            None => {
                skipped_anchors += 1;
                let text = text_of(&anchor);
                debug!(text = text.trim(), "listing anchor has no href; skipped");
            }
        }
    }

    let has_next = select_all(&document, site::PAGINATION_ANCHORS)
        .iter()
        .any(|a| text_of(a).trim().starts_with(site::NEXT_PREFIX));

    ListingPage {
        detail_urls,
        has_next,
        skipped_anchors,
    }
}

/// Collect every detail URL reachable from the listing.
pub async fn collect_detail_urls(
    client: &SiteClient,
    site: &Site,
    token: &SessionToken,
    pagination: Pagination,
) -> Result<Vec<String>, ImportError> {
    collect_detail_urls_with(client, site, token, pagination, ListingPage::has_next).await
}

/// Like [`collect_detail_urls`], with a caller-supplied termination
/// predicate. The walk continues to the next page while
/// `continue_when(&page)` is true.
pub async fn collect_detail_urls_with<F>(
    client: &SiteClient,
    site: &Site,
    token: &SessionToken,
    pagination: Pagination,
    continue_when: F,
) -> Result<Vec<String>, ImportError>
where
    F: Fn(&ListingPage) -> bool,
{
    let mut all_urls = Vec::new();
    let mut page_num: u32 = 1;

    loop {
        if let Some(max_pages) = pagination.max_pages {
            if page_num > max_pages {
                return Err(ImportError::PageLimitExceeded { max_pages });
            }
        }

        let url = site.listing_url(page_num);
        debug!(page = page_num, %url, "fetching listing page");
        let body = client.get_page(&url, token).await?;
        let page = parse_listing(site, &body);

        info!(
            page = page_num,
            found = page.detail_urls.len(),
            has_next = page.has_next,
            "listing page parsed"
        );
        if page.skipped_anchors > 0 {
            warn!(
                page = page_num,
                skipped = page.skipped_anchors,
                "listing anchors without href were skipped"
            );
        }

        let more = continue_when(&page);
        all_urls.extend(page.detail_urls);
        if !more {
            break;
        }
        page_num += 1;
    }

    info!(pages = page_num, total = all_urls.len(), "listing crawl finished");
    Ok(all_urls)
}
