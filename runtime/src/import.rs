//! The import pipeline: listing crawl, then one extraction per detail page.

use crate::config::Config;
use crate::crawl::{self, Pagination};
use crate::error::ImportError;
use crate::extract;
use crate::http_client::SiteClient;
use crate::model::{RecipeRecord, SessionToken};
use crate::site::Site;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Runs imports against one site.
#[derive(Clone)]
pub struct Importer {
    client: SiteClient,
    site: Site,
    pagination: Pagination,
    deadline: Option<Duration>,
}

impl Importer {
    pub fn new(client: SiteClient, site: Site) -> Self {
        Self {
            client,
            site,
            pagination: Pagination::default(),
            deadline: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ImportError> {
        let client = SiteClient::new(config.request_timeout)?;
        Ok(Self::new(client, Site::new(config.origin.clone()))
            .with_pagination(Pagination {
                max_pages: config.max_pages,
            })
            .with_deadline(config.import_deadline))
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Bound the whole import. `None` disables the bound.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Import every recipe visible to `token`.
    ///
    /// The listing is crawled completely before any detail page is fetched.
    /// Any failure discards everything collected so far.
    pub async fn run(&self, token: &SessionToken) -> Result<Vec<RecipeRecord>, ImportError> {
        let started = Instant::now();
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.run_unbounded(token))
                .await
                .map_err(|_| ImportError::DeadlineExceeded {
                    elapsed: started.elapsed(),
                })?,
            None => self.run_unbounded(token).await,
        }
    }

    async fn run_unbounded(&self, token: &SessionToken) -> Result<Vec<RecipeRecord>, ImportError> {
        let urls =
            crawl::collect_detail_urls(&self.client, &self.site, token, self.pagination).await?;

        let mut recipes = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            debug!(n = i + 1, of = urls.len(), %url, "fetching recipe");
            recipes.push(extract::extract_record(&self.client, token, url).await?);
        }

        info!(count = recipes.len(), "import finished");
        Ok(recipes)
    }
}
