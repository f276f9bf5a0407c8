use crate::config::{Locality, ResolvedConfig, RunConfig};
use crate::crawlers::driver::PageDriver;
use crate::crawlers::modal::dismiss_modals;
use crate::error::SessionError;
use crate::output;
use crate::parsers::extract_listings;
use crate::results::ListingRecord;
use std::path::Path;
use tokio::time::sleep;
use url::Url;

/// Fixed filter segments between the search term and the page number
const FILTERS_BEFORE_LOCALITY: [&str; 3] = ["all-ma", "all-pr", "all-is"];
const FILTERS_AFTER_LOCALITY: [&str; 3] = ["all-ba", "all-pu", "all-nc"];

/// Builds result-page URLs for one search
#[derive(Debug, Clone)]
pub struct SearchUrl {
    base: Url,
    search_term: String,
    locality: Locality,
}

impl SearchUrl {
    pub fn new(base: &Url, config: &RunConfig) -> Self {
        Self {
            base: base.clone(),
            search_term: config.search_term.clone(),
            locality: config.locality.clone(),
        }
    }

    /// URL of result page `page` (1-based)
    ///
    /// `<base>/<term>/all-ma/all-pr/all-is/<city>/all-ba/all-pu/all-nc/<page>`;
    /// pages after the first also carry `?what=<term>`.
    pub fn page(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);

        let page_segment = page.to_string();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.search_term)
                .extend(FILTERS_BEFORE_LOCALITY)
                .push(self.locality.path_segment())
                .extend(FILTERS_AFTER_LOCALITY)
                .push(&page_segment);
        }

        if page > 1 {
            url.query_pairs_mut().append_pair("what", &self.search_term);
        }
        url
    }
}

/// Page counter bounded by the page limit
///
/// Page numbers only move forward, so a page is never visited twice and at
/// most `limit` pages are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current: u32,
    limit: u32,
}

impl Paginator {
    pub fn new(limit: u32) -> Self {
        Self {
            current: 1,
            limit: limit.max(1),
        }
    }

    /// Page currently being processed
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Moves past the current page
    ///
    /// Returns the next page number, or `None` once results are exhausted or
    /// the limit has been reached.
    pub fn advance(&mut self, exhausted: bool) -> Option<u32> {
        if exhausted {
            ::log::info!("No more results after page {}", self.current);
            return None;
        }
        if self.current >= self.limit {
            ::log::info!("Reached the page limit ({}), stopping", self.limit);
            return None;
        }
        self.current += 1;
        Some(self.current)
    }
}

/// Why the page loop ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    PageLimit,
    /// No listing selector matched this page
    Exhausted { page: u32 },
}

/// Outcome of a completed traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub pages_visited: u32,
    pub stop: StopReason,
}

/// Walks the result pages, appending kept records to `records`
///
/// For each page: settle, dismiss overlays, extract. Stops at the page limit
/// or on the first page where nothing is recognised (its markup is dumped to
/// `output_dir`). A navigation or browser failure aborts the walk; records
/// gathered up to that point remain in `records`.
pub async fn traverse<D: PageDriver>(
    driver: &mut D,
    config: &ResolvedConfig,
    output_dir: &Path,
    records: &mut Vec<ListingRecord>,
) -> Result<Traversal, SessionError> {
    let urls = SearchUrl::new(&config.scrape.base_url, &config.run);
    let timings = &config.scrape.timings;
    let mut pager = Paginator::new(config.run.page_limit);

    let first = urls.page(1);
    ::log::info!(
        "Searching \"{}\" in {}",
        config.run.search_term,
        config.run.locality
    );
    ::log::info!("Loading first page: {}", first);
    driver.goto(&first).await?;

    if config.scrape.debug_screenshot {
        match driver.screenshot().await {
            Ok(png) => {
                output::save_screenshot(output_dir, &png);
            }
            Err(e) => ::log::warn!("Failed to take screenshot: {}", e),
        }
    }

    loop {
        let page = pager.current();
        sleep(timings.settle).await;
        dismiss_modals(driver, timings).await;

        ::log::info!("Scraping page {}", page);
        let html = driver.source().await?;

        let exhausted = match extract_listings(&html, &config.scrape.selectors) {
            Ok(result) => {
                ::log::info!("Found {} listings on page {}", result.records.len(), page);
                records.extend(result.records);
                false
            }
            Err(gap) => {
                ::log::warn!("Page {}: {}", page, gap);
                output::dump_page(output_dir, page, &html);
                true
            }
        };

        match pager.advance(exhausted) {
            Some(next) => {
                let url = urls.page(next);
                ::log::info!("Navigating to page {}: {}", next, url);
                driver.goto(&url).await?;
            }
            None => {
                let stop = if exhausted {
                    StopReason::Exhausted { page }
                } else {
                    StopReason::PageLimit
                };
                return Ok(Traversal {
                    pages_visited: page,
                    stop,
                });
            }
        }
    }
}
