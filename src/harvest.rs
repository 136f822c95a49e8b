//! The keyword harvest pipeline: discover links per keyword, fetch and
//! extract each one, then dedup by link and filter.

use crate::client::{Client, RetryPolicy};
use crate::config::Config;
use crate::error::{HarvestError, Result};
use crate::filter::KeywordFilter;
use crate::scraper::{JobCard, Scraper};
use crate::search::{bing_search_url, jobs_search_url, SearchSource};
use crate::session::{load_cookies, SessionHeaders};
use crate::utils::Pause;
use crate::{log_debug, log_error, log_info, log_warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Only links containing this are kept from search results.
pub const LINK_DOMAIN: &str = "linkedin.com";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub keyword: String,
    pub title: String,
    pub company: String,
    pub url: String,
    pub snippet: String,
    pub error: String,
}

impl ResultRow {
    pub const COLUMNS: [&'static str; 6] = ["keyword", "title", "company", "url", "snippet", "error"];

    pub fn failure(keyword: &str, url: &str, error: impl ToString) -> Self {
        Self {
            keyword: keyword.to_string(),
            url: url.to_string(),
            error: error.to_string(),
            ..Default::default()
        }
    }

    fn from_job(keyword: &str, job: JobCard) -> Self {
        Self {
            keyword: keyword.to_string(),
            title: job.title,
            company: job.company,
            url: job.link,
            snippet: job.snippet,
            error: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub source: SearchSource,
    pub per_keyword: usize,
    pub max_pages: usize,
    pub bing_base_url: String,
    pub jobs_base_url: String,
    pub location: String,
    /// Between search or listing pages.
    pub pause: Pause,
    /// Between fetches of individual result pages.
    pub fetch_pause: Pause,
}

impl HarvestOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.source,
            per_keyword: config.per_keyword,
            max_pages: config.max_pages,
            bing_base_url: config.http.bing_base_url.clone(),
            jobs_base_url: config.http.jobs_base_url.clone(),
            location: config.http.location.clone(),
            pause: Pause::new(config.http.pause_min_ms, config.http.pause_max_ms),
            fetch_pause: Pause::new(config.http.fetch_pause_min_ms, config.http.fetch_pause_max_ms),
        }
    }
}

pub struct Harvester {
    /// Anonymous client for the search engine.
    search_client: Client,
    /// Client carrying the LinkedIn session, if any.
    page_client: Client,
    options: HarvestOptions,
    filter: KeywordFilter,
    /// Rows produced while setting up, e.g. a cookie file that failed to load.
    setup_rows: Vec<ResultRow>,
}

impl Harvester {
    pub fn new(search_client: Client, page_client: Client, options: HarvestOptions) -> Self {
        Self {
            search_client,
            page_client,
            options,
            filter: KeywordFilter::default(),
            setup_rows: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: KeywordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builds both clients from `config`. A cookie file that cannot be loaded
    /// falls back to an anonymous session and is reported as an error row.
    pub fn from_config(config: &Config) -> Result<Self> {
        let options = HarvestOptions::from_config(config);
        let retry = RetryPolicy {
            attempts: config.http.retry_attempts,
            min_wait: Duration::from_secs(config.http.retry_min_wait),
            max_wait: Duration::from_secs(config.http.retry_max_wait),
        };
        let timeout = Duration::from_secs(config.http.request_timeout);

        let mut setup_rows = Vec::new();
        let session = if config.cookies.is_empty() {
            SessionHeaders::anonymous()
        } else {
            match load_cookies(&config.cookies) {
                Ok(cookies) => SessionHeaders::for_cookies(&cookies),
                Err(e) => {
                    log_error!(e => "[harvest] Falling back to an anonymous session");
                    setup_rows.push(ResultRow::failure(
                        "",
                        "",
                        format!("Failed to load cookies: {}", e),
                    ));
                    SessionHeaders::anonymous()
                }
            }
        };

        let search_session =
            SessionHeaders::anonymous().with_referer(format!("{}/", options.bing_base_url));

        let search_client = Client::builder()
            .base_url(&options.bing_base_url)
            .session(&search_session)?
            .proxy(&config.http.proxy)
            .timeout(timeout)
            .retry(retry)
            .build()?;

        let page_client = Client::builder()
            .base_url(&options.jobs_base_url)
            .session(&session)?
            .proxy(&config.http.proxy)
            .timeout(timeout)
            .retry(retry)
            .build()?;

        let filter = KeywordFilter::new(&config.include, &config.exclude);
        let mut harvester = Self::new(search_client, page_client, options).with_filter(filter);
        harvester.setup_rows = setup_rows;
        Ok(harvester)
    }

    pub async fn run<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Vec<ResultRow>> {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(HarvestError::NoKeywords.into());
        }

        let mut rows = self.setup_rows.clone();
        for keyword in keywords {
            log_info!(
                "[harvest] Harvesting '{}' from {} (up to {} results)",
                keyword,
                self.options.source,
                self.options.per_keyword
            );
            let found = match self.options.source {
                SearchSource::Bing => self.harvest_bing(keyword).await,
                SearchSource::Jobs => self.harvest_jobs(keyword).await,
            };
            log_info!("[harvest] '{}' produced {} rows", keyword, found.len());
            rows.extend(found);
        }

        let total = rows.len();
        let rows = self.filter.apply(dedup_by_url(rows));
        log_info!(
            "[harvest] Kept {} of {} rows after dedup and filtering",
            rows.len(),
            total
        );
        Ok(rows)
    }

    async fn harvest_bing(&self, keyword: &str) -> Vec<ResultRow> {
        let mut rows = Vec::new();
        let links = self.discover_links(keyword, &mut rows).await;

        for url in links {
            rows.push(self.fetch_metadata(keyword, &url).await);
            self.options.fetch_pause.sleep().await;
        }
        rows
    }

    /// Walks search result pages until enough links are found, a page comes
    /// back empty, or there is no next page. A failed page ends discovery and
    /// is recorded in `rows`.
    async fn discover_links(&self, keyword: &str, rows: &mut Vec<ResultRow>) -> Vec<String> {
        let limit = self.options.per_keyword;
        let mut links: Vec<String> = Vec::new();
        let mut seen = HashSet::new();

        for page in 0..self.options.max_pages {
            let url = match bing_search_url(&self.options.bing_base_url, keyword, page) {
                Ok(url) => url,
                Err(e) => {
                    rows.push(ResultRow::failure(keyword, "", &e));
                    break;
                }
            };

            let response = match self.search_client.get_with_retry(&url).await {
                Ok(response) => response,
                Err(e) => {
                    log_error!(e => "[harvest] Search page {} for '{}' failed", page + 1, keyword);
                    rows.push(ResultRow::failure(keyword, &url, &e));
                    break;
                }
            };

            let (page_links, has_next) = match parse_search_page(&response.content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    rows.push(ResultRow::failure(keyword, &url, &e));
                    break;
                }
            };
            log_debug!(
                "[harvest] Search page {} for '{}' had {} links",
                page + 1,
                keyword,
                page_links.len()
            );
            if page_links.is_empty() {
                break;
            }
            for link in page_links {
                if links.len() >= limit {
                    break;
                }
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }

            if links.len() >= limit || !has_next {
                break;
            }
            self.options.pause.sleep().await;
        }

        links
    }

    async fn fetch_metadata(&self, keyword: &str, url: &str) -> ResultRow {
        match self.page_client.get_with_retry(url).await {
            Ok(response) => {
                log_debug!("[harvest] {} answered {}", response.url, response.status);
                let meta = Scraper::new(&response.content).metadata().extract();
                ResultRow {
                    keyword: keyword.to_string(),
                    title: meta.title,
                    company: meta.company,
                    url: url.to_string(),
                    snippet: meta.description,
                    error: String::new(),
                }
            }
            Err(e) => {
                log_error!(e => "[harvest] Fetching {} failed", url);
                ResultRow::failure(keyword, url, &e)
            }
        }
    }

    async fn harvest_jobs(&self, keyword: &str) -> Vec<ResultRow> {
        let limit = self.options.per_keyword;
        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for page in 0..self.options.max_pages {
            let url = match jobs_search_url(
                &self.options.jobs_base_url,
                keyword,
                &self.options.location,
                page,
            ) {
                Ok(url) => url,
                Err(e) => {
                    rows.push(ResultRow::failure(keyword, "", &e));
                    break;
                }
            };

            let cards = match self.page_client.get_with_retry(&url).await {
                Ok(response) => {
                    log_debug!("[harvest] {} answered {}", response.url, response.status);
                    Scraper::new(&response.content)
                        .jobs()
                        .with_base_url(&response.url)
                        .extract()
                }
                Err(e) => Err(e),
            };
            let cards = match cards {
                Ok(cards) => cards,
                Err(e) => {
                    log_error!(e => "[harvest] Jobs page {} for '{}' failed", page + 1, keyword);
                    rows.push(ResultRow::failure(keyword, &url, &e));
                    break;
                }
            };
            if cards.is_empty() {
                break;
            }

            for card in cards {
                if seen.insert(card.link.clone()) {
                    rows.push(ResultRow::from_job(keyword, card));
                }
            }
            if rows.len() >= limit {
                break;
            }
            self.options.pause.sleep().await;
        }

        rows.truncate(limit);
        rows
    }
}

/// Keeps the first row per url, in order. Rows without a url are never merged.
pub fn dedup_by_url(rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| row.url.is_empty() || seen.insert(row.url.clone()))
        .collect()
}

/// Links on a search result page, and whether it links to a next page.
fn parse_search_page(content: &str) -> Result<(Vec<String>, bool)> {
    let scraper = Scraper::new(content);
    let links = scraper.links().extract(LINK_DOMAIN)?;
    let has_next = match scraper.page().analyze() {
        Ok(info) => info.has_next,
        Err(e) => {
            log_warn!("[harvest] Could not read pagination: {}", e);
            false
        }
    };
    Ok((links, has_next))
}
