use super::{first_attr, first_text, parse_selector};
use crate::error::{Result, ScraperError};
use crate::{log_debug, log_info};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::Url;

const CARD_CHAIN: [&str; 2] = ["div.base-card", "div.job-search-card"];
const TITLE_CHAIN: [&str; 2] = ["h3.base-search-card__title", "h3"];
const COMPANY_CHAIN: [&str; 2] = ["h4.base-search-card__subtitle", "h4"];
const LINK_CHAIN: [&str; 2] = ["a.base-card__full-link", "a[href*='/jobs/view/']"];
const SNIPPET_CHAIN: [&str; 2] = [".job-search-card__location", ".base-search-card__metadata"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub link: String,
    pub snippet: String,
}

pub struct JobCardScraper<'a> {
    document: &'a Html,
    base_url: String,
}

impl<'a> JobCardScraper<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self {
            document,
            base_url: "https://www.linkedin.com".to_string(),
        }
    }

    /// URL the listing was fetched from; relative card links resolve against it.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn extract(&self) -> Result<Vec<JobCard>> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            ScraperError::ParseError(format!("Invalid listing URL {}: {}", self.base_url, e))
        })?;

        for selector_str in CARD_CHAIN {
            let selector = parse_selector(selector_str)?;
            let cards: Vec<ElementRef> = self.document.select(&selector).collect();
            if cards.is_empty() {
                continue;
            }

            log_info!("[scraper] Found {} job cards", cards.len());
            let jobs: Vec<JobCard> = cards
                .iter()
                .filter_map(|card| {
                    let job = extract_card(card, &base);
                    if job.is_none() {
                        log_debug!("[scraper] Skipping job card without a link");
                    }
                    job
                })
                .collect();
            return Ok(jobs);
        }

        Ok(Vec::new())
    }
}

fn extract_card(card: &ElementRef, base: &Url) -> Option<JobCard> {
    let link = first_attr(card, &LINK_CHAIN, "href").and_then(|href| canonical_link(base, &href))?;
    Some(JobCard {
        title: first_text(card, &TITLE_CHAIN),
        company: first_text(card, &COMPANY_CHAIN),
        link,
        snippet: first_text(card, &SNIPPET_CHAIN),
    })
}

/// Resolves `href` against `base` and drops tracking query strings and
/// fragments so the same posting compares equal across pages.
pub fn canonical_link(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}
