use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Bing pages are fetched in strides of ten results.
pub const BING_PAGE_SIZE: usize = 10;
/// The LinkedIn guest jobs listing returns 25 cards per page.
pub const JOBS_PAGE_SIZE: usize = 25;

const JOBS_LISTING_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Discover public LinkedIn links through a Bing `site:` search, then fetch each one.
    #[default]
    Bing,
    /// Read job cards straight from LinkedIn's guest jobs listing.
    Jobs,
}

impl std::str::FromStr for SearchSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bing" => Ok(SearchSource::Bing),
            "jobs" => Ok(SearchSource::Jobs),
            other => Err(format!("unknown source: {} (expected bing or jobs)", other)),
        }
    }
}

impl std::fmt::Display for SearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchSource::Bing => write!(f, "bing"),
            SearchSource::Jobs => write!(f, "jobs"),
        }
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| ClientError::InvalidUrl(format!("Invalid base URL {}: {}", base_url, e)).into())
}

/// `page` is 0-based.
pub fn bing_search_url(base_url: &str, query: &str, page: usize) -> Result<String> {
    let mut url = parse_base(base_url)?;
    url.set_path("/search");
    url.query_pairs_mut()
        .clear()
        .append_pair("q", &format!("site:linkedin.com ({})", query.trim()))
        .append_pair("first", &(page * BING_PAGE_SIZE + 1).to_string());
    Ok(url.to_string())
}

/// `page` is 0-based. An empty `location` is left out of the query.
pub fn jobs_search_url(base_url: &str, keyword: &str, location: &str, page: usize) -> Result<String> {
    let mut url = parse_base(base_url)?;
    url.set_path(JOBS_LISTING_PATH);
    {
        let mut query = url.query_pairs_mut();
        query.clear().append_pair("keywords", keyword.trim());
        if !location.trim().is_empty() {
            query.append_pair("location", location.trim());
        }
        query.append_pair("start", &(page * JOBS_PAGE_SIZE).to_string());
    }
    Ok(url.to_string())
}
