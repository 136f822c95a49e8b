use super::parse_selector;
use crate::error::Result;
use crate::log_debug;
use scraper::Html;

/// Result link selectors on a Bing results page, most specific first.
const RESULT_LINK_CHAIN: [&str; 3] = ["li.b_algo h2 a", "li.b_algo a.tilk", "#b_results h2 a"];

pub struct SearchLinkScraper<'a> {
    document: &'a Html,
}

impl<'a> SearchLinkScraper<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self { document }
    }

    /// Result hrefs containing `domain`, in page order. The first selector in
    /// the chain that finds any link at all decides the result.
    pub fn extract(&self, domain: &str) -> Result<Vec<String>> {
        for selector_str in RESULT_LINK_CHAIN {
            let selector = parse_selector(selector_str)?;
            let hrefs: Vec<&str> = self
                .document
                .select(&selector)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .collect();

            if hrefs.is_empty() {
                continue;
            }

            log_debug!(
                "[scraper] {} result links via '{}'",
                hrefs.len(),
                selector_str
            );
            return Ok(hrefs
                .into_iter()
                .filter(|href| href.contains(domain))
                .map(str::to_string)
                .collect());
        }

        Ok(Vec::new())
    }
}
