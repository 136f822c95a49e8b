mod jobs;
mod links;
mod metadata;
mod page;

pub use jobs::{JobCard, JobCardScraper};
pub use links::SearchLinkScraper;
pub use metadata::{MetadataScraper, PageMetadata};
pub use page::{PageInfo, PageScraper};

use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn links(&self) -> SearchLinkScraper {
        SearchLinkScraper::new(&self.document)
    }

    pub fn page(&self) -> PageScraper {
        PageScraper::new(&self.document)
    }

    pub fn metadata(&self) -> MetadataScraper {
        MetadataScraper::new(&self.document)
    }

    pub fn jobs(&self) -> JobCardScraper {
        JobCardScraper::new(&self.document)
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::SelectorError(format!("{}: {}", selector, e)).into())
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first element matched by the first selector in `chain` that
/// yields non-empty text. Empty when nothing matches.
pub(crate) fn first_text(root: &ElementRef, chain: &[&str]) -> String {
    chain
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            root.select(&selector)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}

/// Attribute of the first element matched along `chain` that carries a
/// non-empty value for `attr`.
pub(crate) fn first_attr(root: &ElementRef, chain: &[&str], attr: &str) -> Option<String> {
    chain
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            root.select(&selector)
                .filter_map(|el| el.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
}
