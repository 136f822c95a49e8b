use super::parse_selector;
use crate::error::Result;
use crate::{log_debug, log_warn};
use scraper::Html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub has_next: bool,
}

pub struct PageScraper<'a> {
    document: &'a Html,
}

impl<'a> PageScraper<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self { document }
    }

    pub fn analyze(&self) -> Result<PageInfo> {
        let current_page = self.get_current_page()?.unwrap_or(1);
        let has_next = self.has_next_page()?;

        log_debug!(
            "[scraper] Page Analysis - Current: {}, Next: {}",
            current_page,
            has_next
        );

        Ok(PageInfo {
            current_page,
            has_next,
        })
    }

    /// `None` when there is no pagination or the active marker is unreadable.
    fn get_current_page(&self) -> Result<Option<usize>> {
        let selector = parse_selector("a.sb_pagS, a.sb_pagS_bp")?;

        let Some(element) = self.document.select(&selector).next() else {
            return Ok(None);
        };
        let text = element.text().collect::<String>();
        match text.trim().parse() {
            Ok(page) => Ok(Some(page)),
            Err(_) => {
                log_warn!("[scraper] Could not parse page number '{}'", text.trim());
                Ok(None)
            }
        }
    }

    fn has_next_page(&self) -> Result<bool> {
        let selector = parse_selector("a.sb_pagN, a[title='Next page']")?;
        Ok(self
            .document
            .select(&selector)
            .any(|el| el.value().attr("href").is_some()))
    }
}
