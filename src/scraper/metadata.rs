use super::{clean_text, first_attr, first_text};
use scraper::Html;
use serde::{Deserialize, Serialize};

const TITLE_CHAIN: [&str; 2] = ["head > title", "title"];
const OG_TITLE: [&str; 1] = ["meta[property='og:title']"];
const DESCRIPTION_CHAIN: [&str; 2] = [
    "meta[property='og:description']",
    "meta[name='description']",
];
/// Visible body text, used when a page carries no description meta tags.
const BODY_CHAIN: [&str; 3] = [
    ".attributed-text-segment-list__content",
    ".show-more-less-html__markup",
    "article p",
];
/// Company (job pages) or author (posts) as rendered on public LinkedIn pages.
const COMPANY_CHAIN: [&str; 4] = [
    "a.topcard__org-name-link",
    "span.topcard__flavor a",
    ".top-card-layout__second-subline a",
    "a[data-tracking-control-name='public_post_feed-actor-name']",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub company: String,
}

pub struct MetadataScraper<'a> {
    document: &'a Html,
}

impl<'a> MetadataScraper<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self { document }
    }

    pub fn extract(&self) -> PageMetadata {
        let root = self.document.root_element();

        let mut title = first_text(&root, &TITLE_CHAIN);
        if title.is_empty() {
            title = first_attr(&root, &OG_TITLE, "content")
                .map(|t| clean_text(&t))
                .unwrap_or_default();
        }

        let mut description = first_attr(&root, &DESCRIPTION_CHAIN, "content")
            .map(|d| clean_text(&d))
            .unwrap_or_default();
        if description.is_empty() {
            description = first_text(&root, &BODY_CHAIN);
        }

        PageMetadata {
            title,
            description,
            company: first_text(&root, &COMPANY_CHAIN),
        }
    }
}
