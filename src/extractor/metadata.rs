//! Article metadata carried in `<meta>` tags

use scraper::{Html, Selector};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub author: Option<String>,
    pub published_at: Option<String>,
}

impl PageMetadata {
    pub fn from_document(document: &Html) -> Self {
        Self {
            author: meta(document, "meta[name=\"author\"]"),
            published_at: meta(document, "meta[property=\"article:published_time\"]"),
        }
    }
}

fn meta(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}
