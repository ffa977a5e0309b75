//! Author listings, site search and RSS feeds
//!
//! The browser flows (author page, search) read raw card bundles with one
//! in-page query and normalize them here; the RSS flow maps feed entries
//! directly. Both end in the same record shapes.

mod author;
mod filter;
mod normalize;
mod raw;
mod rss;
mod search;

pub use author::{author_url, scrape_author_articles};
pub use filter::{filter_by_keyword, matches_keyword};
pub use normalize::{
    ListingItem, absolute_url, dedup_key, find_date_in_text, parse_claps, publication_from_href,
    username_from_href,
};
pub use raw::{LISTING_SCRIPT, RawListing};
pub use rss::{articles_from_feed, feed_url, fetch_author_feed, http_client};
pub use search::{
    BrowserResultsPage, LoadOutcome, ResultsPage, StopReason, load_more_results, search_articles, search_url,
};

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Strip surrounding whitespace and a leading `@` from a username.
pub fn clean_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

/// Accumulates normalized cards in document order, deduplicated by URL and
/// capped at `limit`.
#[derive(Debug)]
pub struct ListingCollector<T> {
    limit: usize,
    seen: HashSet<String>,
    items: Vec<T>,
}

impl<T: From<ListingItem>> ListingCollector<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    /// Decode and add one raw bundle. Malformed bundles, cards without a title
    /// or link, and repeated URLs are skipped.
    pub fn push_raw(&mut self, index: usize, bundle: Value) {
        match serde_json::from_value::<RawListing>(bundle) {
            Ok(raw) => match ListingItem::from_raw(&raw) {
                Some(item) => self.push(item),
                None => debug!(index, "Skipping card without title or link"),
            },
            Err(e) => debug!(index, error = %e, "Skipping malformed card"),
        }
    }

    pub fn push(&mut self, item: ListingItem) {
        if self.is_full() {
            return;
        }
        if !self.seen.insert(dedup_key(&item.url)) {
            debug!(url = %item.url, "Skipping duplicate card");
            return;
        }
        self.items.push(item.into());
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Normalize raw bundles into at most `limit` unique records.
pub fn collect_listing<T: From<ListingItem>>(bundles: Vec<Value>, limit: usize) -> Vec<T> {
    let mut collector = ListingCollector::new(limit);
    for (index, bundle) in bundles.into_iter().enumerate() {
        if collector.is_full() {
            break;
        }
        collector.push_raw(index, bundle);
    }
    collector.into_items()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchResult;
    use serde_json::json;

    #[test]
    fn usernames_accept_leading_at() {
        assert_eq!(clean_username("@alice"), "alice");
        assert_eq!(clean_username("  bob "), "bob");
    }

    #[test]
    fn urls_differing_by_query_collapse_to_one() {
        let bundles = vec![
            json!({"title": "First", "href": "/@a/post-1?source=search---0"}),
            json!({"title": "First again", "href": "/@a/post-1?source=search---1"}),
            json!({"title": "Second", "href": "https://medium.com/@a/post-2"}),
        ];
        let results: Vec<SearchResult> = collect_listing(bundles, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
        assert_eq!(results[0].url, "https://medium.com/@a/post-1");
        assert_eq!(results[1].title, "Second");
    }

    #[test]
    fn bad_bundles_are_skipped_not_fatal() {
        let bundles = vec![
            json!("not an object"),
            json!({"title": 7, "href": "/@a/x"}),
            json!({"href": "/@a/no-title"}),
            json!({"title": "Kept", "href": "/@a/kept"}),
        ];
        let results: Vec<SearchResult> = collect_listing(bundles, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Kept");
    }

    #[test]
    fn stops_at_limit() {
        let bundles = (0..5)
            .map(|i| json!({"title": format!("Post {i}"), "href": format!("/@a/post-{i}")}))
            .collect();
        let results: Vec<SearchResult> = collect_listing(bundles, 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].title, "Post 2");
    }
}
