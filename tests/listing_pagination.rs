use async_trait::async_trait;
use medium_mcp::SearchResult;
use medium_mcp::error::BoxError;
use medium_mcp::listing::{ResultsPage, StopReason, collect_listing, load_more_results};
use serde_json::json;
use std::sync::Mutex;

#[test]
fn records_differing_only_by_query_string_collapse() {
    let bundles = vec![
        json!({
            "title": "Async traits in practice",
            "href": "/@bob/async-traits-42?source=search_post---------0",
            "authorText": "Bob",
            "readingTime": "6 min read",
            "claps": "1.2K"
        }),
        json!({
            "title": "Async traits in practice",
            "href": "https://medium.com/@bob/async-traits-42?source=search_post---------7",
        }),
        json!({
            "title": "Pinning, finally explained",
            "href": "/p/77aa",
            "authorHref": "/@carol?source=search_post",
            "text": "Carol · 3d ago · 9 min read"
        }),
    ];

    let results: Vec<SearchResult> = collect_listing(bundles, 10);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].url, "https://medium.com/@bob/async-traits-42");
    assert_eq!(results[0].author.as_deref(), Some("Bob"));
    assert_eq!(results[0].claps, Some(1200));
    assert_eq!(results[0].reading_time.as_deref(), Some("6 min read"));

    assert_eq!(results[1].url, "https://medium.com/p/77aa");
    assert_eq!(results[1].author.as_deref(), Some("carol"));
    assert_eq!(results[1].published_at.as_deref(), Some("3d ago"));
}

/// Results page whose count never grows, however often it is clicked
struct StuckPage {
    clicks: Mutex<usize>,
}

#[async_trait]
impl ResultsPage for StuckPage {
    async fn loaded_count(&self) -> Result<usize, BoxError> {
        Ok(10)
    }

    async fn show_more_visible(&self) -> Result<bool, BoxError> {
        Ok(true)
    }

    async fn click_show_more(&self) -> Result<(), BoxError> {
        *self.clicks.lock().unwrap() += 1;
        Ok(())
    }

    async fn settle(&self) {}
}

#[tokio::test]
async fn stuck_page_stops_on_plateau_not_ceiling() {
    let page = StuckPage { clicks: Mutex::new(0) };
    let outcome = load_more_results(&page, 50, 20).await.unwrap();

    assert_eq!(outcome.stop, StopReason::Plateau);
    assert_eq!(outcome.clicks, 1);
    assert_eq!(outcome.loaded, 10);
    assert_eq!(*page.clicks.lock().unwrap(), 1);
}
