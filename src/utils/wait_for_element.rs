//! Element polling for JavaScript-rendered pages
//!
//! Medium renders article and listing markup after the initial load event, so
//! the presence of a landmark element is polled with exponential backoff.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::element::Element;

/// Wait for an element to appear in the DOM using exponential backoff polling
///
/// Returns `None` when `timeout` elapses first; callers decide whether the
/// missing element is fatal.
///
/// # Polling Strategy
/// - Starts at 100ms intervals
/// - Doubles each retry, capped at 1 second
/// - Total duration limited by `timeout`
pub async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    let start = std::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Some(element);
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return None;
        }

        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
        poll_interval = (poll_interval * 2).min(max_interval);
    }
}
