//! Site-wide search through the rendered results page

use async_trait::async_trait;
use chromiumoxide::Page;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{collect_listing, raw::collect_raw};
use crate::browser::{PageOptions, PageSession};
use crate::error::{BoxError, MediumError, MediumResult};
use crate::manager::BrowserManager;
use crate::model::{SearchResponse, SearchResult, Validate};
use crate::utils::constants::MEDIUM_ORIGIN;
use crate::utils::{eval, eval_json};

const COUNT_RESULTS_SCRIPT: &str = r#"document.querySelectorAll("article").length"#;

const SHOW_MORE_VISIBLE_SCRIPT: &str = r#"(() => {
  const button = Array.from(document.querySelectorAll("button"))
    .find((b) => /show more/i.test(b.textContent || ""));
  if (!button) return false;
  const rect = button.getBoundingClientRect();
  const style = window.getComputedStyle(button);
  return rect.width > 0 && rect.height > 0 && style.visibility !== "hidden" && style.display !== "none";
})()"#;

const CLICK_SHOW_MORE_SCRIPT: &str = r#"(() => {
  window.scrollTo(0, document.body.scrollHeight);
  const button = Array.from(document.querySelectorAll("button"))
    .find((b) => /show more/i.test(b.textContent || ""));
  if (button) button.click();
})()"#;

pub fn search_url(query: &str) -> String {
    format!("{MEDIUM_ORIGIN}/search?q={}", urlencoding::encode(query.trim()))
}

/// The incremental-load surface of a results page
#[async_trait]
pub trait ResultsPage: Send + Sync {
    async fn loaded_count(&self) -> Result<usize, BoxError>;

    /// Whether a "Show more" control is present and visible
    async fn show_more_visible(&self) -> Result<bool, BoxError>;

    /// Scroll to the bottom and click the "Show more" control.
    async fn click_show_more(&self) -> Result<(), BoxError>;

    /// Wait for a click to take effect.
    async fn settle(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    NoMoreControl,
    /// A click did not increase the loaded count
    Plateau,
    ClickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub clicks: usize,
    pub stop: StopReason,
}

/// Click "Show more" until `target` results are loaded, the control goes away,
/// a click stops producing results, or `max_clicks` is spent.
pub async fn load_more_results<P>(page: &P, target: usize, max_clicks: usize) -> Result<LoadOutcome, BoxError>
where
    P: ResultsPage + ?Sized,
{
    let mut clicks = 0;
    let mut loaded = page.loaded_count().await?;

    let stop = loop {
        if loaded >= target {
            break StopReason::TargetReached;
        }
        if clicks >= max_clicks {
            break StopReason::ClickLimit;
        }
        if !page.show_more_visible().await? {
            break StopReason::NoMoreControl;
        }

        page.click_show_more().await?;
        page.settle().await;
        clicks += 1;

        let now = page.loaded_count().await?;
        debug!(clicks, before = loaded, after = now, "Show more clicked");
        if now <= loaded {
            loaded = now;
            break StopReason::Plateau;
        }
        loaded = now;
    };

    Ok(LoadOutcome { loaded, clicks, stop })
}

/// [`ResultsPage`] backed by a live browser tab
pub struct BrowserResultsPage {
    page: Page,
    settle: Duration,
}

impl BrowserResultsPage {
    pub fn new(page: Page, settle: Duration) -> Self {
        Self { page, settle }
    }
}

#[async_trait]
impl ResultsPage for BrowserResultsPage {
    async fn loaded_count(&self) -> Result<usize, BoxError> {
        eval_json::<usize>(&self.page, COUNT_RESULTS_SCRIPT).await
    }

    async fn show_more_visible(&self) -> Result<bool, BoxError> {
        eval_json::<bool>(&self.page, SHOW_MORE_VISIBLE_SCRIPT).await
    }

    async fn click_show_more(&self) -> Result<(), BoxError> {
        eval(&self.page, CLICK_SHOW_MORE_SCRIPT).await
    }

    async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }
}

/// Search Medium and return up to `limit` results.
///
/// Pagination problems are logged and extraction proceeds with whatever has
/// loaded; only acquisition and the final read are fatal.
pub async fn search_articles(manager: Arc<BrowserManager>, query: &str, limit: usize) -> MediumResult<SearchResponse> {
    let query = query.trim().to_string();
    let url = search_url(&query);
    info!(%query, %url, limit, "Searching Medium");

    let search = manager.config().search.clone();
    let max_clicks = search.max_clicks_for(limit);
    let options = PageOptions::listing(&manager);
    let q = query.clone();

    let results = PageSession::scoped(manager, &url, options, move |page| async move {
        let results_page = BrowserResultsPage::new(page.clone(), search.settle());
        match load_more_results(&results_page, limit, max_clicks).await {
            Ok(outcome) => debug!(
                loaded = outcome.loaded,
                clicks = outcome.clicks,
                stop = ?outcome.stop,
                "Result loading finished"
            ),
            Err(e) => warn!(query = %q, error = %e, "Loading more results failed, extracting what has loaded"),
        }

        let bundles = collect_raw(&page)
            .await
            .map_err(|e| MediumError::search(&q, "Failed to read search results").with_source(e))?;
        Ok(collect_listing::<SearchResult>(bundles, limit))
    })
    .await
    .map_err(|e| e.retarget(|reason| MediumError::search(&query, reason)))?;

    info!(%query, result_count = results.len(), "Search completed");
    let has_more = results.len() >= limit;
    SearchResponse::new(query, results, has_more).validate()
}
