//! Scrape an author's profile page

use chromiumoxide::Page;
use std::sync::Arc;
use tracing::{debug, info};

use super::{clean_username, collect_listing, raw::collect_raw};
use crate::browser::{PageOptions, PageSession};
use crate::config::ScrollConfig;
use crate::error::{MediumError, MediumResult};
use crate::manager::BrowserManager;
use crate::model::{ArticleSource, AuthorArticle, AuthorArticlesResponse, Validate};
use crate::utils::constants::MEDIUM_ORIGIN;
use crate::utils::eval;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

pub fn author_url(username: &str) -> String {
    format!("{MEDIUM_ORIGIN}/@{}", clean_username(username))
}

/// Scroll the profile to trigger lazy loading, then read up to `limit` cards.
///
/// `hasMore` is reported when the limit was reached.
pub async fn scrape_author_articles(
    manager: Arc<BrowserManager>,
    username: &str,
    limit: usize,
) -> MediumResult<AuthorArticlesResponse> {
    let username = clean_username(username);
    let url = author_url(&username);
    info!(%username, %url, limit, "Scraping author page");

    let scroll = manager.config().scroll.clone();
    let options = PageOptions::listing(&manager);
    let who = username.clone();

    let articles = PageSession::scoped(manager, &url, options, move |page| async move {
        scroll_for_more(&page, &scroll).await;
        let bundles = collect_raw(&page)
            .await
            .map_err(|e| MediumError::author(&who, "Failed to read article cards").with_source(e))?;
        Ok(collect_listing::<AuthorArticle>(bundles, limit))
    })
    .await
    .map_err(|e| e.retarget(|reason| MediumError::author(&username, reason)))?;

    info!(%username, article_count = articles.len(), "Author page scraped");
    let has_more = articles.len() >= limit;
    AuthorArticlesResponse::new(&username, articles, ArticleSource::Scrape, has_more).validate()
}

async fn scroll_for_more(page: &Page, scroll: &ScrollConfig) {
    for step in 0..scroll.count {
        if let Err(e) = eval(page, SCROLL_TO_BOTTOM).await {
            debug!(step, error = %e, "Scroll step failed, extracting what has loaded");
            return;
        }
        tokio::time::sleep(scroll.delay()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_drops_leading_at() {
        assert_eq!(author_url("@alice"), "https://medium.com/@alice");
        assert_eq!(author_url("bob"), "https://medium.com/@bob");
    }
}
