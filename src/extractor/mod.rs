//! Article extraction: rendered page → readable content → Markdown `Article`

mod markdown;
mod metadata;
mod readable;

pub use markdown::to_markdown;
pub use metadata::PageMetadata;
pub use readable::Readable;

use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::browser::{PageOptions, PageSession};
use crate::error::{MediumError, MediumResult};
use crate::manager::BrowserManager;
use crate::model::{Article, Validate};

pub(crate) use readable::collapse_whitespace;

/// Fetch `url` in a fresh context (with the saved session, if any) and extract it.
pub async fn extract_article(manager: Arc<BrowserManager>, url: &str) -> MediumResult<Article> {
    info!(%url, "Extracting article");
    let options = PageOptions::article(&manager);

    let html = PageSession::scoped(manager, url, options, |page| async move {
        page.content().await.map_err(|e| {
            MediumError::article(url, "Failed to read page content").with_source(e.to_string())
        })
    })
    .await?;

    debug!(%url, bytes = html.len(), "Page snapshot taken");
    article_from_html(&html, url)
}

/// Build a validated `Article` from a rendered HTML snapshot.
///
/// `<meta name="author">` wins over the in-page byline; the title falls back
/// to "Untitled".
pub fn article_from_html(html: &str, url: &str) -> MediumResult<Article> {
    let base = Url::parse(url).map_err(|_| MediumError::InvalidUrl { url: url.to_string() })?;
    let document = Html::parse_document(html);

    let readable = readable::parse(html, &document, &base)
        .ok_or_else(|| MediumError::article(url, "Failed to extract article content"))?;

    let content = markdown::to_markdown(&readable.content_html);
    if content.is_empty() {
        return Err(MediumError::article(url, "Extracted article content is empty"));
    }

    let meta = PageMetadata::from_document(&document);

    Article {
        title: readable.title.unwrap_or_else(|| "Untitled".to_string()),
        author: meta.author.or(readable.byline),
        published_at: meta.published_at,
        content,
        excerpt: readable.excerpt,
        url: url.to_string(),
    }
    .validate()
}
