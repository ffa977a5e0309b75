//! Author RSS feeds, no browser involved

use feed_rs::model::Entry;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{clean_username, dedup_key};
use crate::error::{MediumError, MediumResult};
use crate::extractor::collapse_whitespace;
use crate::model::{ArticleSource, AuthorArticle, AuthorArticlesResponse, Validate};
use crate::utils::constants::{ACCEPT_LANGUAGE, CHROME_USER_AGENT, MEDIUM_ORIGIN};

const EXCERPT_CHARS: usize = 300;

/// HTTP client carrying the same user agent as the browser.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        reqwest::header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .user_agent(CHROME_USER_AGENT)
        .default_headers(headers)
        .build()
}

pub fn feed_url(username: &str) -> String {
    format!("{MEDIUM_ORIGIN}/feed/@{}", clean_username(username))
}

/// Fetch and map an author's feed.
///
/// Medium caps feeds at the ~10 most recent posts, so `hasMore` is always true.
pub async fn fetch_author_feed(client: &Client, username: &str) -> MediumResult<AuthorArticlesResponse> {
    let username = clean_username(username);
    let url = feed_url(&username);
    info!(%username, %url, "Fetching RSS feed");

    let response = client.get(&url).send().await.map_err(|e| {
        error!(%username, error = %e, "RSS request failed");
        MediumError::rss(&username, "Request failed").with_source(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let reason = if status == StatusCode::NOT_FOUND {
            "Feed not found (HTTP 404)".to_string()
        } else {
            format!("Feed request returned HTTP {}", status.as_u16())
        };
        error!(%username, %status, "RSS request rejected");
        return Err(MediumError::rss(&username, reason));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| MediumError::rss(&username, "Failed to read feed body").with_source(e))?;

    let resp = articles_from_feed(&username, &body)?;
    info!(%username, article_count = resp.article_count, "RSS feed fetched");
    Ok(resp)
}

/// Parse a feed document and map every entry that has a link.
pub fn articles_from_feed(username: &str, body: &[u8]) -> MediumResult<AuthorArticlesResponse> {
    let username = clean_username(username);
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| MediumError::rss(&username, "Failed to parse feed").with_source(e.to_string()))?;

    let articles: Vec<AuthorArticle> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id.clone();
            let article = article_from_entry(entry);
            if article.is_none() {
                debug!(%id, "Skipping feed entry without a link");
            }
            article
        })
        .collect();

    AuthorArticlesResponse::new(username, articles, ArticleSource::Rss, true).validate()
}

fn article_from_entry(entry: Entry) -> Option<AuthorArticle> {
    let url = entry
        .links
        .first()
        .map(|link| link.href.trim())
        .filter(|href| !href.is_empty())
        .map(dedup_key)?;

    let title = entry
        .title
        .map(|t| collapse_whitespace(&t.content))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let content = entry.content.and_then(|c| c.body).filter(|b| !b.trim().is_empty());
    let excerpt = entry
        .summary
        .map(|s| s.content)
        .or_else(|| content.clone())
        .map(|html| plain_text(&html))
        .filter(|text| !text.is_empty())
        .map(|text| truncate_chars(&text, EXCERPT_CHARS));

    Some(AuthorArticle {
        title,
        url,
        published_at: entry.published.map(|d| d.to_rfc3339()),
        updated_at: entry.updated.map(|d| d.to_rfc3339()),
        author: entry
            .authors
            .first()
            .map(|p| collapse_whitespace(&p.name))
            .filter(|name| !name.is_empty()),
        excerpt,
        categories: entry
            .categories
            .into_iter()
            .map(|c| c.term)
            .filter(|c| !c.trim().is_empty())
            .collect(),
        content,
        claps: None,
        reading_time: None,
        source: ArticleSource::Rss,
    })
}

fn plain_text(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    collapse_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
