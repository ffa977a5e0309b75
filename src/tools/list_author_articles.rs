//! list_author_articles - an author's recent stories from RSS or the profile page

use async_trait::async_trait;
use reqwest::Client;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use super::{Tool, check_range, require_text, respond};
use crate::error::{MediumError, MediumResult};
use crate::listing::{clean_username, fetch_author_feed, scrape_author_articles};
use crate::manager::BrowserManager;
use crate::model::ArticleSource;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

fn default_source() -> ArticleSource {
    ArticleSource::Rss
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListAuthorArticlesArgs {
    /// Medium username, with or without the leading @
    pub username: String,

    /// "rss" (fast, ~10 most recent with full content) or "scrape" (more
    /// stories, slower, may trigger bot detection)
    #[serde(default = "default_source")]
    pub source: ArticleSource,

    /// Maximum number of stories, 1-50 (scrape mode only)
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Keep only stories whose title, excerpt or tags contain this text
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Clone)]
pub struct ListAuthorArticlesTool {
    manager: Arc<BrowserManager>,
    client: Client,
}

impl ListAuthorArticlesTool {
    pub fn new(manager: Arc<BrowserManager>, client: Client) -> Self {
        Self { manager, client }
    }
}

#[async_trait]
impl Tool for ListAuthorArticlesTool {
    type Args = ListAuthorArticlesArgs;

    fn name() -> &'static str {
        "list_author_articles"
    }

    fn description() -> &'static str {
        "List a Medium author's articles.\n\n\
         Uses the RSS feed by default (fast, ~10 recent articles with full content). \
         Use source='scrape' for more articles (slower, may trigger bot detection).\n\n\
         Example: list_author_articles({\"username\": \"alice\", \"keyword\": \"rust\"})\n\
         Example: list_author_articles({\"username\": \"@alice\", \"source\": \"scrape\", \"limit\": 30})"
    }

    fn read_only() -> bool {
        true
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let username = clean_username(require_text("username", &args.username)?);
        if username.is_empty() {
            return Err(MediumError::InvalidArgument("'username' must not be empty".into()));
        }
        let limit = check_range("limit", args.limit, 1, MAX_LIMIT)?;

        let mut response = match args.source {
            ArticleSource::Rss => fetch_author_feed(&self.client, &username).await?,
            ArticleSource::Scrape => scrape_author_articles(self.manager.clone(), &username, limit).await?,
        };

        let keyword = args.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty());
        if let Some(keyword) = keyword {
            response.retain_keyword(keyword);
        }

        let filter = keyword.map(|k| format!(" · Keyword: {k}")).unwrap_or_default();
        let summary = format!(
            "\x1b[36m󰂺 Author Articles: @{}\x1b[0m\n 󰈙 Articles: {} · Source: {}{} · More: {}",
            response.username,
            response.article_count,
            args.source.as_str(),
            filter,
            response.has_more
        );
        Ok(respond(summary, &response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_rss_and_ten() {
        let args: ListAuthorArticlesArgs = serde_json::from_value(json!({"username": "alice"})).unwrap();
        assert_eq!(args.source, ArticleSource::Rss);
        assert_eq!(args.limit, 10);
        assert_eq!(args.keyword, None);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let parsed = serde_json::from_value::<ListAuthorArticlesArgs>(json!({"username": "a", "source": "api"}));
        assert!(parsed.is_err());
    }
}
