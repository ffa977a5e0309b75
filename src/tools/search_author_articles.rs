//! search_author_articles - keyword search within an author's RSS feed

use async_trait::async_trait;
use reqwest::Client;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{Tool, require_text, respond};
use crate::error::{MediumError, MediumResult};
use crate::listing::{clean_username, fetch_author_feed, filter_by_keyword};
use crate::model::AuthorSearchResponse;

const FEED_NOTE: &str = "Search is limited to author's ~10 most recent articles from RSS feed";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchAuthorArticlesArgs {
    /// Medium username, with or without the leading @
    pub username: String,

    /// Text to look for in titles, excerpts and tags
    pub keyword: String,
}

#[derive(Clone)]
pub struct SearchAuthorArticlesTool {
    client: Client,
}

impl SearchAuthorArticlesTool {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchAuthorArticlesTool {
    type Args = SearchAuthorArticlesArgs;

    fn name() -> &'static str {
        "search_author_articles"
    }

    fn description() -> &'static str {
        "Search a Medium author's recent articles by keyword (title, excerpt, tags).\n\n\
         Reads the author's RSS feed, so only the ~10 most recent articles are searched.\n\n\
         Example: search_author_articles({\"username\": \"alice\", \"keyword\": \"tokio\"})"
    }

    fn read_only() -> bool {
        true
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let username = clean_username(require_text("username", &args.username)?);
        if username.is_empty() {
            return Err(MediumError::InvalidArgument("'username' must not be empty".into()));
        }
        let keyword = require_text("keyword", &args.keyword)?;

        let feed = fetch_author_feed(&self.client, &username).await?;
        let articles = filter_by_keyword(&feed.articles, keyword);

        let response = AuthorSearchResponse {
            username: feed.username,
            keyword: keyword.to_string(),
            match_count: articles.len(),
            articles,
            note: FEED_NOTE.to_string(),
        };

        let summary = format!(
            "\x1b[36m󰍉 Author Search: @{} \"{}\"\x1b[0m\n 󰈙 Matches: {} of {}",
            response.username,
            response.keyword,
            response.match_count,
            feed.article_count
        );
        Ok(respond(summary, &response))
    }
}
