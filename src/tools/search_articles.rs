//! search_articles - site-wide Medium search

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use super::{Tool, check_range, require_text, respond};
use crate::error::MediumResult;
use crate::listing::search_articles;
use crate::manager::BrowserManager;

const MAX_LIMIT: usize = 20;

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArticlesArgs {
    /// Search terms
    pub query: String,

    /// Maximum number of results, 1-20
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Clone)]
pub struct SearchArticlesTool {
    manager: Arc<BrowserManager>,
}

impl SearchArticlesTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for SearchArticlesTool {
    type Args = SearchArticlesArgs;

    fn name() -> &'static str {
        "search_articles"
    }

    fn description() -> &'static str {
        "Search all of Medium for articles matching a query.\n\n\
         Scrapes the search results page, so it is slower than RSS and may trigger bot detection.\n\n\
         Example: search_articles({\"query\": \"rust async\", \"limit\": 15})"
    }

    fn read_only() -> bool {
        true
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let query = require_text("query", &args.query)?;
        let limit = check_range("limit", args.limit, 1, MAX_LIMIT)?;

        let response = search_articles(self.manager.clone(), query, limit).await?;

        let top = response
            .results
            .first()
            .map(|r| r.title.as_str())
            .unwrap_or("none");
        let summary = format!(
            "\x1b[36m󰋱 Search: {}\x1b[0m\n 󰈙 Results: {} · Top: {}",
            response.query, response.result_count, top
        );
        Ok(respond(summary, &response))
    }
}
