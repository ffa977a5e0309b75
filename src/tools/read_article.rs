//! read_article - fetch a Medium article as Markdown

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use super::{Tool, preview, respond};
use crate::config::domains::DomainAllowlist;
use crate::error::MediumResult;
use crate::extractor::extract_article;
use crate::manager::BrowserManager;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadArticleArgs {
    /// Absolute URL of a Medium article (medium.com or an allowed partner domain)
    pub url: String,
}

#[derive(Clone)]
pub struct ReadArticleTool {
    manager: Arc<BrowserManager>,
    domains: Arc<DomainAllowlist>,
}

impl ReadArticleTool {
    pub fn new(manager: Arc<BrowserManager>, domains: Arc<DomainAllowlist>) -> Self {
        Self { manager, domains }
    }
}

#[async_trait]
impl Tool for ReadArticleTool {
    type Args = ReadArticleArgs;

    fn name() -> &'static str {
        "read_article"
    }

    fn description() -> &'static str {
        "Read a Medium article and return its content as Markdown.\n\n\
         Uses the saved login session when one exists, so member-only stories work after \
         'login' + 'save_login'.\n\n\
         Example: read_article({\"url\": \"https://medium.com/@user/some-story-1a2b3c\"})"
    }

    fn read_only() -> bool {
        true
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let url = self.domains.check_url(&args.url)?;
        let article = extract_article(self.manager.clone(), url.as_str()).await?;

        let summary = format!(
            "\x1b[36m󰈙 Read Article: {}\x1b[0m\n 󰀄 Author: {} · Characters: {} · Preview: {}",
            article.title,
            article.author.as_deref().unwrap_or("unknown"),
            article.content.chars().count(),
            preview(&article.content, 80)
        );
        Ok(respond(summary, &article))
    }
}
