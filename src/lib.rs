//! Medium reading tools for AI agents
//!
//! Reads articles as Markdown, lists and searches authors' stories, and keeps
//! a persisted login session, all over one shared chromiumoxide browser.

mod browser;
pub mod browser_setup;
pub mod config;
pub mod error;
pub mod extractor;
pub mod listing;
mod manager;
pub mod model;
pub mod session_store;
mod tools;
mod utils;

pub use browser::{BrowserWrapper, PageOptions, PageSession, launch_browser};
pub use browser_setup::{download_managed_browser, find_browser_executable};
pub use config::BrowserConfig;
pub use config::domains::{AddOutcome, DomainAllowlist, DomainListing};
pub use config::settings::Settings;
pub use error::{MediumError, MediumResult, ToolError};
pub use extractor::{article_from_html, extract_article};
pub use manager::{BrowserManager, LoginStatus};
pub use model::{
    Article, ArticleSource, AuthorArticle, AuthorArticlesResponse, AuthorSearchResponse, ResponseSource,
    SearchResponse, SearchResult, Validate,
};
pub use session_store::{SessionState, SessionStore};
pub use tools::{
    AddDomainTool, ListAuthorArticlesArgs, ListAuthorArticlesTool, ListDomainsTool, LoginStatusTool, LoginTool,
    LogoutTool, MediumServer, ReadArticleArgs, ReadArticleTool, RemoveDomainTool, SaveLoginTool, SearchArticlesArgs,
    SearchArticlesTool, SearchAuthorArticlesArgs, SearchAuthorArticlesTool, Tool,
};

/// Serve the tool set over stdio until the client disconnects.
pub async fn serve_stdio(server: MediumServer) -> anyhow::Result<()> {
    use rmcp::ServiceExt;
    use rmcp::transport::stdio;

    let running = server
        .serve(stdio())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start MCP server: {e}"))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server stopped with an error: {e}"))?;
    Ok(())
}
