//! MCP tool implementations
//!
//! Every tool is a struct implementing [`Tool`]. Successful calls return a
//! short terminal summary followed by the pretty-printed JSON payload; failures
//! return a single `{ "error", "details" }` block flagged `isError`.

mod add_domain;
mod list_author_articles;
mod list_domains;
mod login;
mod login_status;
mod logout;
mod read_article;
mod remove_domain;
mod save_login;
mod search_articles;
mod search_author_articles;
mod server;

pub use add_domain::AddDomainTool;
pub use list_author_articles::{ListAuthorArticlesArgs, ListAuthorArticlesTool};
pub use list_domains::ListDomainsTool;
pub use login::LoginTool;
pub use login_status::LoginStatusTool;
pub use logout::LogoutTool;
pub use read_article::{ReadArticleArgs, ReadArticleTool};
pub use remove_domain::RemoveDomainTool;
pub use save_login::SaveLoginTool;
pub use search_articles::{SearchArticlesArgs, SearchArticlesTool};
pub use search_author_articles::{SearchAuthorArticlesArgs, SearchAuthorArticlesTool};
pub use server::MediumServer;

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject, ToolAnnotations};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::{MediumError, MediumResult};

#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Args: DeserializeOwned + JsonSchema + Send;

    fn name() -> &'static str;

    fn description() -> &'static str;

    fn read_only() -> bool {
        false
    }

    /// Whether the tool reaches outside the local machine
    fn open_world() -> bool {
        true
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>>;
}

/// Arguments of tools that take none
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Object-safe view of a [`Tool`] used by the server's registry
#[async_trait]
pub(crate) trait DynTool: Send + Sync {
    fn tool_name(&self) -> &'static str;

    fn definition(&self) -> rmcp::model::Tool;

    async fn call(&self, arguments: Option<JsonObject>) -> CallToolResult;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn tool_name(&self) -> &'static str {
        T::name()
    }

    fn definition(&self) -> rmcp::model::Tool {
        let mut tool = rmcp::model::Tool::new(T::name(), T::description(), input_schema::<T::Args>());
        tool.annotations = Some(ToolAnnotations {
            read_only_hint: Some(T::read_only()),
            open_world_hint: Some(T::open_world()),
            ..Default::default()
        });
        tool
    }

    async fn call(&self, arguments: Option<JsonObject>) -> CallToolResult {
        let raw = Value::Object(arguments.unwrap_or_default());
        let args = match serde_json::from_value::<T::Args>(raw) {
            Ok(args) => args,
            Err(e) => {
                let err = MediumError::InvalidArgument(format!("Invalid arguments for {}: {e}", T::name()));
                warn!(tool = T::name(), error = %e, "Rejected tool arguments");
                return error_result(&err);
            }
        };

        match self.execute(args).await {
            Ok(content) => CallToolResult::success(content),
            Err(e) => {
                if e.is_internal() {
                    error!(tool = T::name(), error = %e, "Tool produced an invalid record");
                } else {
                    warn!(tool = T::name(), error = %e, "Tool call failed");
                }
                error_result(&e)
            }
        }
    }
}

fn input_schema<A: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(A);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".into(), Value::String("object".into()));
            Arc::new(map)
        }
    }
}

/// Summary block followed by the pretty-printed JSON payload.
pub(crate) fn respond<T: Serialize>(summary: impl Into<String>, payload: &T) -> Vec<Content> {
    let json = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    vec![Content::text(summary.into()), Content::text(json)]
}

pub(crate) fn error_result(err: &MediumError) -> CallToolResult {
    let payload = err.to_tool_error();
    let json = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| format!("{{\"error\": \"{err}\"}}"));
    CallToolResult::error(vec![Content::text(json)])
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

/// Reject values outside `min..=max`.
pub(crate) fn check_range(field: &str, value: usize, min: usize, max: usize) -> MediumResult<usize> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MediumError::InvalidArgument(format!(
            "'{field}' must be between {min} and {max}, got {value}"
        )))
    }
}

/// Reject blank strings, returning the trimmed value.
pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> MediumResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(MediumError::InvalidArgument(format!("'{field}' must not be empty")))
    } else {
        Ok(value)
    }
}
