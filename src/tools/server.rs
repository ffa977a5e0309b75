//! MCP server handler: tool registry and dispatch

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    AddDomainTool, DynTool, ListAuthorArticlesTool, ListDomainsTool, LoginStatusTool, LoginTool, LogoutTool,
    ReadArticleTool, RemoveDomainTool, SaveLoginTool, SearchArticlesTool, SearchAuthorArticlesTool,
};
use crate::config::domains::DomainAllowlist;
use crate::listing::http_client;
use crate::manager::BrowserManager;

const INSTRUCTIONS: &str = "Read Medium articles as Markdown, list and search an author's stories, \
     search Medium, and manage the login session used for member-only content.";

#[derive(Clone)]
pub struct MediumServer {
    manager: Arc<BrowserManager>,
    tools: Arc<Vec<Arc<dyn DynTool>>>,
    by_name: Arc<HashMap<&'static str, usize>>,
}

impl MediumServer {
    pub fn new(manager: Arc<BrowserManager>, domains: Arc<DomainAllowlist>, client: reqwest::Client) -> Self {
        let tools: Vec<Arc<dyn DynTool>> = vec![
            Arc::new(ReadArticleTool::new(manager.clone(), domains.clone())),
            Arc::new(LoginTool::new(manager.clone())),
            Arc::new(SaveLoginTool::new(manager.clone())),
            Arc::new(LogoutTool::new(manager.clone())),
            Arc::new(LoginStatusTool::new(manager.clone())),
            Arc::new(ListAuthorArticlesTool::new(manager.clone(), client.clone())),
            Arc::new(SearchArticlesTool::new(manager.clone())),
            Arc::new(SearchAuthorArticlesTool::new(client)),
            Arc::new(AddDomainTool::new(domains.clone())),
            Arc::new(RemoveDomainTool::new(domains.clone())),
            Arc::new(ListDomainsTool::new(domains)),
        ];
        let by_name = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.tool_name(), i))
            .collect();
        info!(tools = tools.len(), "Tools registered");

        Self {
            manager,
            tools: Arc::new(tools),
            by_name: Arc::new(by_name),
        }
    }

    /// Server over the process-wide manager and allowlist.
    pub fn with_defaults() -> reqwest::Result<Self> {
        let manager = BrowserManager::global();
        let client = http_client(manager.config().timeouts.navigation())?;
        Ok(Self::new(manager, DomainAllowlist::global(), client))
    }

    pub fn manager(&self) -> &Arc<BrowserManager> {
        &self.manager
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.tool_name()).collect()
    }

    pub fn tool_definitions(&self) -> Vec<rmcp::model::Tool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Dispatch a call by tool name; `None` for unknown tools.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Option<CallToolResult> {
        let index = *self.by_name.get(name)?;
        debug!(tool = name, "Tool call");
        Some(self.tools[index].call(arguments).await)
    }
}

impl ServerHandler for MediumServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.to_string();
        self.dispatch(&name, request.arguments)
            .await
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {name}"), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrowserConfig;
    use crate::session_store::SessionStore;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn server(dir: &tempfile::TempDir) -> MediumServer {
        let manager = Arc::new(BrowserManager::new(
            BrowserConfig::default(),
            SessionStore::new(dir.path().join("auth.json")),
        ));
        let domains = Arc::new(DomainAllowlist::new(dir.path().join("config.json"), Some(Vec::new())));
        let client = http_client(Duration::from_secs(5)).unwrap();
        MediumServer::new(manager, domains, client)
    }

    fn args(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn payload(result: &CallToolResult, block: usize) -> Value {
        let text = result.content[block].as_text().map(|t| t.text.clone()).unwrap_or_default();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn registers_every_tool_with_object_schema() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);
        let mut names = server.tool_names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "add_domain",
                "list_author_articles",
                "list_domains",
                "login",
                "login_status",
                "logout",
                "read_article",
                "remove_domain",
                "save_login",
                "search_articles",
                "search_author_articles",
            ]
        );
        for tool in server.tool_definitions() {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")), "{}", tool.name);
        }
    }

    #[tokio::test]
    async fn unknown_tools_are_not_dispatched() {
        let dir = tempfile::tempdir().unwrap();
        assert!(server(&dir).dispatch("browser_navigate", None).await.is_none());
    }

    #[tokio::test]
    async fn domain_tools_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let added = server
            .dispatch("add_domain", args(json!({"domain": " Stackademic.COM "})))
            .await
            .unwrap();
        assert_ne!(added.is_error, Some(true));
        assert_eq!(payload(&added, 1)["domain"], "stackademic.com");

        let listed = server.dispatch("list_domains", None).await.unwrap();
        let listing = payload(&listed, 1);
        assert!(listing["allDomains"].as_array().unwrap().contains(&json!("stackademic.com")));
        assert_eq!(listing["customDomains"], json!(["stackademic.com"]));

        let refused = server
            .dispatch("remove_domain", args(json!({"domain": "medium.com"})))
            .await
            .unwrap();
        assert_eq!(refused.is_error, Some(true));
        assert_eq!(payload(&refused, 0)["error"], "Cannot remove 'medium.com' - it is a default domain.");

        let removed = server
            .dispatch("remove_domain", args(json!({"domain": "stackademic.com"})))
            .await
            .unwrap();
        assert_ne!(removed.is_error, Some(true));
        let listed = server.dispatch("list_domains", None).await.unwrap();
        assert_eq!(payload(&listed, 1)["customDomains"], json!([]));
    }

    #[tokio::test]
    async fn read_article_rejects_foreign_hosts_before_browsing() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let result = server
            .dispatch("read_article", args(json!({"url": "https://notmedium.com.evil.com/post"})))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            payload(&result, 0)["error"],
            "Invalid URL. Please provide a Medium article URL."
        );

        let result = server
            .dispatch("read_article", args(json!({"url": "not a url"})))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(!server.manager().is_browser_running().await);
    }

    #[tokio::test]
    async fn argument_problems_are_tool_errors() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);

        let missing = server.dispatch("search_articles", args(json!({}))).await.unwrap();
        assert_eq!(missing.is_error, Some(true));

        let out_of_range = server
            .dispatch("search_articles", args(json!({"query": "rust", "limit": 21})))
            .await
            .unwrap();
        assert_eq!(out_of_range.is_error, Some(true));
        assert_eq!(
            payload(&out_of_range, 0)["error"],
            "'limit' must be between 1 and 20, got 21"
        );
    }

    #[tokio::test]
    async fn save_login_without_login_reports_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let result = server(&dir).dispatch("save_login", None).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            payload(&result, 0)["error"],
            "No browser session found. Please run 'login' first."
        );
    }

    #[tokio::test]
    async fn status_and_logout_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = server(&dir);
        let status = server.dispatch("login_status", None).await.unwrap();
        assert_eq!(payload(&status, 1)["loggedIn"], false);

        let logout = server.dispatch("logout", None).await.unwrap();
        assert_eq!(payload(&logout, 1)["message"], "No login state found.");
    }
}
