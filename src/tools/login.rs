//! login - open a visible browser at the Medium sign-in page

use async_trait::async_trait;
use rmcp::model::Content;
use serde_json::json;
use std::sync::Arc;

use super::{NoArgs, Tool, respond};
use crate::error::MediumResult;
use crate::manager::BrowserManager;

#[derive(Clone)]
pub struct LoginTool {
    manager: Arc<BrowserManager>,
}

impl LoginTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for LoginTool {
    type Args = NoArgs;

    fn name() -> &'static str {
        "login"
    }

    fn description() -> &'static str {
        "Open a visible browser window at the Medium sign-in page.\n\n\
         Sign in manually in that window, then call 'save_login' to persist the session \
         for member-only articles."
    }

    async fn execute(&self, _args: Self::Args) -> MediumResult<Vec<Content>> {
        let message = self.manager.open_interactive_login().await?;
        let summary = format!("\x1b[33m󰍂 Login\x1b[0m\n {message}");
        Ok(respond(summary, &json!({ "success": true, "message": message })))
    }
}
