//! save_login - persist the interactive session and close the browser

use async_trait::async_trait;
use rmcp::model::Content;
use serde_json::json;
use std::sync::Arc;

use super::{NoArgs, Tool, respond};
use crate::error::MediumResult;
use crate::manager::BrowserManager;

#[derive(Clone)]
pub struct SaveLoginTool {
    manager: Arc<BrowserManager>,
}

impl SaveLoginTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for SaveLoginTool {
    type Args = NoArgs;

    fn name() -> &'static str {
        "save_login"
    }

    fn description() -> &'static str {
        "Save the session from the browser opened by 'login' and close that browser.\n\n\
         Call this after you have finished signing in."
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, _args: Self::Args) -> MediumResult<Vec<Content>> {
        let message = self.manager.persist_login_state().await?;
        let path = self.manager.session_store().path().display().to_string();
        let summary = format!("\x1b[32m󰆓 Save Login\x1b[0m\n {message}");
        Ok(respond(
            summary,
            &json!({ "success": true, "message": message, "storagePath": path }),
        ))
    }
}
