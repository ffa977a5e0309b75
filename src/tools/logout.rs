//! logout - delete the saved session

use async_trait::async_trait;
use rmcp::model::Content;
use serde_json::json;
use std::sync::Arc;

use super::{NoArgs, Tool, respond};
use crate::error::MediumResult;
use crate::manager::BrowserManager;

#[derive(Clone)]
pub struct LogoutTool {
    manager: Arc<BrowserManager>,
}

impl LogoutTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for LogoutTool {
    type Args = NoArgs;

    fn name() -> &'static str {
        "logout"
    }

    fn description() -> &'static str {
        "Delete the saved Medium login session."
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, _args: Self::Args) -> MediumResult<Vec<Content>> {
        let message = self.manager.clear_login_state()?;
        let summary = format!("\x1b[33m󰍃 Logout\x1b[0m\n {message}");
        Ok(respond(summary, &json!({ "success": true, "message": message })))
    }
}
