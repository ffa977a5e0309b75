//! login_status - report whether a saved session exists

use async_trait::async_trait;
use rmcp::model::Content;
use std::sync::Arc;

use super::{NoArgs, Tool, respond};
use crate::error::MediumResult;
use crate::manager::BrowserManager;

#[derive(Clone)]
pub struct LoginStatusTool {
    manager: Arc<BrowserManager>,
}

impl LoginStatusTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for LoginStatusTool {
    type Args = NoArgs;

    fn name() -> &'static str {
        "login_status"
    }

    fn description() -> &'static str {
        "Check whether a saved Medium login session exists and where it is stored."
    }

    fn read_only() -> bool {
        true
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, _args: Self::Args) -> MediumResult<Vec<Content>> {
        let status = self.manager.login_status();
        let mark = if status.logged_in { "\x1b[32m✓" } else { "\x1b[33m✗" };
        let summary = format!("{mark} Login Status\x1b[0m\n {}", status.message);
        Ok(respond(summary, &status))
    }
}
