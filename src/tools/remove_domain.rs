//! remove_domain - drop a custom domain from the allowlist

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{Tool, respond};
use crate::config::domains::DomainAllowlist;
use crate::error::MediumResult;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemoveDomainArgs {
    /// Custom domain to remove
    pub domain: String,
}

#[derive(Clone)]
pub struct RemoveDomainTool {
    domains: Arc<DomainAllowlist>,
}

impl RemoveDomainTool {
    pub fn new(domains: Arc<DomainAllowlist>) -> Self {
        Self { domains }
    }
}

#[async_trait]
impl Tool for RemoveDomainTool {
    type Args = RemoveDomainArgs;

    fn name() -> &'static str {
        "remove_domain"
    }

    fn description() -> &'static str {
        "Remove a custom domain from the allowed list. Default domains cannot be removed."
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let domain = self.domains.remove(&args.domain)?;
        let message = format!("Domain removed: {domain}");
        let summary = format!("\x1b[33m󰍴 Remove Domain\x1b[0m\n {message}");
        Ok(respond(
            summary,
            &json!({
                "message": message,
                "domain": domain,
                "allDomains": self.domains.domains(),
            }),
        ))
    }
}
