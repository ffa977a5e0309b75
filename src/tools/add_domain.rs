//! add_domain - allow an additional Medium-hosted domain

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{Tool, respond};
use crate::config::domains::{AddOutcome, DomainAllowlist};
use crate::error::MediumResult;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddDomainArgs {
    /// Domain to add (e.g. stackademic.com, blog.example.com)
    pub domain: String,
}

#[derive(Clone)]
pub struct AddDomainTool {
    domains: Arc<DomainAllowlist>,
}

impl AddDomainTool {
    pub fn new(domains: Arc<DomainAllowlist>) -> Self {
        Self { domains }
    }
}

#[async_trait]
impl Tool for AddDomainTool {
    type Args = AddDomainArgs;

    fn name() -> &'static str {
        "add_domain"
    }

    fn description() -> &'static str {
        "Add a custom Medium partner domain to the allowed list. The domain is saved to the config file.\n\n\
         Example: add_domain({\"domain\": \"stackademic.com\"})"
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, args: Self::Args) -> MediumResult<Vec<Content>> {
        let (domain, outcome) = self.domains.add(&args.domain)?;

        let payload = match outcome {
            AddOutcome::AlreadyDefault => json!({
                "message": format!("Domain '{domain}' is already a default domain."),
                "domain": domain,
            }),
            AddOutcome::AlreadyCustom => json!({
                "message": format!("Domain '{domain}' already exists in custom domains."),
                "domain": domain,
            }),
            AddOutcome::Added => json!({
                "message": format!("Domain added: {domain}"),
                "domain": domain,
                "allDomains": self.domains.domains(),
            }),
        };

        let message = payload["message"].as_str().unwrap_or_default().to_string();
        let summary = format!("\x1b[32m󰐕 Add Domain\x1b[0m\n {message}");
        Ok(respond(summary, &payload))
    }
}
