//! list_domains - show the merged domain allowlist

use async_trait::async_trait;
use rmcp::model::Content;
use std::sync::Arc;

use super::{NoArgs, Tool, respond};
use crate::config::domains::DomainAllowlist;
use crate::error::MediumResult;

#[derive(Clone)]
pub struct ListDomainsTool {
    domains: Arc<DomainAllowlist>,
}

impl ListDomainsTool {
    pub fn new(domains: Arc<DomainAllowlist>) -> Self {
        Self { domains }
    }
}

#[async_trait]
impl Tool for ListDomainsTool {
    type Args = NoArgs;

    fn name() -> &'static str {
        "list_domains"
    }

    fn description() -> &'static str {
        "Show all allowed Medium domains (default + custom + environment)."
    }

    fn read_only() -> bool {
        true
    }

    fn open_world() -> bool {
        false
    }

    async fn execute(&self, _args: Self::Args) -> MediumResult<Vec<Content>> {
        let listing = self.domains.listing();
        let summary = format!(
            "\x1b[36m󰖟 Domains\x1b[0m\n Default: {} · Custom: {} · Total: {}",
            listing.default_domains.len(),
            listing.custom_domains.len(),
            listing.all_domains.len()
        );
        Ok(respond(summary, &listing))
    }
}
