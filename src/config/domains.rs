//! Allowlist of hostnames that serve Medium content
//!
//! Built-in domains, the persisted custom domains from `config.json` and the
//! `MEDIUM_ADDITIONAL_DOMAINS` environment list are merged, deduplicated and
//! cached until [`DomainAllowlist::invalidate`] is called after a mutation.

use parking_lot::RwLock;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use url::Url;

use super::settings::{Settings, env_domains};
use crate::error::{MediumError, MediumResult};

pub const DEFAULT_DOMAINS: &[&str] = &[
    "medium.com",
    "towardsdatascience.com",
    "betterprogramming.pub",
    "levelup.gitconnected.com",
    "uxdesign.cc",
    "eand.co",
    "betterhumans.pub",
    "writingcooperative.com",
];

static GLOBAL_ALLOWLIST: OnceLock<Arc<DomainAllowlist>> = OnceLock::new();

pub struct DomainAllowlist {
    settings_path: PathBuf,
    /// Fixed environment list; `None` reads the process environment on refresh
    env_override: Option<Vec<String>>,
    cache: RwLock<Option<Vec<String>>>,
}

/// Result of [`DomainAllowlist::add`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    AlreadyDefault,
    AlreadyCustom,
    Added,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainListing {
    pub default_domains: Vec<String>,
    pub custom_domains: Vec<String>,
    pub all_domains: Vec<String>,
    pub config_path: String,
}

impl DomainAllowlist {
    pub fn global() -> Arc<DomainAllowlist> {
        GLOBAL_ALLOWLIST
            .get_or_init(|| Arc::new(DomainAllowlist::new(Settings::path(), None)))
            .clone()
    }

    pub fn new(settings_path: PathBuf, env_override: Option<Vec<String>>) -> Self {
        Self {
            settings_path,
            env_override,
            cache: RwLock::new(None),
        }
    }

    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    fn settings(&self) -> Settings {
        Settings::load_from(&self.settings_path)
    }

    /// Merged allowlist in first-seen order
    pub fn domains(&self) -> Vec<String> {
        if let Some(cached) = self.cache.read().as_ref() {
            return cached.clone();
        }

        let env = self.env_override.clone().unwrap_or_else(env_domains);
        let mut merged: Vec<String> = Vec::new();
        let candidates = DEFAULT_DOMAINS
            .iter()
            .map(|d| d.to_string())
            .chain(self.settings().additional_domains)
            .chain(env);
        for domain in candidates {
            let domain = domain.trim().to_lowercase();
            if !domain.is_empty() && !merged.contains(&domain) {
                merged.push(domain);
            }
        }

        debug!(count = merged.len(), "Domain allowlist rebuilt");
        *self.cache.write() = Some(merged.clone());
        merged
    }

    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    pub fn is_allowed_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        host.ends_with(".medium.com")
            || self
                .domains()
                .iter()
                .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }

    /// Parse `raw` and require an http(s) URL on an allowed host.
    pub fn check_url(&self, raw: &str) -> MediumResult<Url> {
        let url = Url::parse(raw.trim()).map_err(|_| MediumError::InvalidUrl { url: raw.to_string() })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MediumError::InvalidUrl { url: raw.to_string() });
        }
        let host = url
            .host_str()
            .ok_or_else(|| MediumError::InvalidUrl { url: raw.to_string() })?
            .to_string();
        if !self.is_allowed_host(&host) {
            return Err(MediumError::DomainNotAllowed {
                url: raw.to_string(),
                host,
            });
        }
        Ok(url)
    }

    pub fn add(&self, domain: &str) -> MediumResult<(String, AddOutcome)> {
        let domain = normalize_domain(domain)?;

        if DEFAULT_DOMAINS.contains(&domain.as_str()) {
            return Ok((domain, AddOutcome::AlreadyDefault));
        }

        let mut settings = self.settings();
        if settings.additional_domains.contains(&domain) {
            return Ok((domain, AddOutcome::AlreadyCustom));
        }

        settings.additional_domains.push(domain.clone());
        settings.save_to(&self.settings_path)?;
        self.invalidate();
        info!(%domain, "Domain added");
        Ok((domain, AddOutcome::Added))
    }

    pub fn remove(&self, domain: &str) -> MediumResult<String> {
        let domain = domain.trim().to_lowercase();

        if DEFAULT_DOMAINS.contains(&domain.as_str()) {
            return Err(MediumError::InvalidArgument(format!(
                "Cannot remove '{domain}' - it is a default domain."
            )));
        }

        let mut settings = self.settings();
        let Some(index) = settings.additional_domains.iter().position(|d| *d == domain) else {
            return Err(MediumError::InvalidArgument(format!(
                "Domain '{domain}' not found in custom domains."
            )));
        };

        settings.additional_domains.remove(index);
        settings.save_to(&self.settings_path)?;
        self.invalidate();
        info!(%domain, "Domain removed");
        Ok(domain)
    }

    pub fn listing(&self) -> DomainListing {
        DomainListing {
            default_domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            custom_domains: self.settings().additional_domains,
            all_domains: self.domains(),
            config_path: self.settings_path.display().to_string(),
        }
    }
}

fn normalize_domain(domain: &str) -> MediumResult<String> {
    let domain = domain.trim().to_lowercase();
    if domain.len() < 3 || !domain.contains('.') {
        return Err(MediumError::InvalidArgument(
            "Invalid domain format. Domain must include a dot.".to_string(),
        ));
    }
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist(dir: &tempfile::TempDir, env: &[&str]) -> DomainAllowlist {
        DomainAllowlist::new(
            dir.path().join("config.json"),
            Some(env.iter().map(|d| d.to_string()).collect()),
        )
    }

    #[test]
    fn subdomains_match_but_lookalikes_do_not() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        assert!(list.is_allowed_host("medium.com"));
        assert!(list.is_allowed_host("foo.medium.com"));
        assert!(list.is_allowed_host("towardsdatascience.com"));
        assert!(!list.is_allowed_host("notmedium.com.evil.com"));
        assert!(!list.is_allowed_host("evilmedium.com"));
    }

    #[test]
    fn check_url_distinguishes_invalid_and_disallowed() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        assert!(list.check_url("https://medium.com/@user/slug").is_ok());
        assert!(matches!(list.check_url("not a url"), Err(MediumError::InvalidUrl { .. })));
        assert!(matches!(list.check_url("ftp://medium.com/x"), Err(MediumError::InvalidUrl { .. })));
        assert!(matches!(
            list.check_url("https://example.org/post"),
            Err(MediumError::DomainNotAllowed { .. })
        ));
    }

    #[test]
    fn env_domains_are_merged_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &["medium.com", "blog.example.com"]);
        let domains = list.domains();
        assert_eq!(domains.iter().filter(|d| *d == "medium.com").count(), 1);
        assert!(domains.contains(&"blog.example.com".to_string()));
        assert!(list.is_allowed_host("blog.example.com"));
    }

    #[test]
    fn add_then_list_includes_domain() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        assert!(!list.is_allowed_host("stackademic.com"));

        let (domain, outcome) = list.add("  Stackademic.com ").unwrap();
        assert_eq!(domain, "stackademic.com");
        assert_eq!(outcome, AddOutcome::Added);

        let listing = list.listing();
        assert!(listing.custom_domains.contains(&domain));
        assert!(listing.all_domains.contains(&domain));
        assert!(list.is_allowed_host("stackademic.com"));

        assert_eq!(list.add("stackademic.com").unwrap().1, AddOutcome::AlreadyCustom);
        assert_eq!(list.add("medium.com").unwrap().1, AddOutcome::AlreadyDefault);
    }

    #[test]
    fn add_rejects_dotless_domain() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        assert!(matches!(list.add("localhost"), Err(MediumError::InvalidArgument(_))));
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn removing_default_domain_fails_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        list.add("stackademic.com").unwrap();
        let before = std::fs::read_to_string(dir.path().join("config.json")).unwrap();

        assert!(list.remove("medium.com").is_err());

        let after = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert_eq!(before, after);
        assert!(list.domains().contains(&"medium.com".to_string()));
    }

    #[test]
    fn remove_custom_domain() {
        let dir = tempfile::tempdir().unwrap();
        let list = allowlist(&dir, &[]);
        list.add("stackademic.com").unwrap();
        assert_eq!(list.remove("STACKADEMIC.com").unwrap(), "stackademic.com");

        let listing = list.listing();
        assert!(!listing.custom_domains.contains(&"stackademic.com".to_string()));
        assert!(!listing.all_domains.contains(&"stackademic.com".to_string()));
        assert!(list.remove("stackademic.com").is_err());
    }
}
