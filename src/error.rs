//! Error taxonomy for every medium_mcp operation
//!
//! Each failure kind is one variant carrying the identifier (URL, username,
//! query) needed to produce an actionable message. Engine errors are wrapped at
//! component boundaries; the user-facing text is derived by
//! [`MediumError::to_tool_error`], a pure function over the variant.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum MediumError {
    #[error("Failed to launch browser: {reason}")]
    BrowserLaunch {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("No browser session found. Please run 'login' first.")]
    NoActiveSession,

    #[error("Failed to extract article content: {reason}")]
    ArticleExtraction {
        url: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to scrape articles for @{username}: {reason}")]
    AuthorScraper {
        username: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Search failed for \"{query}\": {reason}")]
    SearchScraper {
        query: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to fetch RSS feed for @{username}: {reason}")]
    RssFeed {
        username: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{record} failed validation: {}", .violations.join("; "))]
    Validation {
        record: &'static str,
        violations: Vec<String>,
    },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid URL. Please provide a Medium article URL.")]
    DomainNotAllowed { url: String, host: String },

    #[error("Failed to access settings file {}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Failed to access session file {}", .path.display())]
    SessionStore {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    InvalidArgument(String),
}

pub type MediumResult<T> = Result<T, MediumError>;

/// Structured error payload returned to the MCP client with `isError = true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl MediumError {
    pub fn browser_launch(reason: impl Into<String>) -> Self {
        Self::BrowserLaunch {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn article(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArticleExtraction {
            url: url.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn author(username: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AuthorScraper {
            username: username.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn search(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SearchScraper {
            query: query.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn rss(username: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RssFeed {
            username: username.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Attach the underlying cause to a variant that carries an optional source.
    ///
    /// Variants without an optional source are returned unchanged.
    #[must_use]
    pub fn with_source<E>(mut self, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        match &mut self {
            Self::BrowserLaunch { source, .. }
            | Self::ArticleExtraction { source, .. }
            | Self::AuthorScraper { source, .. }
            | Self::SearchScraper { source, .. }
            | Self::RssFeed { source, .. } => *source = Some(err.into()),
            _ => {}
        }
        self
    }

    /// Re-target a page-acquisition failure at the operation that requested it.
    ///
    /// Acquisition reports navigation problems as article extraction errors; the
    /// listing and search flows want them under their own kind and identifier.
    pub(crate) fn retarget(self, wrap: impl FnOnce(String) -> MediumError) -> Self {
        match self {
            Self::ArticleExtraction { reason, source, .. } => {
                let mut err = wrap(reason);
                if let Some(source) = source {
                    err = err.with_source(source);
                }
                err
            }
            other => other,
        }
    }

    /// True for failures that indicate a bug in extraction logic rather than a
    /// user-facing condition.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Convert into the `{ error, details }` object surfaced to the client.
    pub fn to_tool_error(&self) -> ToolError {
        let details = match self {
            Self::BrowserLaunch { .. } => Some(
                "Possible causes:\n\
                 - Chrome/Chromium is not installed\n\
                 - CHROMIUM_PATH points to a missing executable\n\
                 - The managed browser download failed\n\n\
                 Install Chrome or set CHROMIUM_PATH to a Chromium binary."
                    .to_string(),
            ),
            Self::NoActiveSession => Some(
                "Run 'login' first, finish signing in inside the opened browser window, \
                 then run 'save_login'."
                    .to_string(),
            ),
            Self::ArticleExtraction { url, .. } => Some(format!(
                "URL: {url}\n\
                 Possible causes:\n\
                 - The URL is not a valid article\n\
                 - Member-only content (login required)\n\
                 - Unsupported Medium page layout\n\n\
                 If this is member-only content, use the 'login' tool first."
            )),
            Self::AuthorScraper { username, .. } => Some(format!(
                "Username: {username}\n\
                 Possible causes:\n\
                 - The author does not exist\n\
                 - Medium bot detection blocked the page\n\
                 - The profile page layout changed\n\n\
                 Try source='rss' for a faster and more reliable listing."
            )),
            Self::SearchScraper { query, .. } => Some(format!(
                "Query: {query}\n\
                 Possible causes:\n\
                 - Medium bot detection blocked the search page\n\
                 - Network timeout\n\
                 - The search page layout changed\n\n\
                 If you know the author, try 'search_author_articles' which uses RSS."
            )),
            Self::RssFeed { username, .. } => Some(format!(
                "Username: {username}\n\
                 Possible causes:\n\
                 - The username does not exist (check spelling, omit '@')\n\
                 - The author has no public posts\n\
                 - Network connectivity problems\n\n\
                 Try source='scrape' if the feed keeps failing."
            )),
            Self::Validation { violations, .. } => Some(format!(
                "Extracted data did not match the expected shape. This is an internal error, \
                 please report it.\nViolations:\n- {}",
                violations.join("\n- ")
            )),
            Self::DomainNotAllowed { host, .. } => Some(format!(
                "Host '{host}' is not an allowed Medium domain. \
                 Use 'list_domains' to see allowed domains or 'add_domain' to add a custom one."
            )),
            Self::InvalidUrl { .. }
            | Self::Settings { .. }
            | Self::SessionStore { .. }
            | Self::InvalidArgument(_) => None,
        };

        let details = match (details, std::error::Error::source(self)) {
            (Some(d), Some(cause)) => Some(format!("{d}\n\nCause: {cause}")),
            (None, Some(cause)) => Some(format!("Cause: {cause}")),
            (d, None) => d,
        };

        ToolError {
            error: self.to_string(),
            details,
        }
    }
}
