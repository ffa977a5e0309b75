//! Schema checks run on every record before it leaves the crate

use url::Url;

use super::{Article, AuthorArticle, AuthorArticlesResponse, SearchResponse, SearchResult};
use crate::error::{MediumError, MediumResult};

pub trait Validate: Sized {
    const RECORD: &'static str;

    /// Every rule the record breaks, empty when valid
    fn violations(&self) -> Vec<String>;

    fn validate(self) -> MediumResult<Self> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(self)
        } else {
            tracing::error!(record = Self::RECORD, ?violations, "Extracted record failed validation");
            Err(MediumError::Validation {
                record: Self::RECORD,
                violations,
            })
        }
    }
}

fn require_text(field: &str, value: &str, out: &mut Vec<String>) {
    if value.trim().is_empty() {
        out.push(format!("{field}: must not be empty"));
    }
}

fn require_url(field: &str, value: &str, out: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        Ok(url) => out.push(format!("{field}: unsupported URL '{url}'")),
        Err(e) => out.push(format!("{field}: invalid URL '{value}' ({e})")),
    }
}

fn nested<T: Validate>(prefix: &str, items: &[T], out: &mut Vec<String>) {
    for (i, item) in items.iter().enumerate() {
        out.extend(item.violations().into_iter().map(|v| format!("{prefix}[{i}].{v}")));
    }
}

impl Validate for Article {
    const RECORD: &'static str = "Article";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        require_text("title", &self.title, &mut out);
        require_text("content", &self.content, &mut out);
        require_url("url", &self.url, &mut out);
        out
    }
}

impl Validate for AuthorArticle {
    const RECORD: &'static str = "AuthorArticle";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        require_text("title", &self.title, &mut out);
        require_url("url", &self.url, &mut out);
        out
    }
}

impl Validate for SearchResult {
    const RECORD: &'static str = "SearchResult";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        require_text("title", &self.title, &mut out);
        require_url("url", &self.url, &mut out);
        out
    }
}

impl Validate for AuthorArticlesResponse {
    const RECORD: &'static str = "AuthorArticlesResponse";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        require_text("username", &self.username, &mut out);
        if self.article_count != self.articles.len() {
            out.push(format!(
                "articleCount: {} does not match {} articles",
                self.article_count,
                self.articles.len()
            ));
        }
        nested("articles", &self.articles, &mut out);
        out
    }
}

impl Validate for SearchResponse {
    const RECORD: &'static str = "SearchResponse";

    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.result_count != self.results.len() {
            out.push(format!(
                "resultCount: {} does not match {} results",
                self.result_count,
                self.results.len()
            ));
        }
        nested("results", &self.results, &mut out);
        out
    }
}
