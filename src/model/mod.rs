//! Records produced by the extraction pipelines
//!
//! All records serialize camelCase, matching the JSON handed to MCP clients.

mod validate;

pub use validate::Validate;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single article extracted by the readability pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
    /// Markdown body
    pub content: String,
    pub excerpt: Option<String>,
    pub url: String,
}

/// Which acquisition path produced a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
    Rss,
    Scrape,
}

impl ArticleSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Scrape => "scrape",
        }
    }
}

/// Provenance of a whole listing response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Rss,
    Scrape,
    Mixed,
}

impl From<ArticleSource> for ResponseSource {
    fn from(source: ArticleSource) -> Self {
        match source {
            ArticleSource::Rss => Self::Rss,
            ArticleSource::Scrape => Self::Scrape,
        }
    }
}

/// One entry of an author's article listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorArticle {
    pub title: String,
    pub url: String,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub content: Option<String>,
    pub claps: Option<u64>,
    pub reading_time: Option<String>,
    pub source: ArticleSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorArticlesResponse {
    pub username: String,
    pub article_count: usize,
    pub articles: Vec<AuthorArticle>,
    pub source: ResponseSource,
    pub has_more: bool,
}

impl AuthorArticlesResponse {
    pub fn new(username: impl Into<String>, articles: Vec<AuthorArticle>, source: ArticleSource, has_more: bool) -> Self {
        Self {
            username: username.into(),
            article_count: articles.len(),
            articles,
            source: source.into(),
            has_more,
        }
    }

    /// Keep only articles matching `keyword` and recompute the count.
    pub fn retain_keyword(&mut self, keyword: &str) {
        self.articles = crate::listing::filter_by_keyword(&self.articles, keyword);
        self.article_count = self.articles.len();
    }
}

/// One entry of a site-wide search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub excerpt: Option<String>,
    pub claps: Option<u64>,
    pub reading_time: Option<String>,
    pub publication: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub result_count: usize,
    pub results: Vec<SearchResult>,
    pub has_more: bool,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>, has_more: bool) -> Self {
        Self {
            query: query.into(),
            result_count: results.len(),
            results,
            has_more,
        }
    }
}

/// Result of `search_author_articles`: an RSS listing narrowed by keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSearchResponse {
    pub username: String,
    pub keyword: String,
    pub match_count: usize,
    pub articles: Vec<AuthorArticle>,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_serializes_camel_case_with_nulls() {
        let article = Article {
            title: "T".into(),
            author: None,
            published_at: Some("2024-01-01T00:00:00Z".into()),
            content: "body".into(),
            excerpt: None,
            url: "https://medium.com/@a/t".into(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["publishedAt"], "2024-01-01T00:00:00Z");
        assert!(json["author"].is_null());
    }

    #[test]
    fn response_source_tags_are_lowercase() {
        let resp = AuthorArticlesResponse::new("x", Vec::new(), ArticleSource::Rss, true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["source"], "rss");
        assert_eq!(json["articleCount"], 0);
        assert_eq!(json["hasMore"], true);
    }
}
