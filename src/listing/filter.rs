//! Keyword post-filter over fetched listings

use crate::model::AuthorArticle;

/// Case-insensitive substring match on title, excerpt or any category.
pub fn matches_keyword(article: &AuthorArticle, keyword: &str) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);
    hit(article.title.as_str())
        || article.excerpt.as_deref().is_some_and(hit)
        || article.categories.iter().any(|c| hit(c.as_str()))
}

pub fn filter_by_keyword(articles: &[AuthorArticle], keyword: &str) -> Vec<AuthorArticle> {
    articles
        .iter()
        .filter(|a| matches_keyword(a, keyword))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArticleSource, AuthorArticlesResponse};

    fn article(title: &str, excerpt: Option<&str>, categories: &[&str]) -> AuthorArticle {
        AuthorArticle {
            title: title.into(),
            url: format!("https://medium.com/@a/{}", title.to_lowercase().replace(' ', "-")),
            published_at: None,
            updated_at: None,
            author: None,
            excerpt: excerpt.map(str::to_string),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            content: None,
            claps: None,
            reading_time: None,
            source: ArticleSource::Rss,
        }
    }

    #[test]
    fn matches_title_excerpt_and_categories() {
        let articles = vec![
            article("Async Rust in Practice", None, &[]),
            article("Notes", Some("Why I moved to RUST"), &[]),
            article("Weekly", None, &["rust", "programming"]),
            article("Gardening", Some("Tomatoes"), &["life"]),
        ];
        let hits = filter_by_keyword(&articles, "Rust");
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|a| a.title != "Gardening"));
    }

    #[test]
    fn retain_keyword_recomputes_count() {
        let mut resp = AuthorArticlesResponse::new(
            "a",
            vec![article("Rust", None, &[]), article("Go", None, &[])],
            ArticleSource::Rss,
            true,
        );
        resp.retain_keyword("rust");
        assert_eq!(resp.article_count, 1);
        assert_eq!(resp.articles[0].title, "Rust");
    }
}
