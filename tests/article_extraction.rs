use medium_mcp::{Article, MediumError, Validate, article_from_html};

const ARTICLE: &str = include_str!("fixtures/article.html");
const URL: &str = "https://medium.com/@alice/zero-cost-abstractions-1a2b";

#[test]
fn extracts_markdown_and_metadata() {
    let article = article_from_html(ARTICLE, URL).unwrap();

    assert_eq!(article.title, "Zero-cost abstractions");
    assert_eq!(article.author.as_deref(), Some("Alice Example"));
    assert_eq!(article.published_at.as_deref(), Some("2024-03-01T10:00:00.000Z"));
    assert_eq!(
        article.excerpt.as_deref(),
        Some("What zero-cost really means for iterators and closures.")
    );
    assert_eq!(article.url, URL);

    assert!(article.content.contains("## Iterators"), "{}", article.content);
    assert!(article.content.contains("```"), "{}", article.content);
    assert!(article.content.contains("https://medium.com/@alice/monomorphization-explained-9f8e"));
    assert!(!article.content.contains("Sign in"));
    assert!(!article.content.contains("Privacy"));
    assert!(!article.content.contains("__APOLLO_STATE__"));
}

#[test]
fn byline_is_used_without_author_meta() {
    let html = ARTICLE.replace(r#"<meta name="author" content="Alice Example">"#, "");
    let article = article_from_html(&html, URL).unwrap();
    assert_eq!(article.author.as_deref(), Some("Alice E."));
}

#[test]
fn page_without_body_is_an_extraction_error() {
    let html = r#"<html><head><title>Medium</title></head>
        <body><nav><a href="/">Home</a></nav><footer>Terms</footer></body></html>"#;
    match article_from_html(html, URL) {
        Err(MediumError::ArticleExtraction { url, .. }) => assert_eq!(url, URL),
        other => panic!("expected an extraction error, got {other:?}"),
    }
}

#[test]
fn article_records_are_schema_checked() {
    let valid = Article {
        title: "T".into(),
        author: None,
        published_at: None,
        content: "Body".into(),
        excerpt: None,
        url: URL.into(),
    };
    assert!(valid.clone().validate().is_ok());

    let untitled = Article {
        title: String::new(),
        ..valid
    };
    match untitled.validate() {
        Err(MediumError::Validation { record, violations }) => {
            assert_eq!(record, "Article");
            assert!(violations.iter().any(|v| v.starts_with("title")));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}
