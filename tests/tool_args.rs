use medium_mcp::{
    ArticleSource, ListAuthorArticlesArgs, ReadArticleArgs, SearchArticlesArgs, SearchAuthorArticlesArgs,
};
use serde_json::json;

#[test]
fn omitted_listing_arguments_take_defaults() {
    let args: ListAuthorArticlesArgs = serde_json::from_value(json!({ "username": "alice" })).unwrap();
    assert_eq!(args.username, "alice");
    assert_eq!(args.source, ArticleSource::Rss);
    assert_eq!(args.limit, 10);
    assert_eq!(args.keyword, None);

    let args: ListAuthorArticlesArgs =
        serde_json::from_value(json!({ "username": "@bob", "source": "scrape", "limit": 25 })).unwrap();
    assert_eq!(args.source, ArticleSource::Scrape);
    assert_eq!(args.limit, 25);

    let args: SearchArticlesArgs = serde_json::from_value(json!({ "query": "rust async" })).unwrap();
    assert_eq!(args.limit, 10);
}

#[test]
fn required_arguments_are_enforced() {
    assert!(serde_json::from_value::<ReadArticleArgs>(json!({})).is_err());
    assert!(serde_json::from_value::<SearchAuthorArticlesArgs>(json!({ "username": "alice" })).is_err());
    assert!(serde_json::from_value::<ListAuthorArticlesArgs>(json!({ "username": "a", "source": "api" })).is_err());

    let args: SearchAuthorArticlesArgs =
        serde_json::from_value(json!({ "username": "alice", "keyword": "tokio" })).unwrap();
    assert_eq!(args.keyword, "tokio");
}
