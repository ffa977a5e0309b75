//! Raw field bundles read from a rendered listing page

use chromiumoxide::Page;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BoxError;
use crate::utils::eval_json;

/// Fields of one `<article>` card exactly as the page exposes them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListing {
    pub title: Option<String>,
    pub href: Option<String>,
    pub author_text: Option<String>,
    pub author_href: Option<String>,
    pub excerpt: Option<String>,
    /// `datetime` attribute of a `<time>` element
    pub datetime: Option<String>,
    /// Visible text of the whole card, scanned for date tokens
    pub text: Option<String>,
    pub reading_time: Option<String>,
    pub claps: Option<String>,
    pub publication_text: Option<String>,
    pub publication_href: Option<String>,
    pub categories: Vec<String>,
}

/// Returns one bundle per `<article>` element, in document order
pub const LISTING_SCRIPT: &str = r#"(() => {
  const text = (el) => {
    if (!el) return null;
    const value = (el.textContent || "").trim();
    return value.length ? value : null;
  };
  const attr = (el, name) => (el ? el.getAttribute(name) : null);
  const profilePath = /\/@[^/?#]+\/?(?:[?#]|$)/;

  return Array.from(document.querySelectorAll("article")).map((article) => {
    const heading = article.querySelector("h2, h3");
    const link = article.querySelector('a[href*="/@"], a[href*="/p/"]');
    const authorLinks = Array.from(article.querySelectorAll('a[href*="/@"]'));
    const authorLink =
      authorLinks.find((a) => profilePath.test(a.getAttribute("href") || "") && text(a)) ||
      authorLinks.find((a) => profilePath.test(a.getAttribute("href") || "")) ||
      null;

    let excerpt = text(article.querySelector("p"));
    if (!excerpt) {
      const sub = Array.from(article.querySelectorAll("h3, h4")).find((h) => h !== heading);
      excerpt = text(sub);
    }

    const readingTime = Array.from(article.querySelectorAll("span, div"))
      .filter((el) => el.children.length === 0)
      .map((el) => text(el))
      .find((t) => t && /min read/i.test(t)) || null;

    let claps = null;
    const clapIcon = article.querySelector('[aria-label*="clap" i], [data-testid*="clap" i]');
    if (clapIcon) {
      const host = clapIcon.closest("div, span, button") || clapIcon;
      const scope = host.parentElement || host;
      const count = Array.from(scope.querySelectorAll("span, p"))
        .map((el) => text(el))
        .find((t) => t && /^\d[\d.,]*[KkMm]?$/.test(t));
      claps = count || null;
    }

    let pubLink = article.querySelector('a[href*="/publication/"]');
    if (!pubLink) {
      pubLink = Array.from(article.querySelectorAll('a[href^="https://"]')).find((a) => {
        try {
          const host = new URL(a.href).hostname;
          return host !== "medium.com" && !host.endsWith(".medium.com");
        } catch (_) {
          return false;
        }
      }) || null;
    }

    return {
      title: text(heading),
      href: attr(link, "href"),
      authorText: text(authorLink),
      authorHref: attr(authorLink, "href"),
      excerpt,
      datetime: attr(article.querySelector("time"), "datetime"),
      text: article.innerText || article.textContent || null,
      readingTime,
      claps,
      publicationText: text(pubLink),
      publicationHref: attr(pubLink, "href"),
      categories: Array.from(article.querySelectorAll('a[href*="/tag/"]'))
        .map((a) => text(a))
        .filter(Boolean),
    };
  });
})()"#;

/// Run [`LISTING_SCRIPT`] and return the bundles undecoded.
///
/// Each bundle is decoded separately so one malformed card cannot fail the
/// batch.
pub async fn collect_raw(page: &Page) -> Result<Vec<Value>, BoxError> {
    eval_json::<Vec<Value>>(page, LISTING_SCRIPT).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_none() {
        let raw: RawListing = serde_json::from_value(json!({
            "title": "Hello",
            "href": "/@alice/hello-1",
            "authorText": null
        }))
        .unwrap();
        assert_eq!(raw.title.as_deref(), Some("Hello"));
        assert_eq!(raw.author_text, None);
        assert!(raw.categories.is_empty());
    }

    #[test]
    fn wrong_types_fail_to_decode() {
        assert!(serde_json::from_value::<RawListing>(json!({"title": 42})).is_err());
        assert!(serde_json::from_value::<RawListing>(json!("card")).is_err());
    }
}
