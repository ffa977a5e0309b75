//! Main-content detection
//!
//! The `readability` crate picks the content node. Its HTML is then passed
//! through a scraper-based cleanup that drops page chrome and resolves links.
//! Byline, excerpt and title come from the original document.

use scraper::{ElementRef, Html, Node, Selector};
use std::io::Cursor;
use tracing::debug;
use url::Url;

const BYLINE_SELECTORS: &[&str] = &[
    "[rel=\"author\"]",
    "[itemprop=\"author\"]",
    ".byline",
    "[data-testid=\"authorName\"]",
];

const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "nav", "aside", "footer", "header", "form", "button", "svg", "iframe",
    "noscript", "input", "select", "textarea", "object", "embed", "link", "meta", "title",
];

const VOID_TAGS: &[&str] = &["img", "br", "hr", "source", "wbr"];

const KEPT_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title"];

/// Class/id parts that mark a subtree as page chrome
const BOILERPLATE_NAMES: &[&str] = &[
    "comment", "comments", "share", "social", "sidebar", "related", "newsletter", "subscribe",
    "promo", "footer", "nav", "navbar", "menu", "breadcrumb", "breadcrumbs", "cookie", "banner",
    "advert", "sponsor", "recommended", "metabar",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readable {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    /// Cleaned HTML of the main content
    pub content_html: String,
}

/// Locate the main content of `html`; `None` when the page has no readable text.
///
/// When readability finds nothing usable the whole `<body>` is cleaned and
/// used instead, so pages made of short lines still extract.
pub fn parse(html: &str, document: &Html, base: &Url) -> Option<Readable> {
    let main = match readability::extractor::extract(&mut Cursor::new(html.as_bytes()), base) {
        Ok(product) => clean_html(&Html::parse_document(&product.content), base),
        Err(e) => {
            debug!(error = ?e, "Readability pass failed, using document body");
            String::new()
        }
    };

    let content_html = if has_text(&main) {
        main
    } else {
        clean_html(document, base)
    };
    if !has_text(&content_html) {
        return None;
    }

    let content = Html::parse_document(&content_html);
    Some(Readable {
        title: title(document),
        byline: byline(document),
        excerpt: meta_excerpt(document).or_else(|| first_paragraph(&content)),
        content_html,
    })
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    root.select(&selector).next()
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|c| !c.is_empty())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn has_text(fragment: &str) -> bool {
    !fragment.is_empty()
        && Html::parse_fragment(fragment)
            .root_element()
            .text()
            .any(|t| !t.trim().is_empty())
}

/// Page title: og:title, then `<title>` without site suffixes, then first `h1`
pub fn title(document: &Html) -> Option<String> {
    if let Some(og) = meta_content(document, "meta[property=\"og:title\"]") {
        return Some(og);
    }
    let root = document.root_element();
    if let Some(raw) = select_first(root, "title").map(text_of)
        && !raw.is_empty()
    {
        return Some(clean_title(&raw));
    }
    select_first(root, "h1").map(text_of).filter(|t| !t.is_empty())
}

/// Strip up to two trailing ` | Site` style segments.
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();
    for _ in 0..2 {
        let Some((head, tail)) = [" | ", " – ", " — ", " - "]
            .iter()
            .filter_map(|sep| title.rsplit_once(sep))
            .max_by_key(|(head, _)| head.len())
        else {
            break;
        };
        let head = head.trim();
        if head.is_empty() || tail.split_whitespace().count() > 4 {
            break;
        }
        title = head.to_string();
    }
    title
}

fn byline(document: &Html) -> Option<String> {
    let root = document.root_element();
    BYLINE_SELECTORS.iter().find_map(|css| {
        let selector = selector(css)?;
        root.select(&selector)
            .map(|el| {
                el.value()
                    .attr("content")
                    .map(collapse_whitespace)
                    .unwrap_or_else(|| text_of(el))
            })
            .find(|text| !text.is_empty() && text.chars().count() <= 100)
    })
}

fn meta_excerpt(document: &Html) -> Option<String> {
    meta_content(document, "meta[name=\"description\"]")
        .or_else(|| meta_content(document, "meta[property=\"og:description\"]"))
}

fn first_paragraph(content: &Html) -> Option<String> {
    let selector = selector("p")?;
    content.select(&selector).map(text_of).find(|t| !t.is_empty())
}

fn is_boilerplate(el: ElementRef<'_>) -> bool {
    let value = el.value();
    [value.attr("class"), value.id()]
        .into_iter()
        .flatten()
        .flat_map(|names| names.split(|c: char| c.is_whitespace() || c == '-' || c == '_'))
        .any(|part| BOILERPLATE_NAMES.contains(&part.to_ascii_lowercase().as_str()))
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn absolutize(base: &Url, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    base.join(trimmed).ok().map(String::from)
}

/// Serialize the `<body>` of `document` without chrome, with absolute links.
fn clean_html(document: &Html, base: &Url) -> String {
    let Some(body) = selector("body").and_then(|s| document.select(&s).next()) else {
        return String::new();
    };
    let mut out = String::new();
    push_children(body, base, &mut out);
    out.trim().to_string()
}

fn push_children(el: ElementRef<'_>, base: &Url, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape(text, false)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_element(child, base, out);
                }
            }
            _ => {}
        }
    }
}

fn push_element(el: ElementRef<'_>, base: &Url, out: &mut String) {
    let tag = el.value().name();
    if EXCLUDED_TAGS.contains(&tag) || is_boilerplate(el) {
        return;
    }

    out.push('<');
    out.push_str(tag);
    for name in KEPT_ATTRIBUTES {
        let Some(value) = el.value().attr(name) else {
            continue;
        };
        let value = match *name {
            "href" | "src" => match absolutize(base, value) {
                Some(url) => url,
                None => continue,
            },
            _ => value.to_string(),
        };
        out.push_str(&format!(" {name}=\"{}\"", escape(&value, true)));
    }
    out.push('>');

    if VOID_TAGS.contains(&tag) {
        return;
    }
    push_children(el, base, out);
    out.push_str(&format!("</{tag}>"));
}
