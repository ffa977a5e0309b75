//! Pure normalization of raw listing bundles

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::raw::RawListing;
use crate::extractor::collapse_whitespace;
use crate::model::{ArticleSource, AuthorArticle, SearchResult};
use crate::utils::constants::MEDIUM_ORIGIN;

static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+\s*(?:mo|[mhdwy]|mins?|minutes?|hours?|days?|weeks?|months?|years?)\s+ago\b")
        .expect("relative date pattern")
});

static CALENDAR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+\d{1,2}(?:,\s*\d{4})?\b",
    )
    .expect("calendar date pattern")
});

static CLAP_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:[.,]\d+)?)\s*([KkMm]?)$").expect("clap count pattern"));

/// Resolve a listing href against the Medium origin.
pub fn absolute_url(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(MEDIUM_ORIGIN).ok()?;
    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// URL with query string and fragment removed, used both for dedup and as the
/// stored record URL.
pub fn dedup_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    }
}

/// `@name` path segment of a profile or post link.
pub fn username_from_href(href: &str) -> Option<String> {
    let start = href.find('@')? + 1;
    let name: String = href[start..]
        .chars()
        .take_while(|c| !matches!(c, '/' | '?' | '#'))
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Publication slug from a link: `/publication/x`, a custom domain host, or the
/// first path segment that is neither a profile nor `p`.
pub fn publication_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href)
        .or_else(|_| Url::parse(MEDIUM_ORIGIN).and_then(|base| base.join(href)))
        .ok()?;
    let host = url.host_str()?.trim_start_matches("www.");
    if host != "medium.com" && !host.ends_with(".medium.com") {
        return Some(host.to_string());
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let first = segments.next()?;
    if first == "publication" {
        return segments.next().map(str::to_string);
    }
    if first.starts_with('@') || first == "p" || first == "tag" || first == "search" {
        return None;
    }
    Some(first.to_string())
}

/// First relative ("3d ago") or calendar ("Mar 4, 2024", "Mar 4") date token.
pub fn find_date_in_text(text: &str) -> Option<String> {
    let relative = RELATIVE_DATE.find(text);
    let calendar = CALENDAR_DATE.find(text);
    let found = match (relative, calendar) {
        (Some(a), Some(b)) => Some(if a.start() <= b.start() { a } else { b }),
        (a, b) => a.or(b),
    };
    found.map(|m| m.as_str().trim().to_string())
}

/// Parse a clap counter such as `842`, `1,024` or `1.2K`.
pub fn parse_claps(text: &str) -> Option<u64> {
    let caps = CLAP_COUNT.captures(text.trim())?;
    let number = caps.get(1)?.as_str();
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("K" | "k") => 1_000.0,
        Some("M" | "m") => 1_000_000.0,
        _ => 1.0,
    };
    let value: f64 = if multiplier == 1.0 {
        number.replace(',', "").parse().ok()?
    } else {
        number.replace(',', ".").parse().ok()?
    };
    Some((value * multiplier).round() as u64)
}

fn clean(text: Option<&str>) -> Option<String> {
    let text = collapse_whitespace(text?);
    (!text.is_empty()).then_some(text)
}

/// A listing card with every field normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    /// Absolute URL without query string
    pub url: String,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub published_at: Option<String>,
    pub reading_time: Option<String>,
    pub claps: Option<u64>,
    pub publication: Option<String>,
    pub categories: Vec<String>,
}

impl ListingItem {
    /// `None` when the card has no title or no usable link.
    pub fn from_raw(raw: &RawListing) -> Option<Self> {
        let title = clean(raw.title.as_deref())?;
        let url = dedup_key(&absolute_url(raw.href.as_deref()?)?);

        let author = clean(raw.author_text.as_deref())
            .or_else(|| raw.author_href.as_deref().and_then(username_from_href));

        let published_at = clean(raw.datetime.as_deref())
            .or_else(|| raw.text.as_deref().and_then(find_date_in_text));

        let publication = clean(raw.publication_text.as_deref())
            .or_else(|| raw.publication_href.as_deref().and_then(publication_from_href));

        Some(Self {
            title,
            url,
            author,
            excerpt: clean(raw.excerpt.as_deref()),
            published_at,
            reading_time: clean(raw.reading_time.as_deref()),
            claps: raw.claps.as_deref().and_then(parse_claps),
            publication,
            categories: raw
                .categories
                .iter()
                .filter_map(|c| clean(Some(c.as_str())))
                .collect(),
        })
    }
}

impl From<ListingItem> for AuthorArticle {
    fn from(item: ListingItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
            published_at: item.published_at,
            updated_at: None,
            author: item.author,
            excerpt: item.excerpt,
            categories: item.categories,
            content: None,
            claps: item.claps,
            reading_time: item.reading_time,
            source: ArticleSource::Scrape,
        }
    }
}

impl From<ListingItem> for SearchResult {
    fn from(item: ListingItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
            author: item.author,
            published_at: item.published_at,
            excerpt: item.excerpt,
            claps: item.claps,
            reading_time: item.reading_time,
            publication: item.publication,
        }
    }
}
