//! Shared constants for browser sessions and Medium endpoints
//!
//! The fingerprint values below are sent on every browsing context so that
//! headless traffic looks like a regular desktop Chrome on macOS.

/// Chrome user agent string for stealth mode
///
/// Keep the major version in sync with `SEC_CH_UA`.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const SEC_CH_UA: &str = r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#;
pub const SEC_CH_UA_PLATFORM: &str = r#""macOS""#;
pub const NAVIGATOR_PLATFORM: &str = "MacIntel";

pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const ACCEPT_ENCODING: &str = "gzip, deflate, br";

pub const LOCALE: &str = "en-US";
pub const TIMEZONE: &str = "America/New_York";
pub const DEVICE_SCALE_FACTOR: f64 = 2.0;

pub const MEDIUM_ORIGIN: &str = "https://medium.com";
pub const SIGN_IN_URL: &str = "https://medium.com/m/signin";

/// Landmark element that signals rendered article/listing content
pub const CONTENT_MARKER: &str = "article";
