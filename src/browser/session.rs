//! Conversions between CDP storage types and the persisted session snapshot

use chromiumoxide::cdp::browser_protocol::network::{
    Cookie, CookieParam, CookieSameSite, TimeSinceEpoch,
};
use tracing::debug;

use crate::session_store::{OriginStorage, StoredCookie};

/// Collects `{origin, localStorage}` for the current document
pub(crate) const LOCAL_STORAGE_SNAPSHOT_SCRIPT: &str = r#"(() => {
  const entries = [];
  try {
    for (let i = 0; i < localStorage.length; i++) {
      const name = localStorage.key(i);
      entries.push({ name, value: localStorage.getItem(name) ?? "" });
    }
  } catch (_) {}
  return { origin: location.origin, localStorage: entries };
})()"#;

pub fn stored_cookie(cookie: &Cookie) -> StoredCookie {
    StoredCookie {
        name: cookie.name.clone(),
        value: cookie.value.clone(),
        domain: cookie.domain.clone(),
        path: cookie.path.clone(),
        expires: cookie.expires,
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: cookie.same_site.as_ref().map(|s| s.as_ref().to_string()),
    }
}

/// Map stored cookies back to `Storage.setCookies` parameters.
///
/// Session cookies (non-positive expiry) are restored without an expiry.
/// Entries the protocol rejects are skipped.
pub fn cookie_params(cookies: &[StoredCookie]) -> Vec<CookieParam> {
    cookies
        .iter()
        .filter_map(|cookie| {
            let mut builder = CookieParam::builder()
                .name(cookie.name.clone())
                .value(cookie.value.clone())
                .domain(cookie.domain.clone())
                .path(cookie.path.clone())
                .secure(cookie.secure)
                .http_only(cookie.http_only);
            if cookie.expires > 0.0 {
                builder = builder.expires(TimeSinceEpoch::new(cookie.expires));
            }
            if let Some(same_site) = cookie
                .same_site
                .as_deref()
                .and_then(|s| s.parse::<CookieSameSite>().ok())
            {
                builder = builder.same_site(same_site);
            }
            match builder.build() {
                Ok(param) => Some(param),
                Err(e) => {
                    debug!(cookie = %cookie.name, error = %e, "Skipping unrestorable cookie");
                    None
                }
            }
        })
        .collect()
}

/// Script that writes saved localStorage entries when a matching origin loads.
pub fn local_storage_script(origins: &[OriginStorage]) -> Option<String> {
    let origins: Vec<&OriginStorage> = origins
        .iter()
        .filter(|o| !o.local_storage.is_empty())
        .collect();
    if origins.is_empty() {
        return None;
    }
    let payload = serde_json::to_string(&origins).ok()?;
    Some(format!(
        r#"(() => {{
  const saved = {payload};
  for (const entry of saved) {{
    if (entry.origin !== location.origin) continue;
    for (const item of entry.localStorage) {{
      try {{ localStorage.setItem(item.name, item.value); }} catch (_) {{}}
    }}
  }}
}})();"#
    ))
}

/// True when the snapshot belongs to a real web origin
pub(crate) fn is_web_origin(origin: &OriginStorage) -> bool {
    origin.origin.starts_with("http://") || origin.origin.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_store::StorageEntry;

    fn cookie(expires: f64, same_site: Option<&str>) -> StoredCookie {
        StoredCookie {
            name: "sid".into(),
            value: "abc".into(),
            domain: ".medium.com".into(),
            path: "/".into(),
            expires,
            http_only: true,
            secure: true,
            same_site: same_site.map(str::to_string),
        }
    }

    #[test]
    fn session_cookies_have_no_expiry() {
        let params = cookie_params(&[cookie(-1.0, None), cookie(1_900_000_000.0, Some("Lax"))]);
        assert_eq!(params.len(), 2);
        assert!(params[0].expires.is_none());
        assert!(params[1].expires.is_some());
        assert_eq!(params[1].same_site, Some(CookieSameSite::Lax));
        assert_eq!(params[1].domain.as_deref(), Some(".medium.com"));
    }

    #[test]
    fn unknown_same_site_is_dropped_not_fatal() {
        let params = cookie_params(&[cookie(-1.0, Some("Sideways"))]);
        assert_eq!(params.len(), 1);
        assert!(params[0].same_site.is_none());
    }

    #[test]
    fn storage_script_only_for_non_empty_origins() {
        let empty = OriginStorage {
            origin: "https://medium.com".into(),
            local_storage: vec![],
        };
        assert!(local_storage_script(std::slice::from_ref(&empty)).is_none());

        let filled = OriginStorage {
            origin: "https://medium.com".into(),
            local_storage: vec![StorageEntry {
                name: "theme".into(),
                value: "dark \"mode\"".into(),
            }],
        };
        let script = local_storage_script(&[empty, filled]).unwrap();
        assert!(script.contains(r#""origin":"https://medium.com""#));
        assert!(script.contains(r#"dark \"mode\""#));
        assert!(script.contains("localStorage.setItem"));
    }

    #[test]
    fn blank_documents_are_not_web_origins() {
        let blank = OriginStorage {
            origin: "null".into(),
            local_storage: vec![],
        };
        assert!(!is_web_origin(&blank));
    }
}
