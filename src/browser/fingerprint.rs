//! Desktop-Chrome fingerprint applied to every browsing context
//!
//! The same identity is used for extraction and for the interactive login
//! window so that a saved session is replayed under the headers it was
//! created with.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::browser::{GrantPermissionsParams, PermissionType};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetLocaleOverrideParams, SetTimezoneOverrideParams,
    SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::browser::Browser;
use serde_json::json;

use crate::config::WindowConfig;
use crate::utils::constants::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CHROME_USER_AGENT, DEVICE_SCALE_FACTOR, LOCALE,
    NAVIGATOR_PLATFORM, SEC_CH_UA, SEC_CH_UA_PLATFORM, TIMEZONE,
};

/// Headers sent with every request of a fingerprinted page
pub fn extra_headers() -> serde_json::Value {
    json!({
        "Accept-Language": ACCEPT_LANGUAGE,
        "Accept-Encoding": ACCEPT_ENCODING,
        "Accept": ACCEPT,
        "sec-ch-ua": SEC_CH_UA,
        "sec-ch-ua-mobile": "?0",
        "sec-ch-ua-platform": SEC_CH_UA_PLATFORM,
        "Sec-Fetch-Dest": "document",
        "Sec-Fetch-Mode": "navigate",
        "Sec-Fetch-Site": "none",
        "Sec-Fetch-User": "?1",
        "Upgrade-Insecure-Requests": "1",
    })
}

/// Grant geolocation to the whole context.
pub async fn grant_permissions(browser: &Browser, context_id: &BrowserContextId) -> chromiumoxide::error::Result<()> {
    let mut params = GrantPermissionsParams::new(vec![PermissionType::Geolocation]);
    params.browser_context_id = Some(context_id.clone());
    browser.execute(params).await?;
    Ok(())
}

/// Apply user agent, headers, viewport, locale and timezone to a blank page.
///
/// Must run before the first navigation.
pub async fn apply(page: &Page, window: &WindowConfig) -> chromiumoxide::error::Result<()> {
    let mut user_agent = SetUserAgentOverrideParams::new(CHROME_USER_AGENT);
    user_agent.accept_language = Some(ACCEPT_LANGUAGE.to_string());
    user_agent.platform = Some(NAVIGATOR_PLATFORM.to_string());
    page.execute(user_agent).await?;

    page.execute(SetExtraHttpHeadersParams::new(Headers::new(extra_headers())))
        .await?;

    page.execute(SetDeviceMetricsOverrideParams::new(
        i64::from(window.width),
        i64::from(window.height),
        DEVICE_SCALE_FACTOR,
        false,
    ))
    .await?;

    page.execute(SetLocaleOverrideParams {
        locale: Some(LOCALE.to_string()),
    })
    .await?;

    page.execute(SetTimezoneOverrideParams::new(TIMEZONE)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_hints_match_user_agent_version() {
        let headers = extra_headers();
        let hints = headers["sec-ch-ua"].as_str().unwrap();
        assert!(hints.contains("v=\"131\""));
        assert!(CHROME_USER_AGENT.contains("Chrome/131."));
        assert_eq!(headers["Accept-Language"], ACCEPT_LANGUAGE);
    }
}
