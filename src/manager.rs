//! Browser instance manager shared by every tool
//!
//! At most one browser process runs at a time. It is launched lazily in the
//! mode the caller asks for (headless for extraction, headful for the
//! interactive login) and health-checked on every acquisition.
//!
//! # Locking
//!
//! The [`BrowserSlot`] handle is a `tokio::sync::Mutex` because every
//! operation on it awaits CDP round-trips. The lock serializes launch, context
//! creation and teardown only; navigation and extraction run on per-request
//! contexts without holding it. Lock order is always slot then `login`.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::cdp::browser_protocol::storage::{GetCookiesParams, SetCookiesParams};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::error::CdpError;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::browser::{self, BrowserHandle, BrowserSlot, BrowserWrapper, ChromeLauncher, fingerprint};
use crate::config::BrowserConfig;
use crate::error::{MediumError, MediumResult};
use crate::session_store::{OriginStorage, SessionState, SessionStore};
use crate::utils::constants::SIGN_IN_URL;
use crate::utils::eval_json;

static GLOBAL_MANAGER: OnceLock<Arc<BrowserManager>> = OnceLock::new();

/// Isolated context of the visible login window
struct LoginContext {
    context_id: BrowserContextId,
    page: Page,
}

/// A freshly created, fingerprinted browsing context with one blank page
pub(crate) struct OpenedContext {
    pub context_id: BrowserContextId,
    pub page: Page,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub logged_in: bool,
    pub storage_path: String,
    pub message: String,
}

pub struct BrowserManager {
    slot: BrowserSlot<ChromeLauncher>,
    login: Mutex<Option<LoginContext>>,
    store: SessionStore,
    config: BrowserConfig,
}

impl BrowserManager {
    /// Process-wide manager using `browser.yaml` and the default session file
    #[must_use]
    pub fn global() -> Arc<BrowserManager> {
        GLOBAL_MANAGER
            .get_or_init(|| Arc::new(BrowserManager::new(BrowserConfig::load(), SessionStore::default())))
            .clone()
    }

    pub fn new(config: BrowserConfig, store: SessionStore) -> Self {
        Self {
            slot: BrowserSlot::new(ChromeLauncher::new(config.clone())),
            login: Mutex::new(None),
            store,
            config,
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    /// Return the live browser, launching or relaunching it in `headless` mode.
    ///
    /// A handle that fails its health check, or runs in the other mode, is
    /// torn down first (including any login context).
    pub async fn acquire(&self, headless: bool) -> MediumResult<Arc<Mutex<Option<BrowserWrapper>>>> {
        self.slot.acquire(headless, self.take_login_context()).await
    }

    async fn take_login_context(&self) -> Option<BrowserContextId> {
        self.login.lock().await.take().map(|login| login.context_id)
    }

    /// Dispose the login context and shut the browser down. Never fails.
    async fn teardown(&self, guard: &mut Option<BrowserWrapper>) {
        let login = self.take_login_context().await;
        self.slot.teardown(guard, login).await;
    }

    /// Shut the browser down if one is running. Idempotent.
    pub async fn release(&self) {
        let mut guard = self.slot.handle().lock().await;
        self.teardown(&mut guard).await;
    }

    /// Teardown entry point for signal handlers
    pub async fn shutdown(&self) {
        self.release().await;
    }

    pub async fn is_browser_running(&self) -> bool {
        self.slot.handle().lock().await.is_some()
    }

    /// Create an isolated, fingerprinted context with one blank page.
    ///
    /// When `session` is given its cookies are loaded into the context and its
    /// localStorage is restored on matching origins. Failures are reported as
    /// article extraction errors for `url`; listing callers re-target them.
    pub(crate) async fn open_context(
        &self,
        headless: bool,
        url: &str,
        session: Option<&SessionState>,
    ) -> MediumResult<OpenedContext> {
        let browser = self.acquire(headless).await?;
        let guard = browser.lock().await;
        let wrapper = guard
            .as_ref()
            .filter(|wrapper| wrapper.headless() == headless)
            .ok_or_else(|| MediumError::browser_launch("Browser was shut down or replaced during setup"))?;
        let chrome = wrapper.browser();
        let fail = |reason: &'static str| move |e: CdpError| MediumError::article(url, reason).with_source(e.to_string());

        let context_id = chrome
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(fail("Failed to create browser context"))?
            .result
            .browser_context_id;

        let prepared = async {
            if let Err(e) = fingerprint::grant_permissions(chrome, &context_id).await {
                warn!(error = %e, "Failed to grant context permissions");
            }

            if let Some(state) = session {
                let cookies = browser::cookie_params(&state.cookies);
                if !cookies.is_empty() {
                    let count = cookies.len();
                    let mut params = SetCookiesParams::new(cookies);
                    params.browser_context_id = Some(context_id.clone());
                    chrome
                        .execute(params)
                        .await
                        .map_err(fail("Failed to restore saved session"))?;
                    debug!(count, "Saved cookies loaded into context");
                }
            }

            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context_id.clone())
                .build()
                .map_err(|e| MediumError::article(url, "Failed to create page").with_source(e))?;
            let page = chrome.new_page(target).await.map_err(fail("Failed to create page"))?;

            fingerprint::apply(&page, &self.config.window)
                .await
                .map_err(fail("Failed to apply browser fingerprint"))?;

            if let Some(script) = session.and_then(|s| browser::local_storage_script(&s.origins)) {
                page.execute(AddScriptToEvaluateOnNewDocumentParams::new(script))
                    .await
                    .map_err(fail("Failed to restore saved session"))?;
            }
            Ok::<_, MediumError>(page)
        }
        .await;

        match prepared {
            Ok(page) => Ok(OpenedContext {
                context_id,
                page,
                generation: wrapper.generation(),
            }),
            Err(e) => {
                if let Err(dispose) = chrome.execute(DisposeBrowserContextParams::new(context_id)).await {
                    warn!(error = %dispose, "Failed to dispose context after setup failure");
                }
                Err(e)
            }
        }
    }

    /// Dispose `context_id` if the browser that created it is still running.
    pub(crate) async fn dispose_context(&self, context_id: BrowserContextId, generation: u64) {
        let guard = self.slot.handle().lock().await;
        match guard.as_ref() {
            Some(wrapper) if wrapper.generation() == generation => wrapper.dispose_context(context_id).await,
            _ => debug!(generation, "Browser already replaced, context is gone"),
        }
    }

    /// Relaunch headful and open the Medium sign-in page in a fresh context.
    pub async fn open_interactive_login(&self) -> MediumResult<String> {
        self.release().await;

        let opened = self.open_context(false, SIGN_IN_URL, None).await.map_err(login_error)?;
        let navigation = tokio::time::timeout(self.config.timeouts.login(), opened.page.goto(SIGN_IN_URL)).await;
        let failure = match navigation {
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(MediumError::browser_launch("Failed to open the Medium sign-in page").with_source(e.to_string())),
            Err(_) => Some(MediumError::browser_launch(format!(
                "Timed out after {}s opening the Medium sign-in page",
                self.config.timeouts.login().as_secs()
            ))),
        };
        if let Some(err) = failure {
            self.release().await;
            return Err(err);
        }

        *self.login.lock().await = Some(LoginContext {
            context_id: opened.context_id,
            page: opened.page,
        });
        info!("Interactive login window opened");
        Ok("Browser opened for login. Please complete the login process in the browser window, \
            then use 'save_login' tool to save your session."
            .to_string())
    }

    /// Snapshot the login context's cookies and localStorage, then release.
    pub async fn persist_login_state(&self) -> MediumResult<String> {
        let mut guard = self.slot.handle().lock().await;
        let Some(wrapper) = guard.as_ref() else {
            return Err(MediumError::NoActiveSession);
        };
        if !wrapper.is_alive().await {
            warn!("Login browser is no longer running");
            self.teardown(&mut guard).await;
            return Err(MediumError::NoActiveSession);
        }

        let state = {
            let login = self.login.lock().await;
            let Some(login) = login.as_ref() else {
                return Err(MediumError::NoActiveSession);
            };
            snapshot(wrapper, login).await?
        };

        self.store.save(&state)?;
        self.teardown(&mut guard).await;

        Ok(format!(
            "Login state saved to {}. You can now use 'read_article' to access member-only content.",
            self.store.path().display()
        ))
    }

    pub fn clear_login_state(&self) -> MediumResult<String> {
        if self.store.clear()? {
            Ok("Login state cleared successfully.".to_string())
        } else {
            Ok("No login state found.".to_string())
        }
    }

    pub fn login_status(&self) -> LoginStatus {
        let logged_in = self.store.exists();
        LoginStatus {
            logged_in,
            storage_path: self.store.path().display().to_string(),
            message: if logged_in {
                "You are logged in. Member-only content should be accessible.".to_string()
            } else {
                "You are not logged in. Use 'login' to access member-only content.".to_string()
            },
        }
    }
}

async fn snapshot(wrapper: &BrowserWrapper, login: &LoginContext) -> MediumResult<SessionState> {
    let session_error = |e: CdpError| MediumError::browser_launch("Failed to read the login session").with_source(e.to_string());

    let cookies = wrapper
        .browser()
        .execute(GetCookiesParams {
            browser_context_id: Some(login.context_id.clone()),
        })
        .await
        .map_err(session_error)?
        .result
        .cookies
        .iter()
        .map(browser::stored_cookie)
        .collect();

    let origins = match eval_json::<OriginStorage>(&login.page, browser::LOCAL_STORAGE_SNAPSHOT_SCRIPT).await {
        Ok(origin) if browser::is_web_origin(&origin) => vec![origin],
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read localStorage, saving cookies only");
            Vec::new()
        }
    };

    Ok(SessionState { cookies, origins })
}

/// Login setup failures are not about an article
fn login_error(err: MediumError) -> MediumError {
    err.retarget(MediumError::browser_launch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(dir: &tempfile::TempDir) -> BrowserManager {
        BrowserManager::new(BrowserConfig::default(), SessionStore::new(dir.path().join("auth.json")))
    }

    #[tokio::test]
    async fn save_without_login_is_no_active_session() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir);
        assert!(matches!(
            manager.persist_login_state().await,
            Err(MediumError::NoActiveSession)
        ));
        assert!(!manager.session_store().exists());
    }

    #[tokio::test]
    async fn release_without_browser_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir);
        manager.release().await;
        manager.release().await;
        assert!(!manager.is_browser_running().await);
    }

    #[test]
    fn status_tracks_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir);
        let status = manager.login_status();
        assert!(!status.logged_in);
        assert!(status.message.contains("'login'"));

        manager.session_store().save(&SessionState::default()).unwrap();
        let status = manager.login_status();
        assert!(status.logged_in);
        assert_eq!(status.storage_path, dir.path().join("auth.json").display().to_string());

        assert_eq!(manager.clear_login_state().unwrap(), "Login state cleared successfully.");
        assert_eq!(manager.clear_login_state().unwrap(), "No login state found.");
        assert!(!manager.login_status().logged_in);
    }
}
