//! Owned browser process plus its CDP event loop

use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::BrowserConfig;
use crate::error::{MediumError, MediumResult};

/// Wrapper for Browser and its event handler task
///
/// The handler MUST be aborted once the browser is gone, otherwise it keeps
/// polling a dead websocket. `Drop` takes care of that; the profile directory
/// is only removed by [`BrowserWrapper::cleanup_temp_dir`] after `wait()`.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    headless: bool,
    generation: u64,
}

impl BrowserWrapper {
    pub(crate) fn new(
        browser: Browser,
        handler: JoinHandle<()>,
        user_data_dir: PathBuf,
        headless: bool,
        generation: u64,
    ) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            headless,
            generation,
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    /// Launch counter; contexts created on an older generation are already gone
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Close the process, wait for it to exit, then remove the profile.
    ///
    /// Every step is best effort: the process may already be dead.
    pub(crate) async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Failed to wait for browser exit");
        }
        self.cleanup_temp_dir();
    }

    /// Remove the profile directory.
    ///
    /// Must run after `browser.wait()` so Chrome has released its file handles.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!(path = %path.display(), "Cleaning up browser profile");
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(path = %path.display(), error = %e, "Failed to remove browser profile");
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(path) = &self.user_data_dir {
            warn!(
                path = %path.display(),
                "BrowserWrapper dropped without shutdown; profile directory left behind"
            );
        }
    }
}

/// Launch a browser in the requested mode with a per-process profile directory.
pub async fn launch_browser(
    config: &BrowserConfig,
    headless: bool,
    generation: u64,
) -> MediumResult<BrowserWrapper> {
    let mode = if headless { "headless" } else { "headful" };
    let user_data_dir = std::env::temp_dir().join(format!(
        "medium_mcp_{mode}_{}_{generation}",
        std::process::id()
    ));

    let (browser, handler) = crate::browser_setup::launch_browser(headless, user_data_dir.clone(), config)
        .await
        .map_err(|e| MediumError::browser_launch("Chrome/Chromium could not be started").with_source(e))?;

    info!(headless, generation, "Browser launched");
    Ok(BrowserWrapper::new(browser, handler, user_data_dir, headless, generation))
}
