//! Per-request browsing context
//!
//! Every extraction runs in its own isolated context that is disposed as soon
//! as the work is done, whether it succeeded or not.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{MediumError, MediumResult};
use crate::manager::BrowserManager;
use crate::utils::constants::CONTENT_MARKER;
use crate::utils::wait_for_element;

/// How a page should be acquired
#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    /// Load the saved login session into the context
    pub use_session: bool,
    pub navigation_timeout: Duration,
    /// Bound on waiting for the content marker; a miss is not fatal
    pub selector_timeout: Duration,
}

impl PageOptions {
    pub fn article(manager: &BrowserManager) -> Self {
        let timeouts = &manager.config().timeouts;
        Self {
            use_session: true,
            navigation_timeout: timeouts.article_navigation(),
            selector_timeout: timeouts.article_selector(),
        }
    }

    pub fn listing(manager: &BrowserManager) -> Self {
        let timeouts = &manager.config().timeouts;
        Self {
            use_session: false,
            navigation_timeout: timeouts.navigation(),
            selector_timeout: timeouts.selector(),
        }
    }
}

pub struct PageSession {
    manager: Arc<BrowserManager>,
    context_id: Option<BrowserContextId>,
    generation: u64,
    page: Page,
}

impl PageSession {
    /// Open a fresh context, navigate to `url` and wait for rendered content.
    pub async fn open(manager: Arc<BrowserManager>, url: &str, options: PageOptions) -> MediumResult<Self> {
        let session = if options.use_session {
            match manager.session_store().load() {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable saved session");
                    None
                }
            }
        } else {
            None
        };

        let headless = manager.config().headless;
        let opened = manager.open_context(headless, url, session.as_ref()).await?;
        let page_session = Self {
            manager,
            context_id: Some(opened.context_id),
            generation: opened.generation,
            page: opened.page,
        };

        if let Err(e) = page_session.navigate(url, options).await {
            page_session.close().await;
            return Err(e);
        }
        Ok(page_session)
    }

    async fn navigate(&self, url: &str, options: PageOptions) -> MediumResult<()> {
        match tokio::time::timeout(options.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(MediumError::article(url, "Navigation failed").with_source(e.to_string()));
            }
            Err(_) => {
                return Err(MediumError::article(
                    url,
                    format!("Navigation timed out after {}s", options.navigation_timeout.as_secs()),
                ));
            }
        }

        if wait_for_element(&self.page, CONTENT_MARKER, options.selector_timeout)
            .await
            .is_none()
        {
            warn!(%url, marker = CONTENT_MARKER, "Content marker not found, continuing");
        }
        Ok(())
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the page and dispose the context.
    pub async fn close(mut self) {
        let Some(context_id) = self.context_id.take() else {
            return;
        };
        if let Err(e) = self.page.clone().close().await {
            debug!(error = %e, "Page close failed, disposing context anyway");
        }
        self.manager.dispose_context(context_id, self.generation).await;
    }

    /// Open a page, run `work` on it and always close it afterwards.
    pub async fn scoped<T, F, Fut>(
        manager: Arc<BrowserManager>,
        url: &str,
        options: PageOptions,
        work: F,
    ) -> MediumResult<T>
    where
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = MediumResult<T>>,
    {
        let session = Self::open(manager, url, options).await?;
        let result = work(session.page.clone()).await;
        session.close().await;
        result
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        let Some(context_id) = self.context_id.take() else {
            return;
        };
        // close() was never reached (cancelled request); dispose in the background
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let manager = self.manager.clone();
                let generation = self.generation;
                handle.spawn(async move {
                    manager.dispose_context(context_id, generation).await;
                });
            }
            Err(_) => warn!("No runtime to dispose abandoned browser context"),
        }
    }
}
