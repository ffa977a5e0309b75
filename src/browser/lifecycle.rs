//! Single-browser lifecycle
//!
//! [`BrowserSlot`] holds at most one browser handle. It launches lazily,
//! reuses a handle that is alive and in the requested mode, and otherwise
//! tears the old one down before launching again. Launching goes through
//! [`BrowserLauncher`] so the policy does not depend on a real Chrome.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::DisposeBrowserContextParams;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::wrapper::{BrowserWrapper, launch_browser};
use crate::config::BrowserConfig;
use crate::error::MediumResult;

#[async_trait]
pub trait BrowserHandle: Send + Sync + 'static {
    fn headless(&self) -> bool;

    fn generation(&self) -> u64;

    /// Health check run before every reuse
    async fn is_alive(&self) -> bool;

    /// Dispose a context that would otherwise outlive the handle. Never fails.
    async fn dispose_context(&self, context_id: BrowserContextId);

    /// Close the browser and release its resources. Never fails.
    async fn shutdown(self);
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync + 'static {
    type Handle: BrowserHandle;

    async fn launch(&self, headless: bool, generation: u64) -> MediumResult<Self::Handle>;
}

/// Launches local Chrome/Chromium with the configured window and flags
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    type Handle = BrowserWrapper;

    async fn launch(&self, headless: bool, generation: u64) -> MediumResult<BrowserWrapper> {
        launch_browser(&self.config, headless, generation).await
    }
}

#[async_trait]
impl BrowserHandle for BrowserWrapper {
    fn headless(&self) -> bool {
        BrowserWrapper::headless(self)
    }

    fn generation(&self) -> u64 {
        BrowserWrapper::generation(self)
    }

    async fn is_alive(&self) -> bool {
        match self.browser().version().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Browser health check failed");
                false
            }
        }
    }

    async fn dispose_context(&self, context_id: BrowserContextId) {
        if let Err(e) = self
            .browser()
            .execute(DisposeBrowserContextParams::new(context_id))
            .await
        {
            warn!(error = %e, "Failed to dispose browser context");
        }
    }

    async fn shutdown(self) {
        BrowserWrapper::shutdown(self).await;
    }
}

pub struct BrowserSlot<L: BrowserLauncher> {
    launcher: L,
    handle: Arc<Mutex<Option<L::Handle>>>,
    generation: AtomicU64,
}

impl<L: BrowserLauncher> BrowserSlot<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            handle: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Shared handle; lock it to use or replace the browser.
    pub fn handle(&self) -> &Arc<Mutex<Option<L::Handle>>> {
        &self.handle
    }

    /// Make sure a live `headless`-mode browser is in the slot and return it.
    ///
    /// `pinned` yields a context to dispose before an old handle is shut down;
    /// it is only awaited when a teardown actually happens.
    pub async fn acquire(
        &self,
        headless: bool,
        pinned: impl Future<Output = Option<BrowserContextId>> + Send,
    ) -> MediumResult<Arc<Mutex<Option<L::Handle>>>> {
        let mut guard = self.handle.lock().await;
        self.ensure(&mut guard, headless, pinned).await?;
        drop(guard);
        Ok(self.handle.clone())
    }

    async fn ensure(
        &self,
        guard: &mut Option<L::Handle>,
        headless: bool,
        pinned: impl Future<Output = Option<BrowserContextId>> + Send,
    ) -> MediumResult<()> {
        if let Some(handle) = guard.as_ref() {
            let alive = handle.is_alive().await;
            if alive && handle.headless() == headless {
                debug!(headless, generation = handle.generation(), "Reusing existing browser");
                return Ok(());
            }
            if alive {
                info!(
                    from_headless = handle.headless(),
                    to_headless = headless,
                    "Browser mode change, relaunching"
                );
            } else {
                info!("Browser is gone, relaunching");
            }
            self.teardown(guard, pinned.await).await;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        *guard = Some(self.launcher.launch(headless, generation).await?);
        Ok(())
    }

    /// Empty the slot, disposing `pinned` first. No-op when already empty.
    pub async fn teardown(&self, guard: &mut Option<L::Handle>, pinned: Option<BrowserContextId>) {
        let Some(handle) = guard.take() else {
            return;
        };
        if let Some(context_id) = pinned {
            handle.dispose_context(context_id).await;
        }
        info!(generation = handle.generation(), "Shutting down browser");
        handle.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediumError;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    type Events = Arc<parking_lot::Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct FakeHandle {
        headless: bool,
        generation: u64,
        alive: Arc<AtomicBool>,
        events: Events,
    }

    #[async_trait]
    impl BrowserHandle for FakeHandle {
        fn headless(&self) -> bool {
            self.headless
        }

        fn generation(&self) -> u64 {
            self.generation
        }

        async fn is_alive(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }

        async fn dispose_context(&self, context_id: BrowserContextId) {
            self.events.lock().push(format!("dispose {}", context_id.inner()));
        }

        async fn shutdown(self) {
            self.events.lock().push(format!("shutdown {}", self.generation));
        }
    }

    #[derive(Default)]
    struct FakeLauncher {
        launches: AtomicUsize,
        fail: AtomicBool,
        alive: Arc<AtomicBool>,
        events: Events,
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        type Handle = FakeHandle;

        async fn launch(&self, headless: bool, generation: u64) -> MediumResult<FakeHandle> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(MediumError::browser_launch("no chrome here"));
            }
            self.launches.fetch_add(1, Ordering::SeqCst);
            self.alive.store(true, Ordering::SeqCst);
            self.events.lock().push(format!("launch {generation}"));
            Ok(FakeHandle {
                headless,
                generation,
                alive: self.alive.clone(),
                events: self.events.clone(),
            })
        }
    }

    fn slot() -> BrowserSlot<FakeLauncher> {
        BrowserSlot::new(FakeLauncher::default())
    }

    async fn current(slot: &BrowserSlot<FakeLauncher>) -> Option<(bool, u64)> {
        slot.handle()
            .lock()
            .await
            .as_ref()
            .map(|h| (h.headless, h.generation))
    }

    #[tokio::test]
    async fn same_mode_reuses_the_handle() {
        let slot = slot();
        slot.acquire(true, async { None }).await.unwrap();
        slot.acquire(true, async { None }).await.unwrap();

        assert_eq!(slot.launcher.launches.load(Ordering::SeqCst), 1);
        assert_eq!(current(&slot).await, Some((true, 1)));
        assert_eq!(*slot.launcher.events.lock(), vec!["launch 1"]);
    }

    #[tokio::test]
    async fn other_mode_tears_down_then_relaunches() {
        let slot = slot();
        slot.acquire(true, async { None }).await.unwrap();
        slot.acquire(false, async { Some(BrowserContextId::new("login-ctx")) })
            .await
            .unwrap();

        assert_eq!(current(&slot).await, Some((false, 2)));
        assert_eq!(
            *slot.launcher.events.lock(),
            vec!["launch 1", "dispose login-ctx", "shutdown 1", "launch 2"]
        );
    }

    #[tokio::test]
    async fn dead_handle_is_replaced_in_the_same_mode() {
        let slot = slot();
        slot.acquire(true, async { None }).await.unwrap();
        slot.launcher.alive.store(false, Ordering::SeqCst);

        slot.acquire(true, async { None }).await.unwrap();
        assert_eq!(slot.launcher.launches.load(Ordering::SeqCst), 2);
        assert_eq!(current(&slot).await, Some((true, 2)));
    }

    #[tokio::test]
    async fn pinned_context_is_not_taken_on_reuse() {
        let slot = slot();
        let taken = AtomicBool::new(false);
        slot.acquire(true, async { None }).await.unwrap();
        slot.acquire(true, async {
            taken.store(true, Ordering::SeqCst);
            None
        })
        .await
        .unwrap();
        assert!(!taken.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failed_launch_leaves_the_slot_empty() {
        let slot = slot();
        slot.acquire(true, async { None }).await.unwrap();
        slot.launcher.fail.store(true, Ordering::SeqCst);

        let err = slot.acquire(false, async { None }).await.unwrap_err();
        assert!(matches!(err, MediumError::BrowserLaunch { .. }));
        assert_eq!(current(&slot).await, None);
    }

    #[tokio::test]
    async fn teardown_is_idempotent() {
        let slot = slot();
        slot.acquire(true, async { None }).await.unwrap();
        let mut guard = slot.handle().lock().await;
        slot.teardown(&mut guard, None).await;
        slot.teardown(&mut guard, None).await;
        assert!(guard.is_none());
        assert_eq!(*slot.launcher.events.lock(), vec!["launch 1", "shutdown 1"]);
    }
}
