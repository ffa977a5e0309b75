//! Configuration: on-disk locations, browser tuning, settings and the domain allowlist

pub mod domains;
pub mod settings;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the per-user base directory (defaults to `~/.medium-mcp`)
pub const HOME_ENV: &str = "MEDIUM_MCP_HOME";

const DIR_NAME: &str = ".medium-mcp";
const BROWSER_CONFIG_FILE: &str = "browser.yaml";

/// Per-user directory holding settings, session state and browser config
pub fn base_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DIR_NAME)
}

/// Create `dir` (and parents) and restrict it to the owning user.
pub fn ensure_private_dir(dir: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
        fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Write `bytes` to `path` as an owner-only (0600) file, creating the parent
/// directory as owner-only (0700).
pub fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_private_dir(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.flush()?;

    // mode() only applies on creation; tighten files that already existed
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Browser launch and extraction tuning, read from `browser.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode for extraction
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default)]
    pub disable_security: bool,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Wait bounds in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Listing/search page navigation
    #[serde(default = "default_navigation_ms")]
    pub navigation_ms: u64,

    /// Article page navigation (heavier pages, paywall redirects)
    #[serde(default = "default_article_navigation_ms")]
    pub article_navigation_ms: u64,

    /// Content marker wait on listing/search pages
    #[serde(default = "default_selector_ms")]
    pub selector_ms: u64,

    /// Content marker wait on article pages
    #[serde(default = "default_article_selector_ms")]
    pub article_selector_ms: u64,

    /// Sign-in page navigation in the visible browser
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Scroll-to-bottom steps on an author page
    #[serde(default = "default_scroll_count")]
    pub count: u32,

    #[serde(default = "default_scroll_delay_ms")]
    pub delay_ms: u64,
}

/// "Show more" pagination on the search page.
///
/// The click ceiling is `min(ceil(target / clicks_per_page) + click_slack, max_clicks)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_clicks_per_page")]
    pub clicks_per_page: usize,

    #[serde(default = "default_click_slack")]
    pub click_slack: usize,

    #[serde(default = "default_max_clicks")]
    pub max_clicks: usize,
}

fn default_headless() -> bool {
    true
}
fn default_window_width() -> u32 {
    1920
}
fn default_window_height() -> u32 {
    1080
}
fn default_navigation_ms() -> u64 {
    15_000
}
fn default_article_navigation_ms() -> u64 {
    30_000
}
fn default_selector_ms() -> u64 {
    5_000
}
fn default_article_selector_ms() -> u64 {
    10_000
}
fn default_login_ms() -> u64 {
    60_000
}
fn default_scroll_count() -> u32 {
    3
}
fn default_scroll_delay_ms() -> u64 {
    1_500
}
fn default_settle_ms() -> u64 {
    2_000
}
fn default_clicks_per_page() -> usize {
    10
}
fn default_click_slack() -> usize {
    2
}
fn default_max_clicks() -> usize {
    20
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: false,
            window: WindowConfig::default(),
            timeouts: TimeoutConfig::default(),
            scroll: ScrollConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation_ms: default_navigation_ms(),
            article_navigation_ms: default_article_navigation_ms(),
            selector_ms: default_selector_ms(),
            article_selector_ms: default_article_selector_ms(),
            login_ms: default_login_ms(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            count: default_scroll_count(),
            delay_ms: default_scroll_delay_ms(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            clicks_per_page: default_clicks_per_page(),
            click_slack: default_click_slack(),
            max_clicks: default_max_clicks(),
        }
    }
}

impl TimeoutConfig {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
    pub fn article_navigation(&self) -> Duration {
        Duration::from_millis(self.article_navigation_ms)
    }
    pub fn selector(&self) -> Duration {
        Duration::from_millis(self.selector_ms)
    }
    pub fn article_selector(&self) -> Duration {
        Duration::from_millis(self.article_selector_ms)
    }
    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }
}

impl ScrollConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl SearchConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Upper bound on "Show more" clicks needed to reach `target` results
    pub fn max_clicks_for(&self, target: usize) -> usize {
        let per_page = self.clicks_per_page.max(1);
        (target.div_ceil(per_page) + self.click_slack).min(self.max_clicks)
    }
}

impl BrowserConfig {
    pub fn path() -> PathBuf {
        base_dir().join(BROWSER_CONFIG_FILE)
    }

    /// Load `browser.yaml`, falling back to defaults when absent or malformed.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| serde_yaml::from_str(&contents).map_err(anyhow::Error::from))
        {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load browser config, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_ceiling_follows_target_size() {
        let search = SearchConfig::default();
        assert_eq!(search.max_clicks_for(5), 3);
        assert_eq!(search.max_clicks_for(10), 3);
        assert_eq!(search.max_clicks_for(20), 4);
        assert_eq!(search.max_clicks_for(500), 20);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser.yaml");
        fs::write(&path, "headless: false\ntimeouts:\n  selector_ms: 750\n").unwrap();

        let config = BrowserConfig::load_from(&path);
        assert!(!config.headless);
        assert_eq!(config.timeouts.selector_ms, 750);
        assert_eq!(config.timeouts.navigation_ms, 15_000);
        assert_eq!(config.window.width, 1920);
    }

    #[test]
    fn malformed_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser.yaml");
        fs::write(&path, "headless: [not a bool").unwrap();
        assert!(BrowserConfig::load_from(&path).headless);
    }

    #[cfg(unix)]
    #[test]
    fn private_write_restricts_modes() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state");
        let file = nested.join("blob.json");
        write_private(&file, b"{}").unwrap();

        let file_mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(&nested).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }
}
