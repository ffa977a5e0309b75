//! Browser infrastructure: process handle, per-request contexts and fingerprint

mod context;
pub mod fingerprint;
mod lifecycle;
mod session;
mod wrapper;

pub use context::{PageOptions, PageSession};
pub use lifecycle::{BrowserHandle, BrowserSlot, ChromeLauncher};
pub(crate) use session::{LOCAL_STORAGE_SNAPSHOT_SCRIPT, is_web_origin};
pub use session::{cookie_params, local_storage_script, stored_cookie};
pub use wrapper::{BrowserWrapper, launch_browser};
