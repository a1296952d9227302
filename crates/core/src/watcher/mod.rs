//! Input-directory watching and stable-file detection.
//!
//! New files in the input directory become ingest candidates on create or
//! modify events; a candidate is declared stable once its size stops
//! changing between polls, and is then submitted to the session lane. The
//! filename filter is injected so it can be swapped or mocked in tests.

mod config;
mod dir_watcher;
mod error;
mod traits;

pub use config::WatcherConfig;
pub use dir_watcher::DirWatcher;
pub use error::WatcherError;
pub use traits::{ClipFilter, RegexFilter};
