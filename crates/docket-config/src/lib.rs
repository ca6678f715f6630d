//! Configuration for the docket documentation engine.
//!
//! Settings come from built-in defaults, a `docket.toml` file and
//! `DOCKET_`-prefixed environment variables, in increasing priority.
//! Library users can also build a [`DocketConfig`] from a JSON value.

pub mod config;
pub mod discovery;
pub mod error;

pub use config::{DocketConfig, LogLevel};
pub use discovery::{CONFIG_FILE, ConfigDiscovery, discover};
pub use error::{ConfigError, Result};
