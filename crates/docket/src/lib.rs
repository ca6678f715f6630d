#![deny(clippy::all)]

//! Documentation aggregation for JSDuck-style doc-comments.
//!
//! `docket` reads JavaScript and SCSS sources, parses them in parallel and
//! aggregates every doc-comment into a registry of classes and members.
//!
//! ```no_run
//! use docket::{DocketConfig, document};
//!
//! let config = DocketConfig {
//!     inputs: vec!["src".into()],
//!     ..DocketConfig::default()
//! };
//! let docs = document(&config)?;
//! for class in docs.relations.iter() {
//!     println!("{}", class.name());
//! }
//! # Ok::<(), docket::Error>(())
//! ```

pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod pipeline;

pub use docket_config::{ConfigDiscovery, DocketConfig, LogLevel, discover};
pub use docket_core::{
    ClassView, MemberQuery, MemberRef, Relations, TagName, Warning, WarningKind, Warnings,
};
pub use error::{Error, Result};
pub use pipeline::{Documentation, collect_inputs, document, document_sources};
