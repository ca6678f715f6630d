#![deny(clippy::all)]
// docket-js owns all source file reads
#![allow(clippy::disallowed_methods)]

//! Source front-ends for the docket documentation engine.
//!
//! JavaScript is parsed with OXC, SCSS is scanned for doc-comments. Both
//! produce a [`SourceFile`] ready for [`docket_core::extract_entries`].

pub mod error;
mod js;
mod line_index;
mod scss;

use std::path::Path;

use docket_core::SourceFile;

pub use error::{Result, SourceError};
pub use js::parse_js;
pub use scss::parse_scss;

/// Parse already loaded source text, picking the front-end by extension.
pub fn parse_source(path: &Path, source: &str) -> Result<SourceFile> {
    if is_scss(path) {
        Ok(parse_scss(path, source))
    } else {
        parse_js(path, source)
    }
}

/// Read and parse a source file.
pub fn load(path: &Path) -> Result<SourceFile> {
    let source = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(path, &source)
}

fn is_scss(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("scss"))
}
