//! SCSS front-end.
//!
//! Only doc-comments and the single construct after each one are of
//! interest: a `$name: value;` variable or an `@mixin name(params)` header.

use std::path::Path;
use std::sync::LazyLock;

use docket_core::ast::{CssMixin, Node};
use docket_core::{SourceDoc, SourceFile, SourceKind};
use regex::Regex;

use crate::line_index::LineIndex;

static VAR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\$[\w-]+)\s*:\s*([^;]*)").ok());

static MIXIN_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*@mixin\s+([\w-]+)\s*(?:\(([^{]*)\))?").ok());

/// Collect doc-comments from SCSS source.
pub fn parse_scss(path: &Path, source: &str) -> SourceFile {
    let lines = LineIndex::new(source);
    let mut docs = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find("/**") {
        let start = pos + found;
        let body_start = start + 3;
        let Some(len) = source[body_start..].find("*/") else {
            break;
        };
        let end = body_start + len;
        pos = end + 2;

        let code = following_code(&source[pos..]);
        docs.push(SourceDoc::new(
            &source[body_start..end],
            code,
            lines.line(start as u32),
        ));
    }

    tracing::debug!(path = %path.display(), docs = docs.len(), "parsed scss");
    SourceFile {
        filename: path.to_string_lossy().into_owned(),
        kind: SourceKind::Scss,
        docs,
    }
}

fn following_code(rest: &str) -> Option<Node> {
    if let Some(caps) = VAR_RE.as_ref()?.captures(rest) {
        return Some(Node::CssVar {
            name: caps[1].to_string(),
            value: caps[2].trim().to_string(),
        });
    }

    let caps = MIXIN_RE.as_ref()?.captures(rest)?;
    let params = caps
        .get(2)
        .map(|m| split_params(m.as_str()))
        .unwrap_or_default()
        .into_iter()
        .filter(|param| !param.is_empty())
        .map(|param| match param.split_once(':') {
            Some((name, default)) => (name.trim().to_string(), Some(default.trim().to_string())),
            None => (param.to_string(), None),
        })
        .collect();
    Some(Node::CssMixin(Box::new(CssMixin {
        name: caps[1].to_string(),
        params,
    })))
}

/// Split on top-level commas, keeping `rgba(0, 0, 0, .5)` in one piece.
fn split_params(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}
