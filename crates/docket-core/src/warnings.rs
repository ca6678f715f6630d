//! Warning collection.
//!
//! Problems found in documentation never abort aggregation. They are pushed
//! into a [`Warnings`] collector, emitted as `tracing` events, and reported to
//! the caller once the run has finished.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::model::FileRef;

/// Category of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Unknown `@tag` in a doc-comment.
    Tag,
    /// Malformed type expression.
    TypeSyntax,
    /// Type expression naming an unknown class.
    TypeName,
    /// `@inheritdoc` pointing at nothing.
    Inheritdoc,
    /// Override targeting a missing class.
    Override,
    /// `extends` naming a class outside the registry.
    Extend,
    /// Mixin naming a class outside the registry.
    Mixin,
    /// Subproperty without a parent, or other member shape problem.
    Member,
    /// Enum without usable members.
    Enum,
    /// Alternate class name clashing with another class.
    AltName,
    /// Member placed into the synthetic `global` class.
    Global,
    /// Public class or member without documentation.
    Nodoc,
    /// Entity without a name.
    NameMissing,
}

impl WarningKind {
    /// Every warning kind, in declaration order.
    pub const ALL: [WarningKind; 13] = [
        WarningKind::Tag,
        WarningKind::TypeSyntax,
        WarningKind::TypeName,
        WarningKind::Inheritdoc,
        WarningKind::Override,
        WarningKind::Extend,
        WarningKind::Mixin,
        WarningKind::Member,
        WarningKind::Enum,
        WarningKind::AltName,
        WarningKind::Global,
        WarningKind::Nodoc,
        WarningKind::NameMissing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Tag => "tag",
            WarningKind::TypeSyntax => "type_syntax",
            WarningKind::TypeName => "type_name",
            WarningKind::Inheritdoc => "inheritdoc",
            WarningKind::Override => "override",
            WarningKind::Extend => "extend",
            WarningKind::Mixin => "mixin",
            WarningKind::Member => "member",
            WarningKind::Enum => "enum",
            WarningKind::AltName => "alt_name",
            WarningKind::Global => "global",
            WarningKind::Nodoc => "nodoc",
            WarningKind::NameMissing => "name_missing",
        }
    }

    /// Noisy kinds start out disabled.
    fn enabled_by_default(&self) -> bool {
        !matches!(
            self,
            WarningKind::Tag | WarningKind::Global | WarningKind::Nodoc
        )
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarningKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        WarningKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown warning kind: {}", s))
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(
                f,
                "[{}] {}:{}: {}",
                self.kind, file.filename, file.linenr, self.message
            ),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Enables or disables a warning kind, optionally only below a path.
///
/// Rules are written as `+kind`, `-kind`, `kind` (same as `+kind`) or
/// `kind:/some/path`. The kind `all` matches every kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRule {
    /// `None` matches every kind.
    pub kind: Option<WarningKind>,
    pub enabled: bool,
    pub path: Option<String>,
}

impl WarningRule {
    /// Parse a comma separated list of rules.
    pub fn parse_list(input: &str) -> Result<Vec<WarningRule>> {
        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(WarningRule::parse)
            .collect()
    }

    /// Parse a single rule.
    pub fn parse(input: &str) -> Result<WarningRule> {
        let text = input.trim();
        let (enabled, rest) = match text.as_bytes().first() {
            Some(b'+') => (true, &text[1..]),
            Some(b'-') => (false, &text[1..]),
            _ => (true, text),
        };

        let (name, path) = match rest.split_once(':') {
            Some((name, path)) => (name.trim(), Some(path.trim().to_string())),
            None => (rest.trim(), None),
        };

        let kind = if name == "all" {
            None
        } else {
            Some(
                name.parse::<WarningKind>()
                    .map_err(|reason| DocsError::InvalidWarningRule {
                        rule: input.to_string(),
                        reason,
                    })?,
            )
        };

        Ok(WarningRule {
            kind,
            enabled,
            path: path.filter(|p| !p.is_empty()),
        })
    }

    fn matches(&self, kind: WarningKind, filename: &str) -> bool {
        let kind_matches = self.kind.is_none_or(|k| k == kind);
        let path_matches = self
            .path
            .as_deref()
            .is_none_or(|path| filename.contains(path));
        kind_matches && path_matches
    }
}

/// Collector for warnings produced during a run.
#[derive(Debug, Clone, Default)]
pub struct Warnings {
    rules: Vec<WarningRule>,
    collected: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector applying the given rules on top of the defaults.
    pub fn with_rules(rules: Vec<WarningRule>) -> Self {
        Self {
            rules,
            collected: Vec::new(),
        }
    }

    /// Create an empty collector sharing this collector's rules.
    pub fn fork(&self) -> Self {
        Self::with_rules(self.rules.clone())
    }

    /// Append a rule. Later rules take precedence.
    pub fn set(&mut self, rule: WarningRule) {
        self.rules.push(rule);
    }

    /// Whether `kind` warnings are reported for `filename`.
    pub fn enabled(&self, kind: WarningKind, filename: &str) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.matches(kind, filename))
            .next_back()
            .map_or(kind.enabled_by_default(), |rule| rule.enabled)
    }

    /// Record a warning if its kind is enabled for the file.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>, file: Option<&FileRef>) {
        let filename = file.map(|f| f.filename.as_str()).unwrap_or("");
        if !self.enabled(kind, filename) {
            return;
        }

        let warning = Warning {
            kind,
            message: message.into(),
            file: file.cloned(),
        };
        tracing::warn!(kind = %warning.kind, "{}", warning);
        self.collected.push(warning);
    }

    /// Move all warnings collected by `other` into this collector.
    pub fn absorb(&mut self, other: Warnings) {
        self.collected.extend(other.collected);
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.collected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.collected.iter()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.collected
    }

    /// Fail when warnings are fatal and any were collected.
    pub fn check(&self, as_errors: bool) -> Result<()> {
        if as_errors && !self.collected.is_empty() {
            return Err(DocsError::Warnings {
                count: self.collected.len(),
            });
        }
        Ok(())
    }
}
