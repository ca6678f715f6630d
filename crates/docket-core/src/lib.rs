#![deny(clippy::all)]

//! Documentation aggregation engine for JSDuck-style doc-comments.
//!
//! This crate provides:
//! - A parser-independent code tree ([`ast`]) filled in by front-ends.
//! - Doc-comment parsing and tag interpretation ([`doc`]).
//! - Classification of the code following a comment ([`classify`]).
//! - Merging of doc and code into classes and members ([`merger`]).
//! - Aggregation of all files into a class registry with inheritance-aware
//!   member lookup ([`aggregator`], [`relations`]).

pub mod aggregator;
pub mod ast;
pub mod classify;
pub mod doc;
pub mod error;
pub mod extract;
pub mod merger;
pub mod model;
pub mod relations;
pub mod types;
pub mod warnings;

mod css;
mod process;

pub use aggregator::{AggregateOptions, Aggregator, GLOBAL_CLASS, aggregate};
pub use ast::{SourceDoc, SourceFile, SourceKind};
pub use classify::ExtPatterns;
pub use error::{DocsError, Result};
pub use extract::extract_entries;
pub use model::{
    Autodetected, Class, Deprecation, DocEntry, Entity, EnumInfo, FileRef, InheritDoc, Member,
    Param, ReturnDoc, TagName, Throws,
};
pub use relations::{ClassView, MemberQuery, MemberRef, Relations};
pub use types::{BuiltinTypeRenderer, TypeError, TypeRenderer, check_types, format_type};
pub use warnings::{Warning, WarningKind, WarningRule, Warnings};
