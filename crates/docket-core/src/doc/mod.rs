//! Doc-comment handling: tokenizing comments into tags and interpreting the
//! tags of one entity.

mod default_value;
mod expand;
mod interpreter;
mod parser;
pub(crate) mod scanner;
mod subproperties;
mod tagname;
mod tags;

pub use expand::{TagGroup, expand_class};
pub use interpreter::{DocRecord, interpret};
pub use parser::{ParsedDoc, parse_comment};
pub use tagname::{Detected, detect};
pub use tags::{RawTag, TagKind};
