use super::tags::{RawTag, TagKind};
use crate::model::TagName;

/// Kind of entity a doc-comment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub tagname: TagName,
    /// Decided by the comment itself rather than by the code.
    pub explicit: bool,
}

impl Detected {
    fn explicit(tagname: TagName) -> Self {
        Self {
            tagname,
            explicit: true,
        }
    }

    fn from_code(tagname: TagName) -> Self {
        Self {
            tagname,
            explicit: false,
        }
    }
}

/// Decide the tagname of a comment from its tags, falling back to the
/// kind of the code that follows it.
pub fn detect(tags: &[RawTag], code: Option<TagName>) -> Detected {
    let has = |kind: TagKind| tags.iter().any(|t| t.kind == kind);
    let cfg_count = top_level_cfgs(tags);

    if has(TagKind::Class) {
        Detected::explicit(TagName::Class)
    } else if has(TagKind::Event) {
        Detected::explicit(TagName::Event)
    } else if has(TagKind::Method) {
        Detected::explicit(TagName::Method)
    } else if has(TagKind::Property) || has(TagKind::Type) {
        Detected::explicit(TagName::Property)
    } else if has(TagKind::Var) {
        Detected::explicit(TagName::CssVar)
    } else if cfg_count == 1 {
        Detected::explicit(TagName::Cfg)
    } else if code == Some(TagName::Class) {
        Detected::from_code(TagName::Class)
    } else if has(TagKind::CssMixin) {
        Detected::explicit(TagName::CssMixin)
    } else if cfg_count > 1 {
        Detected::explicit(TagName::Class)
    } else if has(TagKind::Constructor) || has(TagKind::Param) || has(TagKind::Return) {
        Detected::explicit(TagName::Method)
    } else if has(TagKind::Enum) || has(TagKind::Override) {
        Detected::explicit(TagName::Class)
    } else {
        Detected::from_code(code.unwrap_or_default())
    }
}

/// Number of `@cfg` tags that are not subproperties of another `@cfg`.
fn top_level_cfgs(tags: &[RawTag]) -> usize {
    let cfgs: Vec<&str> = tags
        .iter()
        .filter(|t| t.kind == TagKind::Cfg)
        .map(|t| t.name_str())
        .collect();
    cfgs.iter()
        .filter(|name| {
            name.rsplit_once('.')
                .is_none_or(|(parent, _)| !cfgs.contains(&parent))
        })
        .count()
}
