//! Splitting of class doc-comments that also document configs and the
//! constructor.

use super::tags::{RawTag, TagKind};
use crate::model::TagName;

/// Tags of one entity carved out of a class comment.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    pub tagname: TagName,
    pub tags: Vec<RawTag>,
}

/// Split a class comment at every `@cfg` and `@constructor`. The first group
/// is the class itself. `@cfg foo.bar` stays with the preceding `@cfg foo`.
pub fn expand_class(tags: Vec<RawTag>) -> Vec<TagGroup> {
    let mut groups = vec![TagGroup {
        tagname: TagName::Class,
        tags: Vec::new(),
    }];
    let mut cfg_root: Option<String> = None;

    for tag in tags {
        match tag.kind {
            TagKind::Cfg => {
                let name = tag.name_str();
                let root = name.split('.').next().unwrap_or("").to_string();
                let is_sub_cfg = name.contains('.') && cfg_root.as_deref() == Some(root.as_str());
                if !is_sub_cfg {
                    cfg_root = Some(root);
                    groups.push(TagGroup {
                        tagname: TagName::Cfg,
                        tags: Vec::new(),
                    });
                }
            }
            TagKind::Constructor => {
                cfg_root = None;
                groups.push(TagGroup {
                    tagname: TagName::Method,
                    tags: Vec::new(),
                });
            }
            _ => {}
        }
        if let Some(group) = groups.last_mut() {
            group.tags.push(tag);
        }
    }
    groups
}
