//! Combining a doc-comment with the code it documents.
//!
//! The comment always wins. Code fills the gaps, but only when the comment
//! does not name the entity or names it the same way the code does.

use crate::classify::CodeRecord;
use crate::doc::DocRecord;
use crate::model::{Class, DocEntry, Entity, FileRef, Member, TagName};

/// Merge one interpreted comment with its classified code.
pub fn merge(doc: DocRecord, code: CodeRecord, file: &FileRef) -> DocEntry {
    let member_of = doc.member_of.clone();
    let ignore = doc.ignore;
    let entity = if doc.tagname == TagName::Class {
        Entity::Class(merge_class(doc, code, file))
    } else {
        Entity::Member(merge_member(doc, &code, file))
    };
    DocEntry {
        entity,
        member_of,
        ignore,
    }
}

/// Whether the code describes the entity the comment talks about.
fn code_applies(doc: &DocRecord, code: &CodeRecord) -> bool {
    if !code.present {
        return false;
    }
    let Some(doc_name) = doc.name.as_deref() else {
        return true;
    };
    match doc.tagname {
        TagName::Class => code.name.as_deref().is_none_or(|name| name == doc_name),
        _ => code.short_name().is_none_or(|name| name == doc_name),
    }
}

pub fn merge_member(doc: DocRecord, code: &CodeRecord, file: &FileRef) -> Member {
    let empty = CodeRecord::default();
    let code = if code_applies(&doc, code) { code } else { &empty };
    let tagname = doc.tagname;

    let code_name = code.short_name().map(str::to_string);
    let name = doc.name.clone().or_else(|| code_name.clone()).unwrap_or_default();
    let mut member = Member::new(tagname, name);
    member.autodetected.tagname = !doc.explicit_tagname && code.present;
    member.autodetected.name = doc.name.is_none() && code_name.is_some();

    let same_kind = code.tagname == tagname || (code.tagname.is_value() && tagname.is_value());
    if tagname.is_value() {
        member.r#type = doc.r#type.clone();
        member.default = doc.default.clone();
        if same_kind {
            if member.r#type.is_none() && code.r#type.is_some() {
                member.r#type = code.r#type.clone();
                member.autodetected.r#type = true;
            }
            if member.default.is_none() && code.default.is_some() {
                member.default = code.default.clone();
                member.autodetected.default = true;
            }
        }
        if member.r#type.is_none() && tagname != TagName::CssVar {
            member.r#type = Some("Object".to_string());
        }
    } else {
        member.r#type = doc.r#type.clone();
    }

    member.params = if !doc.params.is_empty() {
        doc.params.clone()
    } else if matches!(code.tagname, TagName::Method | TagName::CssMixin)
        && !tagname.is_value()
    {
        member.autodetected.params = !code.params.is_empty();
        code.params.clone()
    } else {
        Vec::new()
    };

    member.r#return = doc.r#return.clone();
    member.chainable = doc.chainable;
    if tagname == TagName::Method
        && code.tagname == TagName::Method
        && !doc.chainable
        && !doc.constructor
        && doc.r#return.is_none()
        && code.chainable
    {
        member.chainable = true;
        member.autodetected.chainable = true;
    }
    if code.tagname == TagName::Method || code.tagname == TagName::Class {
        member.code = code.facts.clone();
    }

    member.doc = doc.doc;
    member.throws = doc.throws;
    member.properties = doc.properties;
    member.fires = doc.fires;
    member.explicit_fires = doc.explicit_fires;
    member.private = doc.private;
    member.protected = doc.protected;
    member.r#static = doc.r#static || code.r#static;
    member.inheritable = doc.inheritable || code.inheritable;
    member.r#abstract = doc.r#abstract;
    member.required = doc.required;
    member.optional = doc.optional;
    member.accessor = doc.accessor || code.accessor;
    member.evented = doc.evented || code.evented;
    member.hide = doc.hide;
    member.template = doc.template;
    member.preventable = doc.preventable;
    member.readonly = doc.readonly;
    member.deprecated = doc.deprecated;
    member.removed = doc.removed;
    member.since = doc.since;
    member.localdoc = doc.localdoc;
    member.inheritdoc = doc.inheritdoc;
    member.files = vec![file.clone()];
    member.linenr = file.linenr;
    member.refresh_id();
    member
}

pub fn merge_class(doc: DocRecord, code: CodeRecord, file: &FileRef) -> Class {
    let code = if code_applies(&doc, &code) {
        code
    } else {
        CodeRecord::default()
    };

    let mut class = Class::new(doc.name.or(code.name).unwrap_or_default());
    class.extends = doc.extends.or(code.extends);
    class.mixins = concat_unique(doc.mixins, code.mixins);
    class.alternate_class_names = concat_unique(doc.alternate_class_names, code.alternate_class_names);
    class.aliases = concat_unique(doc.aliases, code.aliases);
    class.requires = concat_unique(doc.requires, code.requires);
    class.uses = concat_unique(doc.uses, code.uses);
    class.singleton = doc.singleton || code.singleton;
    class.private = doc.private;
    class.protected = doc.protected;
    class.hide = doc.hide;
    class.doc = doc.doc;
    class.localdoc = doc.localdoc;
    class.deprecated = doc.deprecated;
    class.since = doc.since;
    class.override_target = doc.override_target.or(code.override_target);
    class.inheritdoc = doc.inheritdoc;
    class.ext_define = code.ext_define;
    class.enum_info = doc.enum_info.map(|mut info| {
        info.doc_only |= code.r#type.as_deref() == Some("Array");
        info
    });
    class.files = vec![file.clone()];
    class.members = code
        .members
        .into_iter()
        .map(|mut member| {
            if member.linenr == 0 {
                member.linenr = file.linenr;
            }
            member.files = vec![FileRef::new(file.filename.clone(), member.linenr)];
            member
        })
        .collect();
    class
}

fn concat_unique(mut first: Vec<String>, second: Vec<String>) -> Vec<String> {
    for item in second {
        if !first.contains(&item) {
            first.push(item);
        }
    }
    first
}
