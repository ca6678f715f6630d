//! `Ext.define("Name", { ... })` bodies.

use super::{CodeRecord, ExtPatterns, Section, auto_member};
use crate::ast::{Node, ObjectLiteral};
use crate::model::TagName;

/// Class every defined class extends unless told otherwise.
const BASE_CLASS: &str = "Ext.Base";

pub(super) fn define_record(
    name: Option<String>,
    body: Option<&ObjectLiteral>,
    patterns: &ExtPatterns,
) -> CodeRecord {
    let mut record = CodeRecord::of(TagName::Class, name);
    record.ext_define = true;

    if let Some(body) = body {
        for property in &body.properties {
            let value = &property.value;
            match property.key.as_str() {
                "extend" => record.extends = value.as_str().map(str::to_string),
                "mixins" => record.mixins = mixin_names(value),
                "alternateClassName" => record.alternate_class_names = string_list(value),
                "alias" => record.aliases.extend(string_list(value)),
                "xtype" => record
                    .aliases
                    .extend(string_list(value).into_iter().map(|x| format!("widget.{}", x))),
                "requires" => record.requires = string_list(value),
                "uses" => record.uses = string_list(value),
                "singleton" => record.singleton = value.is_true(),
                "override" => record.override_target = value.as_str().map(str::to_string),
                key => match (Section::from_key(key), value.as_object()) {
                    (Some(section), Some(object)) => {
                        section_members(&mut record, section, object, patterns)
                    }
                    _ if property.documented => {}
                    _ => record.members.push(auto_member(property, patterns)),
                },
            }
        }
    }

    if record.extends.is_none() && record.name.as_deref() != Some(BASE_CLASS) {
        record.extends = Some(BASE_CLASS.to_string());
    }
    record
}

/// Members of `config`-like and `statics`-like sections.
fn section_members(
    record: &mut CodeRecord,
    section: Section,
    object: &ObjectLiteral,
    patterns: &ExtPatterns,
) {
    for property in &object.properties {
        if property.documented {
            record.hints.push((property.offset, section));
            continue;
        }

        let mut member = auto_member(property, patterns);
        if section.is_config() {
            member.tagname = TagName::Cfg;
            member.params.clear();
            member.accessor = true;
            member.evented = section == Section::EventedConfig;
        } else {
            member.r#static = true;
            member.inheritable = section == Section::InheritableStatics;
        }
        member.refresh_id();
        record.members.push(member);
    }
}

/// String, array of strings, or object whose string values are taken.
fn mixin_names(value: &Node) -> Vec<String> {
    match value {
        Node::Object(object) => object
            .properties
            .iter()
            .filter_map(|p| p.value.as_str().map(str::to_string))
            .collect(),
        _ => string_list(value),
    }
}

/// String or array of strings. Anything else gives nothing.
fn string_list(value: &Node) -> Vec<String> {
    match value {
        Node::Array(array) => array
            .elements
            .iter()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        _ => value.as_str().map(str::to_string).into_iter().collect(),
    }
}
