//! Enum classes: members turned into typed properties.

use indexmap::IndexSet;

use crate::model::{Class, EnumInfo, Member, TagName};
use crate::warnings::{WarningKind, Warnings};

/// Normalize every enum class. Alias enums such as `[xtype=widget.*]` are
/// filled from the aliases of all classes.
pub(crate) fn process_enums(classes: &mut [Class], warnings: &mut Warnings) {
    for idx in 0..classes.len() {
        let Some(info) = classes[idx].enum_info.clone() else {
            continue;
        };

        let alias_members = info
            .default
            .as_deref()
            .map(|pattern| alias_members(classes, pattern));

        let class = &mut classes[idx];
        if let Some(members) = alias_members {
            for mut member in members {
                member.owner = class.name.clone();
                class.members.push(member);
            }
        }
        normalize(class, info);

        if class.members.is_empty() {
            warnings.warn(
                WarningKind::Enum,
                format!("Enum {} has no members", class.name),
                class.files.first(),
            );
        }
    }
}

fn normalize(class: &mut Class, mut info: EnumInfo) {
    class.extends = None;
    class.members.retain(|m| m.tagname != TagName::Event);

    let ty = info
        .r#type
        .clone()
        .unwrap_or_else(|| infer_type(&class.members));
    for member in &mut class.members {
        member.tagname = TagName::Property;
        member.r#type = Some(ty.clone());
        if member.autodetected.member {
            member.inheritdoc = None;
        }
        member.refresh_id();
    }
    info.r#type = Some(ty);
    class.enum_info = Some(info);
}

/// Union of the member types in order of first appearance, `Object` when
/// nothing is known.
fn infer_type(members: &[Member]) -> String {
    let types: IndexSet<&str> = members
        .iter()
        .filter_map(|m| m.r#type.as_deref().filter(|ty| m.autodetected.r#type || *ty != "Object"))
        .collect();
    if types.is_empty() {
        "Object".to_string()
    } else {
        types.into_iter().collect::<Vec<_>>().join("/")
    }
}

/// One member per class alias matching `prefix.*`.
fn alias_members(classes: &[Class], pattern: &str) -> Vec<Member> {
    let prefix = pattern.trim_end_matches('*');
    let mut members = Vec::new();
    for class in classes {
        for alias in &class.aliases {
            let Some(name) = alias.strip_prefix(prefix) else {
                continue;
            };
            let mut member = Member::new(TagName::Property, name);
            member.default = Some(format!("'{}'", name));
            member.doc = format!("Alias for {{@link {}}}.", class.name);
            member.private = class.private;
            member.files = class.files.clone();
            member.linenr = class.files.first().map_or(0, |f| f.linenr);
            members.push(member);
        }
    }
    members
}
