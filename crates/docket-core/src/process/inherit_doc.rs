//! `@inheritdoc` resolution, explicit and automatic.
//!
//! All updates are computed against the registry as it stands, then applied
//! in one go, so the order in which classes are visited does not matter.

use crate::model::{Deprecation, InheritDoc, Member, Param, ReturnDoc, TagName};
use crate::relations::{ClassView, MemberQuery, MemberRef, Relations};
use crate::warnings::{WarningKind, Warnings};

/// Longest `@inheritdoc` chain followed before giving up.
const MAX_CHAIN: usize = 16;

/// Snapshot of the member documentation is copied from.
struct Source {
    tagname: TagName,
    doc: String,
    params: Vec<Param>,
    r#return: Option<ReturnDoc>,
    r#type: Option<String>,
    protected: bool,
    readonly: bool,
    deprecated: Option<Deprecation>,
    /// The chain ended at a code-only member with nothing to inherit.
    placeholder: bool,
    explicit: bool,
}

enum Update {
    Inherit(Box<Source>),
    MakePrivate,
}

pub(crate) fn inherit_docs(relations: &mut Relations, warnings: &mut Warnings) {
    let mut member_updates = Vec::new();
    let mut class_updates = Vec::new();

    for class in relations.iter() {
        for (idx, member) in class.class().members.iter().enumerate() {
            let Some(inheritdoc) = &member.inheritdoc else {
                continue;
            };
            let r = MemberRef {
                class: class.index(),
                member: idx,
            };
            match find_parent(relations, class, member, inheritdoc) {
                Some(parent) => {
                    let source = source_of(relations, parent, inheritdoc);
                    member_updates.push((r, Update::Inherit(Box::new(source))));
                }
                None if member.autodetected.member => {
                    member_updates.push((r, Update::MakePrivate));
                }
                None => warnings.warn(
                    WarningKind::Inheritdoc,
                    format!(
                        "@inheritdoc {} - member not found",
                        describe(class.name(), member, inheritdoc)
                    ),
                    member.files.first(),
                ),
            }
        }

        if let Some(inheritdoc) = &class.class().inheritdoc {
            let target = match &inheritdoc.cls {
                Some(name) => relations.get(name),
                None => class.parent(),
            };
            match target {
                Some(target) => {
                    class_updates.push((class.name().to_string(), target.class().doc.clone()));
                }
                None => warnings.warn(
                    WarningKind::Inheritdoc,
                    format!(
                        "@inheritdoc {} - class not found",
                        inheritdoc.cls.as_deref().unwrap_or("parent")
                    ),
                    class.class().files.first(),
                ),
            }
        }
    }

    let count = member_updates.len();
    for (r, update) in member_updates {
        let member = relations.member_mut(r);
        match update {
            Update::Inherit(source) => apply(member, *source),
            Update::MakePrivate => member.private = true,
        }
    }
    for (name, doc) in class_updates {
        if let Ok(class) = relations.class_mut(&name) {
            if class.doc.is_empty() {
                class.doc = doc;
            }
        }
    }

    relations.refresh_all_member_ids();
    tracing::debug!(members = count, "resolved inherited docs");
}

/// The member an `@inheritdoc` points at.
fn find_parent(
    relations: &Relations,
    class: ClassView<'_>,
    member: &Member,
    inheritdoc: &InheritDoc,
) -> Option<MemberRef> {
    let name = inheritdoc.member.as_deref().unwrap_or(&member.name);
    let is_static = inheritdoc.r#static || member.r#static;

    if inheritdoc.cls.is_some() || inheritdoc.member.is_some() {
        let target = match &inheritdoc.cls {
            Some(cls) => relations.get(cls)?,
            None => class,
        };
        let tagname = inheritdoc.r#type.unwrap_or(member.tagname);
        let query = MemberQuery::named(name).statics(is_static);
        let candidates = target.find_member_refs(&query);
        let lenient = member.autodetected.member || inheritdoc.r#type.is_none();
        return pick(relations, &candidates, tagname, lenient)
            .filter(|&r| r.class != class.index() || relations.member(r).name != member.name);
    }

    let query = MemberQuery::named(name).statics(is_static);
    let lenient = member.autodetected.member;
    let mut ancestors: Vec<ClassView<'_>> = class.parent().into_iter().collect();
    ancestors.extend(class.mixins());
    ancestors.into_iter().find_map(|ancestor| {
        let candidates = ancestor.find_member_refs(&query);
        pick(relations, &candidates, member.tagname, lenient)
    })
}

/// Prefer a member of the same kind. Value members stand in for each other
/// when `lenient`, so a property can pick up the docs of a cfg.
fn pick(
    relations: &Relations,
    candidates: &[MemberRef],
    tagname: TagName,
    lenient: bool,
) -> Option<MemberRef> {
    candidates
        .iter()
        .copied()
        .find(|&r| relations.member(r).tagname == tagname)
        .or_else(|| {
            candidates.iter().copied().find(|&r| {
                let other = relations.member(r).tagname;
                lenient && tagname.is_value() && other.is_value()
            })
        })
}

/// Follow the chain of undocumented inheriting members to real docs.
fn source_of(relations: &Relations, start: MemberRef, inheritdoc: &InheritDoc) -> Source {
    let mut current = start;
    let mut placeholder = false;
    for _ in 0..MAX_CHAIN {
        let member = relations.member(current);
        let Some(next_inheritdoc) = &member.inheritdoc else {
            break;
        };
        if !member.doc.is_empty() {
            break;
        }
        let Some(class) = relations.get(&member.owner) else {
            break;
        };
        match find_parent(relations, class, member, next_inheritdoc) {
            Some(next) if next != current => current = next,
            _ => {
                placeholder = member.autodetected.member;
                break;
            }
        }
    }

    let member = relations.member(current);
    Source {
        tagname: member.tagname,
        doc: member.doc.clone(),
        params: member.params.clone(),
        r#return: member.r#return.clone(),
        r#type: member.r#type.clone(),
        protected: member.protected,
        readonly: member.readonly,
        deprecated: member.deprecated.clone(),
        placeholder: placeholder || (member.autodetected.member && member.doc.is_empty()),
        explicit: *inheritdoc != InheritDoc::default(),
    }
}

fn apply(member: &mut Member, source: Source) {
    let auto = member.autodetected.member;

    if member.doc.is_empty() {
        member.doc = source.doc;
    }
    if member.params.iter().all(|p| p.ext4_auto_param) && !source.params.is_empty() {
        member.params = source.params;
    }
    if member.r#return.is_none() {
        member.r#return = source.r#return;
    }

    // Code-only members keep their own type over an undocumented parent.
    let keep_own_type = auto && !source.explicit && source.placeholder;
    if source.r#type.is_some() && !keep_own_type {
        member.r#type = source.r#type;
    }

    if auto {
        member.protected |= source.protected;
        member.readonly |= source.readonly;
        if member.deprecated.is_none() {
            member.deprecated = source.deprecated;
        }
        if source.placeholder {
            member.private = true;
        }
        if member.tagname == TagName::Property && source.tagname == TagName::Cfg {
            member.tagname = TagName::Cfg;
        }
    }
}

fn describe(class: &str, member: &Member, inheritdoc: &InheritDoc) -> String {
    let cls = inheritdoc.cls.as_deref().unwrap_or(class);
    let name = inheritdoc.member.as_deref().unwrap_or(&member.name);
    format!("{}#{}", cls, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Class;
    use rustc_hash::FxHashSet;

    fn class(name: &str, extends: Option<&str>, members: Vec<Member>) -> Class {
        let mut class = Class::new(name);
        class.extends = extends.map(str::to_string);
        for mut member in members {
            member.owner = name.to_string();
            class.members.push(member);
        }
        class
    }

    fn documented(tagname: TagName, name: &str, doc: &str) -> Member {
        let mut member = Member::new(tagname, name);
        member.doc = doc.to_string();
        member
    }

    fn auto(tagname: TagName, name: &str) -> Member {
        let mut member = Member::new(tagname, name);
        member.autodetected.member = true;
        member.autodetected.tagname = true;
        member.inheritdoc = Some(InheritDoc::default());
        member
    }

    fn run(classes: Vec<Class>) -> (Relations, Warnings) {
        let mut warnings = Warnings::new();
        let mut relations = Relations::build(classes, FxHashSet::default(), &mut warnings)
            .expect("relations should build");
        inherit_docs(&mut relations, &mut warnings);
        (relations, warnings)
    }

    fn member<'a>(relations: &'a Relations, class: &str, idx: usize) -> &'a Member {
        &relations.get(class).expect("class registered").class().members[idx]
    }

    #[test]
    fn auto_members_inherit_through_two_parents() {
        let mut cfg = documented(TagName::Cfg, "foo", "My config.");
        cfg.protected = true;
        let (relations, _) = run(vec![
            class("Parent", None, vec![cfg]),
            class("Middle", Some("Parent"), vec![auto(TagName::Cfg, "foo")]),
            class("Child", Some("Middle"), vec![auto(TagName::Cfg, "foo")]),
        ]);
        let foo = member(&relations, "Child", 0);
        assert_eq!(foo.doc, "My config.");
        assert!(!foo.private);
        assert!(foo.protected);
    }

    #[test]
    fn auto_members_without_parent_become_private() {
        let (relations, warnings) = run(vec![class("Child", None, vec![auto(TagName::Cfg, "foo")])]);
        assert!(member(&relations, "Child", 0).private);
        assert!(warnings.is_empty());
    }

    #[test]
    fn explicit_reference_copies_params_and_type() {
        let mut original = documented(TagName::Event, "foo", "Original comment.");
        original.params = vec![Param::new("arg1"), Param::new("arg2")];
        let mut inheriting = Member::new(TagName::Event, "foo");
        inheriting.inheritdoc = Some(InheritDoc {
            cls: Some("Foo".to_string()),
            member: Some("foo".to_string()),
            ..InheritDoc::default()
        });
        inheriting.params = vec![Param {
            ext4_auto_param: true,
            ..Param::new("eOpts")
        }];

        let (relations, _) = run(vec![
            class("Foo", None, vec![original]),
            class("Inh1", None, vec![inheriting]),
        ]);
        let inh = member(&relations, "Inh1", 0);
        assert_eq!(inh.doc, "Original comment.");
        assert_eq!(inh.params.len(), 2);
    }

    #[test]
    fn property_overriding_cfg_becomes_cfg() {
        let (relations, _) = run(vec![
            class("Parent", None, vec![documented(TagName::Cfg, "foo", "Docs.")]),
            class("Child", Some("Parent"), vec![auto(TagName::Property, "foo")]),
        ]);
        let foo = member(&relations, "Child", 0);
        assert_eq!(foo.tagname, TagName::Cfg);
        assert_eq!(foo.id, "cfg-foo");
    }

    #[test]
    fn type_comes_from_public_parent_only() {
        let mut typed = documented(TagName::Property, "bar", "Docs.");
        typed.r#type = Some("String/Number".to_string());
        let mut parent_auto = auto(TagName::Property, "baz");
        parent_auto.r#type = Some("Number".to_string());
        let mut private_documented = documented(TagName::Property, "zap", "Hidden.");
        private_documented.r#type = Some("String/Number".to_string());
        private_documented.private = true;

        let child_member = |name: &str| {
            let mut member = auto(TagName::Property, name);
            member.r#type = Some("String".to_string());
            member
        };
        let (relations, _) = run(vec![
            class("Parent", None, vec![typed, parent_auto, private_documented]),
            class(
                "Child",
                Some("Parent"),
                vec![child_member("bar"), child_member("baz"), child_member("zap")],
            ),
        ]);
        assert_eq!(member(&relations, "Child", 0).r#type.as_deref(), Some("String/Number"));
        assert_eq!(member(&relations, "Child", 1).r#type.as_deref(), Some("String"));
        assert_eq!(member(&relations, "Child", 2).r#type.as_deref(), Some("String/Number"));
    }

    #[test]
    fn statics_inherit_only_from_statics() {
        let mut parent_static = documented(TagName::Method, "foo", "My method.");
        parent_static.r#static = true;
        parent_static.inheritable = true;
        parent_static.refresh_id();
        let mut child_static = auto(TagName::Method, "foo");
        child_static.r#static = true;
        child_static.inheritable = true;
        child_static.refresh_id();

        let (relations, _) = run(vec![
            class("Parent", None, vec![parent_static]),
            class("Child", Some("Parent"), vec![auto(TagName::Method, "foo"), child_static]),
        ]);
        assert!(member(&relations, "Child", 0).doc.is_empty());
        assert!(member(&relations, "Child", 0).private);
        assert_eq!(member(&relations, "Child", 1).doc, "My method.");
    }

    #[test]
    fn missing_explicit_target_warns() {
        let mut member = documented(TagName::Method, "foo", "");
        member.inheritdoc = Some(InheritDoc {
            cls: Some("Nowhere".to_string()),
            ..InheritDoc::default()
        });
        let (_, warnings) = run(vec![class("Foo", None, vec![member])]);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::Inheritdoc]);
    }

    #[test]
    fn classes_inherit_doc_but_not_localdoc() {
        let mut parent = class("Parent", None, Vec::new());
        parent.doc = "Parent docs.".to_string();
        parent.localdoc = Some("Only here.".to_string());
        let mut child = class("Child", Some("Parent"), Vec::new());
        child.inheritdoc = Some(InheritDoc::default());

        let (relations, _) = run(vec![parent, child]);
        let child = relations.get("Child").expect("registered").class();
        assert_eq!(child.doc, "Parent docs.");
        assert_eq!(child.localdoc, None);
    }
}
