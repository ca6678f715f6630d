//! Combining the entries of all files into one class registry.
//!
//! Entries are fed file by file in input order with [`Aggregator::add_file`].
//! [`Aggregator::finish`] then runs the registry-wide passes and hands back
//! the [`Relations`] index.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::model::{Class, DocEntry, Entity, Member};
use crate::process;
use crate::relations::Relations;
use crate::types::{BuiltinTypeRenderer, check_types};
use crate::warnings::{WarningKind, Warnings};

/// Class receiving members documented outside of any class.
pub const GLOBAL_CLASS: &str = "global";

/// Options controlling aggregation.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// Append `eOpts` to events. `None` turns it on when any class was
    /// created through a define call.
    pub ext4_events: Option<bool>,
    /// Validate every type expression against the registry.
    pub check_types: bool,
}

/// Where members following a class doc in the current file go.
#[derive(Debug, Clone, Copy)]
enum Current {
    None,
    Class(usize),
    /// The last class was ignored or unusable; its members are dropped.
    Dropped,
}

/// Accumulates classes from the entries of each file.
#[derive(Debug, Default)]
pub struct Aggregator {
    options: AggregateOptions,
    classes: Vec<Class>,
    /// Names and alternate names registered so far.
    names: FxHashMap<String, usize>,
    ignored: FxHashSet<String>,
    /// Members waiting for their class, keyed by class name.
    orphans: IndexMap<String, Vec<Member>>,
}

impl Aggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Group the entries of one file into classes.
    pub fn add_file(&mut self, filename: &str, entries: Vec<DocEntry>, warnings: &mut Warnings) {
        let mut current = Current::None;
        for entry in entries {
            match entry.entity {
                Entity::Class(class) => {
                    current = self.add_class(class, entry.ignore, filename, warnings);
                }
                Entity::Member(member) => {
                    if entry.ignore {
                        continue;
                    }
                    if member.name.is_empty() {
                        warnings.warn(
                            WarningKind::NameMissing,
                            format!("Unnamed {} in {}", member.tagname, filename),
                            member.files.first(),
                        );
                        continue;
                    }
                    match (entry.member_of, current) {
                        (Some(target), _) => self.add_orphan(target, member, warnings),
                        (None, Current::Class(idx)) => self.classes[idx].members.push(member),
                        (None, Current::None) => {
                            self.add_orphan(GLOBAL_CLASS.to_string(), member, warnings)
                        }
                        (None, Current::Dropped) => {}
                    }
                }
            }
        }
    }

    fn add_class(
        &mut self,
        mut class: Class,
        ignore: bool,
        filename: &str,
        warnings: &mut Warnings,
    ) -> Current {
        if class.name.is_empty() {
            if class.override_target.is_some() {
                class.name = filename.to_string();
            } else {
                warnings.warn(
                    WarningKind::NameMissing,
                    format!("Unnamed class in {}", filename),
                    class.files.first(),
                );
                return Current::Dropped;
            }
        }
        if ignore {
            self.ignored.insert(class.name);
            return Current::Dropped;
        }

        let names = registered_names(&class);
        let idx = match self.names.get(&class.name) {
            Some(&idx) => {
                merge_class(&mut self.classes[idx], class);
                idx
            }
            None => {
                self.classes.push(class);
                self.classes.len() - 1
            }
        };
        self.register(&names, idx);
        self.adopt_orphans(&names, idx, warnings);
        Current::Class(idx)
    }

    fn register(&mut self, names: &[String], idx: usize) {
        for name in names {
            self.names.entry(name.clone()).or_insert(idx);
        }
    }

    /// Members of a class that exists go straight into it; the rest wait
    /// until the class is registered.
    fn add_orphan(&mut self, target: String, member: Member, warnings: &mut Warnings) {
        match self.names.get(&target) {
            Some(&idx) => {
                if target == GLOBAL_CLASS {
                    warn_global(std::slice::from_ref(&member), warnings);
                }
                self.classes[idx].members.push(member);
            }
            None => self.orphans.entry(target).or_default().push(member),
        }
    }

    /// Move the members waiting for any of `names` into the class at `idx`.
    fn adopt_orphans(&mut self, names: &[String], idx: usize, warnings: &mut Warnings) {
        for name in names {
            if self.names.get(name) != Some(&idx) {
                continue;
            }
            if let Some(members) = self.orphans.shift_remove(name) {
                if name == GLOBAL_CLASS {
                    warn_global(&members, warnings);
                }
                self.classes[idx].members.extend(members);
            }
        }
    }

    /// Run the registry-wide passes and build the inheritance index.
    pub fn finish(mut self, warnings: &mut Warnings) -> Result<Relations> {
        self.flush_orphans(warnings);
        tracing::debug!(classes = self.classes.len(), "grouped classes");

        let mut classes = fold_alternate_names(self.classes, &mut self.ignored, warnings);
        classes.retain(|class| !self.ignored.contains(&class.name));

        process::absorb_overrides(&mut classes, &mut self.ignored, warnings);
        for class in &mut classes {
            for member in &mut class.members {
                member.owner.clone_from(&class.name);
            }
        }
        tracing::debug!(classes = classes.len(), "absorbed overrides");

        for class in &mut classes {
            process::add_accessors(class);
        }

        let ext4_events = process::ext4_events_enabled(self.options.ext4_events, &classes);
        for class in &mut classes {
            process::process_returns(class);
            if ext4_events {
                process::add_event_options(class);
            }
        }
        process::process_enums(&mut classes, warnings);
        for class in &mut classes {
            process::process_fires(class);
            process::fill_default_types(class);
        }
        tracing::debug!(ext4_events, "processed members");

        let mut relations = Relations::build(classes, self.ignored, warnings)?;
        process::inherit_docs(&mut relations, warnings);

        if self.options.check_types {
            let renderer = BuiltinTypeRenderer::from_relations(&relations);
            check_types(&relations, &renderer, warnings);
        }
        tracing::debug!(
            classes = relations.len(),
            warnings = warnings.len(),
            "aggregation finished"
        );
        Ok(relations)
    }

    fn flush_orphans(&mut self, warnings: &mut Warnings) {
        for (target, members) in std::mem::take(&mut self.orphans) {
            let idx = match self.names.get(&target) {
                Some(&idx) => idx,
                None if self.ignored.contains(&target) => continue,
                None => {
                    let idx = self.classes.len();
                    self.names.insert(target.clone(), idx);
                    self.classes.push(Class::new(target.clone()));
                    idx
                }
            };
            if target == GLOBAL_CLASS {
                warn_global(&members, warnings);
            }
            let class = &mut self.classes[idx];
            if class.files.is_empty() {
                class.files = members
                    .iter()
                    .find_map(|m| m.files.first().cloned())
                    .into_iter()
                    .collect();
            }
            class.members.extend(members);
        }
    }
}

fn warn_global(members: &[Member], warnings: &mut Warnings) {
    for member in members {
        warnings.warn(
            WarningKind::Global,
            format!("Global {}: {}", member.tagname, member.name),
            member.files.first(),
        );
    }
}

/// Aggregate the entries of several files, given in input order.
pub fn aggregate<I>(files: I, options: AggregateOptions, warnings: &mut Warnings) -> Result<Relations>
where
    I: IntoIterator<Item = (String, Vec<DocEntry>)>,
{
    let mut aggregator = Aggregator::new(options);
    for (filename, entries) in files {
        aggregator.add_file(&filename, entries, warnings);
    }
    aggregator.finish(warnings)
}

fn registered_names(class: &Class) -> Vec<String> {
    std::iter::once(class.name.clone())
        .chain(class.alternate_class_names.iter().cloned())
        .collect()
}

/// Merge a later definition of a class into the earlier one.
fn merge_class(target: &mut Class, other: Class) {
    if target.doc.is_empty() {
        target.doc = other.doc;
    }
    if target.extends.is_none() {
        target.extends = other.extends;
    }
    extend_unique(&mut target.mixins, other.mixins);
    extend_unique(&mut target.alternate_class_names, other.alternate_class_names);
    extend_unique(&mut target.aliases, other.aliases);
    extend_unique(&mut target.requires, other.requires);
    extend_unique(&mut target.uses, other.uses);
    target.singleton |= other.singleton;
    target.private |= other.private;
    target.protected |= other.protected;
    target.hide |= other.hide;
    target.ext_define |= other.ext_define;
    fill(&mut target.localdoc, other.localdoc);
    fill(&mut target.deprecated, other.deprecated);
    fill(&mut target.since, other.since);
    fill(&mut target.override_target, other.override_target);
    fill(&mut target.enum_info, other.enum_info);
    fill(&mut target.inheritdoc, other.inheritdoc);
    target.files.extend(other.files);
    target.members.extend(other.members);
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn extend_unique(list: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}

/// Unify classes that answer to the same name. The later class is folded
/// into the earlier one, which learns its name as an alternate.
fn fold_alternate_names(
    classes: Vec<Class>,
    ignored: &mut FxHashSet<String>,
    warnings: &mut Warnings,
) -> Vec<Class> {
    let mut kept: Vec<Class> = Vec::with_capacity(classes.len());
    let mut names: FxHashMap<String, usize> = FxHashMap::default();

    for mut class in classes {
        let own_name = class.name.clone();
        class.alternate_class_names.retain(|alt| *alt != own_name);

        let names_of_class = registered_names(&class);
        let existing = names_of_class.iter().find_map(|name| names.get(name).copied());
        let idx = match existing {
            Some(idx) => {
                let target = &mut kept[idx];
                warnings.warn(
                    WarningKind::AltName,
                    format!(
                        "Class {} shares a name with {}, merging them",
                        own_name, target.name
                    ),
                    class.files.first(),
                );
                ignored.insert(own_name.clone());
                if target.name != own_name {
                    extend_unique(&mut target.alternate_class_names, vec![own_name]);
                }
                let target_name = target.name.clone();
                class.alternate_class_names.retain(|alt| *alt != target_name);
                merge_class(target, class);
                idx
            }
            None => {
                kept.push(class);
                kept.len() - 1
            }
        };
        for name in names_of_class {
            names.entry(name).or_insert(idx);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRef, Param, TagName};

    fn class_entry(class: Class) -> DocEntry {
        DocEntry {
            entity: Entity::Class(class),
            member_of: None,
            ignore: false,
        }
    }

    fn member_entry(member: Member) -> DocEntry {
        DocEntry {
            entity: Entity::Member(member),
            member_of: None,
            ignore: false,
        }
    }

    fn class_in(name: &str, file: &str) -> Class {
        let mut class = Class::new(name);
        class.files.push(FileRef::new(file, 1));
        class
    }

    fn run(files: Vec<(&str, Vec<DocEntry>)>) -> (Relations, Warnings) {
        let mut warnings = Warnings::new();
        let relations = aggregate(
            files.into_iter().map(|(name, entries)| (name.to_string(), entries)),
            AggregateOptions::default(),
            &mut warnings,
        )
        .expect("aggregation succeeds");
        (relations, warnings)
    }

    #[test]
    fn class_merging_is_idempotent_except_files() {
        let mut class = class_in("Foo", "a.js");
        class.doc = "Docs.".to_string();
        class.extends = Some("Ext.Base".to_string());
        class.mixins = vec!["Mix".to_string()];
        class.singleton = true;

        let mut once = class.clone();
        merge_class(&mut once, Class::default());
        let mut twice = class.clone();
        merge_class(&mut twice, class.clone());

        assert_eq!(twice.files.len(), 2);
        twice.files.truncate(1);
        assert_eq!(once, twice);
        assert_eq!(once, class);
    }

    #[test]
    fn first_doc_and_parent_win() {
        let mut first = class_in("Foo", "a.js");
        first.extends = Some("Parent".to_string());
        first.requires = vec!["A".to_string()];
        let mut second = class_in("Foo", "b.js");
        second.doc = "Later docs.".to_string();
        second.extends = Some("Other".to_string());
        second.requires = vec!["A".to_string(), "B".to_string()];
        second.private = true;

        let (relations, _) = run(vec![
            ("a.js", vec![class_entry(first)]),
            ("b.js", vec![class_entry(second)]),
        ]);
        let foo = relations.get("Foo").expect("Foo").class();
        assert_eq!(foo.doc, "Later docs.");
        assert_eq!(foo.extends.as_deref(), Some("Parent"));
        assert_eq!(foo.requires, vec!["A", "B"]);
        assert!(foo.private);
        assert_eq!(foo.files.len(), 2);
    }

    #[test]
    fn members_follow_the_class_of_their_file() {
        let (relations, warnings) = run(vec![
            (
                "a.js",
                vec![
                    class_entry(class_in("Foo", "a.js")),
                    member_entry(Member::new(TagName::Method, "bar")),
                ],
            ),
            ("b.js", vec![member_entry(Member::new(TagName::Method, "baz"))]),
        ]);

        let foo = relations.get("Foo").expect("Foo").class();
        assert_eq!(foo.members.len(), 1);
        assert_eq!(foo.members[0].owner, "Foo");

        let global = relations.get(GLOBAL_CLASS).expect("global class").class();
        assert_eq!(global.members[0].name, "baz");
        assert!(warnings.is_empty(), "global warnings are off by default");
    }

    #[test]
    fn member_tag_targets_its_class() {
        let mut foo = member_entry(Member::new(TagName::Method, "foo"));
        foo.member_of = Some("MyClass".to_string());
        let mut bar = member_entry(Member::new(TagName::Method, "bar"));
        bar.member_of = Some("MyClass".to_string());

        let (relations, _) = run(vec![("a.js", vec![foo, bar])]);
        assert_eq!(relations.len(), 1);
        let names: Vec<_> = relations
            .get("MyClass")
            .expect("MyClass")
            .class()
            .members
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn ignored_classes_drop_their_members() {
        let mut ignored = class_entry(class_in("Foo", "a.js"));
        ignored.ignore = true;
        let mut ignored_member = member_entry(Member::new(TagName::Method, "hidden"));
        ignored_member.ignore = true;

        let (relations, _) = run(vec![
            (
                "a.js",
                vec![ignored, member_entry(Member::new(TagName::Method, "bar"))],
            ),
            ("b.js", vec![class_entry(class_in("Bar", "b.js")), ignored_member]),
        ]);
        assert!(relations.get("Foo").is_none());
        assert!(relations.is_ignored("Foo"));
        assert!(relations.get(GLOBAL_CLASS).is_none());
        assert!(relations.get("Bar").expect("Bar").class().members.is_empty());
    }

    #[test]
    fn alternate_names_are_folded() {
        let mut first = class_in("Bar", "a.js");
        first.doc = "Bar docs.".to_string();
        let mut second = class_in("Foo", "b.js");
        second.alternate_class_names = vec!["Bar".to_string(), "Foo".to_string()];
        second.members.push(Member::new(TagName::Method, "run"));

        let (relations, warnings) = run(vec![
            ("a.js", vec![class_entry(first)]),
            ("b.js", vec![class_entry(second)]),
        ]);

        assert_eq!(relations.len(), 1);
        assert!(relations.is_ignored("Foo"));
        let bar = relations.get("Foo").expect("reachable by its alternate name");
        assert_eq!(bar.name(), "Bar");
        assert_eq!(bar.class().alternate_class_names, vec!["Foo"]);
        assert_eq!(bar.class().members[0].owner, "Bar");
        assert_eq!(warnings.iter().filter(|w| w.kind == WarningKind::AltName).count(), 1);
    }

    #[test]
    fn overrides_are_absorbed_and_ignored() {
        let mut foo = class_in("Foo", "foo.js");
        foo.doc = "Foo comment.".to_string();
        let mut patch = class_in("FooOverride", "override.js");
        patch.override_target = Some("Foo".to_string());
        let mut bar = Member::new(TagName::Method, "bar");
        bar.doc = "Bar comment.".to_string();

        let (relations, _) = run(vec![
            ("foo.js", vec![class_entry(foo)]),
            ("override.js", vec![class_entry(patch), member_entry(bar)]),
        ]);

        assert!(relations.get("FooOverride").is_none());
        assert!(relations.is_ignored("FooOverride"));
        let foo = relations.get("Foo").expect("Foo").class();
        let bar = foo.member_named("bar").expect("bar from override");
        assert_eq!(bar.doc, "Bar comment.\n\n**Defined in override FooOverride.**");
        assert_eq!(bar.owner, "Foo");
        assert_eq!(foo.files.len(), 2);
    }

    #[test]
    fn anonymous_overrides_are_named_after_the_file() {
        let mut foo_member = Member::new(TagName::Method, "foo");
        foo_member.doc = "Original.".to_string();
        let mut foo = class_in("Foo", "foo.js");
        foo.members.push(foo_member);
        let mut replacement = Class {
            override_target: Some("Foo".to_string()),
            ..Class::default()
        };
        replacement.members.push(Member::new(TagName::Method, "foo"));

        let (relations, _) = run(vec![
            ("foo.js", vec![class_entry(foo)]),
            ("blah.js", vec![class_entry(replacement)]),
        ]);
        assert!(relations.is_ignored("blah.js"));
        let foo = relations.get("Foo").expect("Foo").class();
        assert_eq!(foo.members[0].doc, "Original.\n\n**Overridden in blah.js.**");
    }

    #[test]
    fn parent_and_child_accessors() {
        let mut parent = class_in("Parent", "a.js");
        let mut cfg = Member::new(TagName::Cfg, "foo");
        cfg.accessor = true;
        cfg.r#type = Some("String".to_string());
        parent.members.push(cfg);

        let mut child = class_in("Child", "b.js");
        child.extends = Some("Parent".to_string());
        let mut getter = Member::new(TagName::Method, "getFoo");
        getter.doc = "Custom getter.".to_string();
        child.members.push(getter);

        let (relations, _) = run(vec![
            ("a.js", vec![class_entry(parent)]),
            ("b.js", vec![class_entry(child)]),
        ]);

        let parent = relations.get("Parent").expect("Parent");
        let names: Vec<_> = parent.class().members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "getFoo", "setFoo"]);

        let child = relations.get("Child").expect("Child");
        let getters = child.find_members(&crate::relations::MemberQuery::named("getFoo"));
        assert_eq!(getters.len(), 1);
        assert_eq!(getters[0].owner, "Child");
        assert_eq!(getters[0].doc, "Custom getter.");
        let setters = child.find_members(&crate::relations::MemberQuery::named("setFoo"));
        assert_eq!(setters[0].owner, "Parent");
    }

    #[test]
    fn events_get_options_param_after_define() {
        let mut foo = class_in("Foo", "a.js");
        foo.ext_define = true;
        let mut event = Member::new(TagName::Event, "click");
        event.params.push(Param::new("btn"));
        foo.members.push(event);

        let (relations, _) = run(vec![("a.js", vec![class_entry(foo)])]);
        let click = &relations.get("Foo").expect("Foo").class().members[0];
        let names: Vec<_> = click.params.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec![Some("btn"), Some("eOpts")]);
        assert_eq!(click.params[0].r#type.as_deref(), Some("Object"));
    }

    #[test]
    fn type_check_is_opt_in() {
        let mut foo = class_in("Foo", "a.js");
        let mut prop = Member::new(TagName::Property, "bar");
        prop.r#type = Some("Blah".to_string());
        foo.members.push(prop);

        let mut warnings = Warnings::new();
        aggregate(
            vec![("a.js".to_string(), vec![class_entry(foo)])],
            AggregateOptions {
                check_types: true,
                ..AggregateOptions::default()
            },
            &mut warnings,
        )
        .expect("aggregation succeeds");
        assert_eq!(warnings.iter().next().map(|w| w.kind), Some(WarningKind::TypeName));
    }

    #[test]
    fn cycles_fail_the_run() {
        let mut a = class_in("A", "a.js");
        a.extends = Some("B".to_string());
        let mut b = class_in("B", "b.js");
        b.extends = Some("A".to_string());

        let mut warnings = Warnings::new();
        let result = aggregate(
            vec![("a.js".to_string(), vec![class_entry(a), class_entry(b)])],
            AggregateOptions::default(),
            &mut warnings,
        );
        assert!(matches!(
            result,
            Err(crate::error::DocsError::CircularInheritance { .. })
        ));
    }
}
