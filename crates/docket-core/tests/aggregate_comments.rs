//! Aggregation of comment-only sources.

use docket_core::{
    AggregateOptions, ExtPatterns, MemberQuery, Relations, SourceDoc, SourceFile, SourceKind,
    TagName, WarningKind, Warnings, aggregate, extract_entries,
};

fn source(filename: &str, comments: &[&str]) -> SourceFile {
    SourceFile {
        filename: filename.to_string(),
        kind: SourceKind::Js,
        docs: comments
            .iter()
            .enumerate()
            .map(|(idx, comment)| SourceDoc::new(*comment, None, idx as u32 * 10 + 1))
            .collect(),
    }
}

fn run(files: &[SourceFile]) -> (Relations, Warnings) {
    let mut warnings = Warnings::new();
    let patterns = ExtPatterns::default();
    let entries: Vec<_> = files
        .iter()
        .map(|file| {
            (
                file.filename.clone(),
                extract_entries(file, &patterns, &mut warnings),
            )
        })
        .collect();
    let relations = aggregate(entries, AggregateOptions::default(), &mut warnings)
        .expect("aggregation succeeds");
    (relations, warnings)
}

#[test]
fn statics_only_inherit_when_inheritable() {
    let (relations, _) = run(&[source(
        "statics.js",
        &[
            "@class Parent",
            "@method create\n@static\nCreates one.",
            "@method shared\n@static\n@inheritable\nShared helper.",
            "@method run\nRuns.",
            "@class Child\n@extends Parent",
        ],
    )]);

    let child = relations.get("Child").expect("Child");
    let mut statics: Vec<_> = child
        .find_members(&MemberQuery::default().statics(true))
        .iter()
        .map(|m| m.name.clone())
        .collect();
    statics.sort();
    assert_eq!(statics, vec!["shared"]);

    let instance = child.find_members(&MemberQuery::default().statics(false));
    assert_eq!(instance.len(), 1);
    assert_eq!(instance[0].owner, "Parent");
}

#[test]
fn inheritdoc_copies_from_the_named_member() {
    let (relations, warnings) = run(&[
        source(
            "base.js",
            &[
                "@class Base",
                "@method save\nSaves the record.\n@param {Object} options Save options.\n@return {Boolean} True when saved.",
            ],
        ),
        source(
            "store.js",
            &[
                "@class Store",
                "@method sync\n@inheritdoc Base#save",
                "@method load\n@inheritdoc Base#nothing",
            ],
        ),
    ]);

    let store = relations.get("Store").expect("Store").class();
    let sync = store.member_named("sync").expect("sync");
    assert_eq!(sync.doc, "Saves the record.");
    assert_eq!(sync.params.len(), 1);
    assert_eq!(
        sync.r#return.as_ref().and_then(|r| r.r#type.as_deref()),
        Some("Boolean")
    );

    let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::Inheritdoc]);
}

#[test]
fn orphans_and_member_tags() {
    let (relations, _) = run(&[source(
        "orphans.js",
        &[
            "@method foo\n@member MyClass",
            "@method bar\n@member MyClass",
            "@property {Number} count",
        ],
    )]);

    let names = |class: &str| -> Vec<String> {
        relations
            .get(class)
            .expect("class exists")
            .class()
            .members
            .iter()
            .map(|m| m.name.clone())
            .collect()
    };
    assert_eq!(names("MyClass"), vec!["foo", "bar"]);
    assert_eq!(names("global"), vec!["count"]);
}

fn member_names(relations: &Relations, class: &str) -> Vec<String> {
    relations
        .get(class)
        .expect("class exists")
        .class()
        .members
        .iter()
        .map(|m| m.name.clone())
        .collect()
}

#[test]
fn member_tags_join_an_existing_class_in_place() {
    let (relations, _) = run(&[
        source("a.js", &["@class Foo", "@method a"]),
        source("b.js", &["@method b\n@member Foo"]),
        source("c.js", &["@class Foo", "@method c"]),
    ]);
    assert_eq!(member_names(&relations, "Foo"), vec!["a", "b", "c"]);
}

#[test]
fn pending_members_precede_the_class_own_members() {
    let (relations, _) = run(&[
        source("b.js", &["@method b\n@member Foo"]),
        source("a.js", &["@class Foo", "@method a"]),
    ]);
    assert_eq!(member_names(&relations, "Foo"), vec!["b", "a"]);
}

#[test]
fn pending_members_wait_for_alternate_names() {
    let (relations, _) = run(&[
        source("b.js", &["@method b\n@member Old.Foo"]),
        source("a.js", &["@class Foo\n@alternateClassName Old.Foo", "@method a"]),
    ]);
    assert_eq!(member_names(&relations, "Foo"), vec!["b", "a"]);
    assert_eq!(relations.len(), 1);
}

#[test]
fn ignored_duplicate_member_keeps_the_first() {
    let (relations, _) = run(&[source(
        "dup.js",
        &[
            "@class Foo",
            "@method bar\nFirst method docs",
            "@method bar\nSecond method docs\n@ignore",
        ],
    )]);
    let foo = relations.get("Foo").expect("Foo").class();
    assert_eq!(foo.members.len(), 1);
    assert_eq!(foo.members[0].doc, "First method docs");
}

#[test]
fn enum_members_become_typed_properties() {
    let (relations, _) = run(&[source(
        "enum.js",
        &[
            "@enum {String} My.Color\nColors.",
            "@property red\nRed.",
            "@property blue\nBlue.",
        ],
    )]);

    let color = relations.get("My.Color").expect("enum class").class();
    assert!(color.members.iter().all(|m| m.tagname == TagName::Property));
    assert!(
        color
            .members
            .iter()
            .all(|m| m.r#type.as_deref() == Some("String"))
    );
}

#[test]
fn export_lists_overridden_members() {
    let (relations, _) = run(&[source(
        "export.js",
        &[
            "@class Animal",
            "@method speak\nMakes a sound.",
            "@class Dog\n@extends Animal",
            "@method speak\nBarks.",
        ],
    )]);

    let dog = relations.get("Dog").expect("Dog");
    let speak = dog.find_member_refs(&MemberQuery::named("speak"));
    assert_eq!(speak.len(), 1);
    let overridden = relations.overrides(speak[0]);
    assert_eq!(overridden.len(), 1);
    assert_eq!(overridden[0].owner, "Animal");

    let json = relations.export().expect("export serializes");
    let classes = json.as_array().expect("array of classes");
    let dog_json = classes
        .iter()
        .find(|c| c["name"] == "Dog")
        .expect("Dog exported");
    assert_eq!(dog_json["members"][0]["overrides"][0]["owner"], "Animal");
}
