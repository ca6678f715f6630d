//! Getter, setter and change-event members for `@accessor` configs.

use crate::model::{Class, Member, Param, ReturnDoc, TagName};

/// Add accessors for every accessor cfg of the class, unless a local member
/// with the same name already exists.
pub(crate) fn add_accessors(class: &mut Class) {
    let mut added: Vec<Member> = Vec::new();

    for cfg in class
        .members
        .iter()
        .filter(|m| m.tagname == TagName::Cfg && m.accessor)
    {
        let capitalized = capitalize(&cfg.name);
        let getter = format!("get{}", capitalized);
        let setter = format!("set{}", capitalized);

        if !exists(class, &added, &getter) {
            let mut member = derived(cfg, TagName::Method, getter);
            member.doc = format!("Returns the value of {{@link #cfg-{}}}.", cfg.name);
            member.r#return = Some(ReturnDoc {
                r#type: cfg.r#type.clone(),
                ..ReturnDoc::default()
            });
            added.push(member);
        }

        if !exists(class, &added, &setter) {
            let mut member = derived(cfg, TagName::Method, setter.clone());
            member.doc = format!("Sets the value of {{@link #cfg-{}}}.", cfg.name);
            member.params = vec![Param {
                r#type: cfg.r#type.clone(),
                ..Param::new(cfg.name.clone()).with_doc("The new value.")
            }];
            added.push(member);
        }

        if cfg.evented {
            let event = format!("{}change", cfg.name.to_lowercase());
            if !exists(class, &added, &event) {
                let mut member = derived(cfg, TagName::Event, event);
                member.doc = format!(
                    "Fires when the {{@link #cfg-{}}} configuration is changed by {{@link #method-{}}}.",
                    cfg.name, setter
                );
                member.params = vec![
                    Param::new("this")
                        .with_type(class.name.clone())
                        .with_doc(format!("The {} instance.", class.name)),
                    Param {
                        r#type: cfg.r#type.clone(),
                        ..Param::new("value").with_doc("The new value being set.")
                    },
                    Param {
                        r#type: cfg.r#type.clone(),
                        ..Param::new("oldValue").with_doc("The existing value.")
                    },
                ];
                added.push(member);
            }
        }
    }

    class.members.extend(added);
}

fn exists(class: &Class, added: &[Member], name: &str) -> bool {
    class.member_named(name).is_some() || added.iter().any(|m| m.name == name)
}

/// New member carrying over the visibility of its cfg.
fn derived(cfg: &Member, tagname: TagName, name: String) -> Member {
    let mut member = Member::new(tagname, name);
    member.owner = cfg.owner.clone();
    member.private = cfg.private;
    member.protected = cfg.protected;
    member.hide = cfg.hide;
    member.deprecated = cfg.deprecated.clone();
    member.files = cfg.files.clone();
    member.linenr = cfg.linenr;
    member
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
