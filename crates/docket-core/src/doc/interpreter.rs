//! Interpretation of tokenized tags into a [`DocRecord`].

use super::subproperties::nest;
use super::tagname::Detected;
use super::tags::{RawTag, TagKind};
use crate::model::{
    Deprecation, EnumInfo, FileRef, InheritDoc, Param, ReturnDoc, TagName, Throws,
};
use crate::warnings::{WarningKind, Warnings};

/// Everything one doc-comment (or one group of a class comment) says about
/// its entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocRecord {
    pub tagname: TagName,
    /// The comment decided the tagname.
    pub explicit_tagname: bool,
    pub name: Option<String>,
    pub doc: String,
    pub r#type: Option<String>,
    pub default: Option<String>,
    pub optional: bool,
    pub required: bool,
    pub params: Vec<Param>,
    pub r#return: Option<ReturnDoc>,
    pub throws: Vec<Throws>,
    pub properties: Vec<Param>,
    pub fires: Vec<String>,
    pub explicit_fires: bool,

    pub private: bool,
    pub protected: bool,
    pub r#static: bool,
    pub inheritable: bool,
    pub r#abstract: bool,
    pub template: bool,
    pub preventable: bool,
    pub chainable: bool,
    pub accessor: bool,
    pub evented: bool,
    pub hide: bool,
    pub ignore: bool,
    pub readonly: bool,
    pub singleton: bool,
    pub constructor: bool,

    pub deprecated: Option<Deprecation>,
    pub removed: Option<Deprecation>,
    pub since: Option<String>,
    pub localdoc: Option<String>,
    pub inheritdoc: Option<InheritDoc>,

    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub alternate_class_names: Vec<String>,
    pub aliases: Vec<String>,
    pub requires: Vec<String>,
    pub uses: Vec<String>,
    pub override_target: Option<String>,
    pub member_of: Option<String>,
    pub enum_info: Option<EnumInfo>,
}

/// Interpret the tags of one entity.
pub fn interpret(
    tags: &[RawTag],
    detected: Detected,
    warnings: &mut Warnings,
    file: &FileRef,
) -> DocRecord {
    let mut record = DocRecord {
        tagname: detected.tagname,
        explicit_tagname: detected.explicit,
        ..DocRecord::default()
    };

    let last = |kind: TagKind| tags.iter().rev().find(|t| t.kind == kind);
    let has = |kind: TagKind| tags.iter().any(|t| t.kind == kind);
    let all = |kind: TagKind| tags.iter().filter(move |t| t.kind == kind);

    record.doc = all(TagKind::Doc)
        .map(|t| t.doc.as_str())
        .filter(|doc| !doc.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    record.private = has(TagKind::Private);
    record.protected = has(TagKind::Protected);
    record.r#static = has(TagKind::Static);
    record.inheritable = has(TagKind::Inheritable);
    record.r#abstract = has(TagKind::Abstract);
    record.template = has(TagKind::Template);
    record.preventable = has(TagKind::Preventable);
    record.chainable = has(TagKind::Chainable);
    record.accessor = has(TagKind::Accessor);
    record.evented = has(TagKind::Evented);
    record.hide = has(TagKind::Hide);
    record.ignore = has(TagKind::Ignore);
    record.readonly = has(TagKind::Readonly);
    record.singleton = has(TagKind::Singleton);
    record.required = has(TagKind::Required);

    record.deprecated = last(TagKind::Deprecated).map(deprecation);
    record.removed = last(TagKind::Removed).map(deprecation);
    record.since = last(TagKind::Since).and_then(|t| t.version.clone());
    record.localdoc = last(TagKind::Localdoc).map(|t| t.doc.clone());
    record.inheritdoc = last(TagKind::Inheritdoc).and_then(|t| t.inheritdoc.clone());
    record.member_of = last(TagKind::Member).and_then(|t| t.name.clone());

    record.fires = all(TagKind::Fires).flat_map(|t| t.names.iter().cloned()).collect();
    record.explicit_fires = has(TagKind::Fires);

    record.params = nest_warning(
        all(TagKind::Param).map(param).collect(),
        warnings,
        file,
    );
    record.r#return = return_doc(tags, warnings, file);
    record.throws = all(TagKind::Throws)
        .map(|t| Throws {
            r#type: t.r#type.clone().unwrap_or_else(|| "Object".to_string()),
            doc: t.doc.clone(),
        })
        .collect();

    match record.tagname {
        TagName::Class => class_fields(&mut record, tags),
        TagName::Method => {
            record.constructor = has(TagKind::Constructor);
            record.name = last(TagKind::Method)
                .and_then(|t| t.name.clone())
                .or_else(|| record.constructor.then(|| "constructor".to_string()));
            if record.name.as_deref() == Some("constructor") {
                record.constructor = true;
            }
        }
        TagName::Event => record.name = last(TagKind::Event).and_then(|t| t.name.clone()),
        TagName::CssMixin => record.name = last(TagKind::CssMixin).and_then(|t| t.name.clone()),
        TagName::Cfg | TagName::Property | TagName::CssVar => {
            let kinds: &[TagKind] = match record.tagname {
                TagName::Cfg => &[TagKind::Cfg],
                TagName::CssVar => &[TagKind::Var],
                _ => &[TagKind::Property],
            };
            value_fields(&mut record, tags, kinds, warnings, file);
        }
    }

    if record.tagname != TagName::Class {
        // Overrides only mean something for classes.
        record.override_target = None;
    }
    record.name = record.name.take().filter(|n| !n.is_empty());
    record
}

fn deprecation(tag: &RawTag) -> Deprecation {
    Deprecation {
        version: tag.version.clone(),
        text: tag.doc.clone(),
    }
}

fn param(tag: &RawTag) -> Param {
    Param {
        name: tag.name.clone(),
        r#type: tag.r#type.clone(),
        doc: tag.doc.clone(),
        optional: tag.optional,
        default: tag.default.clone(),
        ..Param::default()
    }
}

fn nest_warning(items: Vec<Param>, warnings: &mut Warnings, file: &FileRef) -> Vec<Param> {
    let nested = nest(items);
    for orphan in nested.orphans {
        warnings.warn(
            WarningKind::Member,
            format!("Subproperty '{}' without parent", orphan),
            Some(file),
        );
    }
    nested.items
}

/// `@return` with its `return.x` subproperties.
fn return_doc(tags: &[RawTag], warnings: &mut Warnings, file: &FileRef) -> Option<ReturnDoc> {
    let returns: Vec<&RawTag> = tags.iter().filter(|t| t.kind == TagKind::Return).collect();
    let main = returns.iter().rev().find(|t| t.name.is_none())?;

    let mut items = vec![Param {
        name: Some("return".to_string()),
        ..Param::default()
    }];
    items.extend(returns.iter().filter(|t| t.name.is_some()).map(|t| param(t)));
    let properties = nest_warning(items, warnings, file)
        .into_iter()
        .find(|p| p.name.as_deref() == Some("return"))
        .map(|p| p.properties)
        .unwrap_or_default();

    Some(ReturnDoc {
        r#type: main.r#type.clone(),
        doc: main.doc.clone(),
        properties,
    })
}

fn class_fields(record: &mut DocRecord, tags: &[RawTag]) {
    let names_of = |kind: TagKind| -> Vec<String> {
        tags.iter()
            .filter(|t| t.kind == kind)
            .flat_map(|t| t.names.iter().cloned())
            .collect()
    };

    let last_name = |kind: TagKind| {
        tags.iter()
            .rev()
            .find(|t| t.kind == kind)
            .and_then(|t| t.name.clone())
    };

    record.name = last_name(TagKind::Class);
    record.extends = last_name(TagKind::Extends);
    record.override_target = last_name(TagKind::Override);
    record.mixins = names_of(TagKind::Mixins);
    record.alternate_class_names = names_of(TagKind::AlternateClassName);
    record.requires = names_of(TagKind::Requires);
    record.uses = names_of(TagKind::Uses);
    record.aliases = names_of(TagKind::Alias);
    for tag in tags {
        if let Some(prefix) = tag.kind.alias_prefix() {
            record
                .aliases
                .extend(tag.names.iter().map(|name| format!("{}{}", prefix, name)));
        }
    }

    if let Some(tag) = tags.iter().rev().find(|t| t.kind == TagKind::Enum) {
        // `@enum [xtype=widget.*]` names the enum after its key.
        if record.name.is_none() {
            record.name = tag.name.clone();
        }
        record.enum_info = Some(EnumInfo {
            r#type: tag.r#type.clone(),
            default: tag.default.clone(),
            doc_only: tag.default.is_some(),
        });
    }
}

/// Name, type and subproperties of cfgs, properties and CSS variables.
fn value_fields(
    record: &mut DocRecord,
    tags: &[RawTag],
    kinds: &[TagKind],
    warnings: &mut Warnings,
    file: &FileRef,
) {
    let value_tags: Vec<&RawTag> = tags.iter().filter(|t| kinds.contains(&t.kind)).collect();
    let mut items = nest_warning(
        value_tags.iter().map(|t| param(t)).collect(),
        warnings,
        file,
    );

    let type_tag = tags
        .iter()
        .rev()
        .find(|t| t.kind == TagKind::Type)
        .and_then(|t| t.r#type.clone());

    if items.is_empty() {
        record.r#type = type_tag;
        return;
    }
    let main = items.remove(0);
    let main_tag = value_tags
        .iter()
        .find(|t| t.name == main.name)
        .copied();

    for extra in &items {
        warnings.warn(
            WarningKind::Member,
            format!(
                "Ignoring '{}' documented next to '{}'",
                extra.name.as_deref().unwrap_or(""),
                main.name.as_deref().unwrap_or("")
            ),
            Some(file),
        );
    }

    record.name = main.name;
    record.r#type = main.r#type.or(type_tag);
    record.default = main.default;
    record.optional = main.optional;
    record.properties = main.properties;
    if let Some(tag) = main_tag {
        record.required |= tag.required;
        if !tag.doc.is_empty() {
            record.doc = if record.doc.is_empty() {
                tag.doc.clone()
            } else {
                format!("{}\n{}", tag.doc, record.doc)
            };
        }
    }
}
