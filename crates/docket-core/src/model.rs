use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a documented entity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TagName {
    Class,
    Method,
    Event,
    Cfg,
    /// Code that is neither a function nor a class is a property.
    #[default]
    Property,
    CssVar,
    CssMixin,
}

impl TagName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagName::Class => "class",
            TagName::Method => "method",
            TagName::Event => "event",
            TagName::Cfg => "cfg",
            TagName::Property => "property",
            TagName::CssVar => "css_var",
            TagName::CssMixin => "css_mixin",
        }
    }

    /// Parse the tagname part of a member id such as `cfg` or `css_var`.
    pub fn from_member_kind(name: &str) -> Option<TagName> {
        match name {
            "method" => Some(TagName::Method),
            "event" => Some(TagName::Event),
            "cfg" => Some(TagName::Cfg),
            "property" => Some(TagName::Property),
            "css_var" => Some(TagName::CssVar),
            "css_mixin" => Some(TagName::CssMixin),
            _ => None,
        }
    }

    /// Member kinds that carry a `type` and `default`.
    pub fn is_value(&self) -> bool {
        matches!(self, TagName::Cfg | TagName::Property | TagName::CssVar)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location that contributed to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub filename: String,
    pub linenr: u32,
}

impl FileRef {
    pub fn new(filename: impl Into<String>, linenr: u32) -> Self {
        Self {
            filename: filename.into(),
            linenr,
        }
    }
}

/// Payload of `@deprecated` and `@removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub text: String,
}

/// A parameter, subproperty, or event argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    pub doc: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<Param>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub ext4_auto_param: bool,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.r#type = Some(ty.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// Documented return value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnDoc {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<Param>,
}

/// Documented exception.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Throws {
    #[serde(rename = "type")]
    pub r#type: String,
    pub doc: String,
}

/// `@inheritdoc` reference. All fields empty means "same-named member of the parent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<TagName>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub r#static: bool,
}

/// Marks fields whose value was inferred from code rather than written in a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autodetected {
    /// The whole member came from code without a doc-comment.
    pub member: bool,
    pub tagname: bool,
    pub name: bool,
    pub r#type: bool,
    pub default: bool,
    pub params: bool,
    pub chainable: bool,
    pub fires: bool,
}

impl Autodetected {
    pub fn any(&self) -> bool {
        self.member
            || self.tagname
            || self.name
            || self.r#type
            || self.default
            || self.params
            || self.chainable
            || self.fires
    }
}

/// Facts gathered from a function body, consumed by the fires pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeFacts {
    /// Events fired directly in the body.
    pub fires: Vec<String>,
    /// Same-instance method calls made in the body.
    pub method_calls: Vec<String>,
}

/// A documented class member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub tagname: TagName,
    pub name: String,
    pub id: String,
    pub owner: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub r#return: Option<ReturnDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub throws: Vec<Throws>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<Param>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fires: Vec<String>,

    pub private: bool,
    pub protected: bool,
    pub r#static: bool,
    pub inheritable: bool,
    pub r#abstract: bool,
    pub required: bool,
    pub optional: bool,
    pub chainable: bool,
    pub accessor: bool,
    pub evented: bool,
    pub hide: bool,
    pub template: bool,
    pub preventable: bool,
    pub readonly: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<Deprecation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localdoc: Option<String>,

    pub autodetected: Autodetected,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritdoc: Option<InheritDoc>,
    pub files: Vec<FileRef>,
    pub linenr: u32,

    #[serde(skip)]
    pub code: CodeFacts,
    /// Set when `@fires` was written explicitly.
    #[serde(skip)]
    pub explicit_fires: bool,
}

impl Member {
    pub fn new(tagname: TagName, name: impl Into<String>) -> Self {
        let mut member = Self {
            tagname,
            name: name.into(),
            id: String::new(),
            owner: String::new(),
            r#type: None,
            default: None,
            doc: String::new(),
            params: Vec::new(),
            r#return: None,
            throws: Vec::new(),
            properties: Vec::new(),
            fires: Vec::new(),
            private: false,
            protected: false,
            r#static: false,
            inheritable: false,
            r#abstract: false,
            required: false,
            optional: false,
            chainable: false,
            accessor: false,
            evented: false,
            hide: false,
            template: false,
            preventable: false,
            readonly: false,
            deprecated: None,
            removed: None,
            since: None,
            localdoc: None,
            autodetected: Autodetected::default(),
            inheritdoc: None,
            files: Vec::new(),
            linenr: 0,
            code: CodeFacts::default(),
            explicit_fires: false,
        };
        member.refresh_id();
        member
    }

    /// Id derived from the current identity fields.
    pub fn compute_id(&self) -> String {
        let prefix = if self.r#static { "static-" } else { "" };
        format!("{}{}-{}", prefix, self.tagname, self.name)
    }

    /// Recompute `id` after `name`, `tagname` or `static` changed.
    pub fn refresh_id(&mut self) {
        self.id = self.compute_id();
    }

    /// Statics that do not cross inheritance boundaries.
    pub fn is_local_static(&self) -> bool {
        self.r#static && !self.inheritable
    }
}

/// Enum description attached to a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Alias pattern such as `widget.*` for alias-based enums.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub doc_only: bool,
}

/// A documented class: many doc-comments can contribute to one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub mixins: Vec<String>,
    #[serde(rename = "alternateClassNames")]
    pub alternate_class_names: Vec<String>,
    pub aliases: Vec<String>,
    pub requires: Vec<String>,
    pub uses: Vec<String>,
    pub singleton: bool,
    pub private: bool,
    pub protected: bool,
    pub hide: bool,
    pub doc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localdoc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_target: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_info: Option<EnumInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritdoc: Option<InheritDoc>,
    /// Defined through a `define` call.
    pub ext_define: bool,
    pub files: Vec<FileRef>,
    pub members: Vec<Member>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Local member with the given id.
    pub fn member_by_id(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// First local member with the given name.
    pub fn member_named(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_named_mut(&mut self, name: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.name == name)
    }

    /// Whether `name` is this class's name or one of its alternate names.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.alternate_class_names.iter().any(|n| n == name)
    }
}

/// Result of merging one doc-comment with its code.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Class(Class),
    Member(Member),
}

/// An entity plus the hints the aggregator needs to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocEntry {
    pub entity: Entity,
    /// Target class from `@member`.
    pub member_of: Option<String>,
    /// `@ignore` was given.
    pub ignore: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_ids_follow_scheme() {
        let mut member = Member::new(TagName::Method, "foo");
        assert_eq!(member.id, "method-foo");

        member.r#static = true;
        assert_eq!(member.id, "method-foo", "id is stale until refreshed");
        member.refresh_id();
        assert_eq!(member.id, "static-method-foo");

        assert_eq!(Member::new(TagName::CssVar, "$x").id, "css_var-$x");
    }

    #[test]
    fn class_answers_to_alternate_names() {
        let mut class = Class::new("Person");
        class.alternate_class_names.push("Foo".to_string());
        assert!(class.answers_to("Person"));
        assert!(class.answers_to("Foo"));
        assert!(!class.answers_to("Bar"));
    }
}
