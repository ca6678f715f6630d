//! Tag registry: every `@tag` the tokenizer understands, its canonical kind
//! and the shape of its arguments.

use crate::ast::SourceKind;
use crate::model::InheritDoc;

/// Canonical tag kinds after alias resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Free text: the leading doc, or text following a tag that takes none.
    #[default]
    Doc,
    Class,
    Extends,
    Mixins,
    AlternateClassName,
    Alias,
    Xtype,
    Ftype,
    Ptype,
    Requires,
    Uses,
    Singleton,
    Override,
    Member,
    Method,
    Event,
    Constructor,
    Cfg,
    Property,
    Type,
    Var,
    CssMixin,
    Param,
    Return,
    Throws,
    Fires,
    Private,
    Protected,
    Static,
    Inheritable,
    Abstract,
    Template,
    Preventable,
    Chainable,
    Accessor,
    Evented,
    Hide,
    Ignore,
    Readonly,
    Required,
    Markdown,
    Deprecated,
    Removed,
    Since,
    Localdoc,
    Inheritdoc,
    Enum,
    /// Recognized tag without meaning for the model.
    Ignored,
}

/// How the text after a tag is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// No arguments.
    Flag,
    /// The rest of the line is discarded.
    FlagLine,
    /// One class name, optionally in braces.
    ClassName,
    /// Class names separated by whitespace or commas.
    ClassList,
    /// Optional member name.
    MemberName,
    /// `{type} name` with optional/default syntax, followed by doc.
    Typed,
    /// `{type}` and an optional `return.x` name, followed by doc.
    Return,
    /// `{type}` followed by doc.
    Throws,
    /// `{type}` or a bare type token.
    Type,
    /// Space separated words on one line.
    Words,
    /// Optional version followed by doc.
    Version,
    /// A single version token.
    Since,
    /// Only doc.
    Text,
    /// `Class#static-type-member` reference.
    Inheritdoc,
    /// `{type}` and a name or an `[xtype=widget.*]` pattern.
    Enum,
    /// SCSS mixin name.
    CssMixin,
}

/// Tag spellings, aliases included.
const TAG_TABLE: &[(&str, TagKind)] = &[
    ("class", TagKind::Class),
    ("extends", TagKind::Extends),
    ("extend", TagKind::Extends),
    ("mixins", TagKind::Mixins),
    ("alternateClassName", TagKind::AlternateClassName),
    ("alternateClassNames", TagKind::AlternateClassName),
    ("alias", TagKind::Alias),
    ("xtype", TagKind::Xtype),
    ("ftype", TagKind::Ftype),
    ("ptype", TagKind::Ptype),
    ("requires", TagKind::Requires),
    ("uses", TagKind::Uses),
    ("singleton", TagKind::Singleton),
    ("override", TagKind::Override),
    ("member", TagKind::Member),
    ("method", TagKind::Method),
    ("event", TagKind::Event),
    ("constructor", TagKind::Constructor),
    ("cfg", TagKind::Cfg),
    ("property", TagKind::Property),
    ("type", TagKind::Type),
    ("var", TagKind::Var),
    ("param", TagKind::Param),
    ("params", TagKind::Param),
    ("return", TagKind::Return),
    ("returns", TagKind::Return),
    ("throws", TagKind::Throws),
    ("fires", TagKind::Fires),
    ("private", TagKind::Private),
    ("protected", TagKind::Protected),
    ("static", TagKind::Static),
    ("inheritable", TagKind::Inheritable),
    ("abstract", TagKind::Abstract),
    ("template", TagKind::Template),
    ("preventable", TagKind::Preventable),
    ("chainable", TagKind::Chainable),
    ("accessor", TagKind::Accessor),
    ("evented", TagKind::Evented),
    ("hide", TagKind::Hide),
    ("ignore", TagKind::Ignore),
    ("readonly", TagKind::Readonly),
    ("required", TagKind::Required),
    ("markdown", TagKind::Markdown),
    ("deprecated", TagKind::Deprecated),
    ("removed", TagKind::Removed),
    ("since", TagKind::Since),
    ("localdoc", TagKind::Localdoc),
    ("inheritdoc", TagKind::Inheritdoc),
    ("inheritDoc", TagKind::Inheritdoc),
    ("enum", TagKind::Enum),
    ("todo", TagKind::Ignored),
    ("TODO", TagKind::Ignored),
    ("Todo", TagKind::Ignored),
    ("cancelable", TagKind::Ignored),
    ("version", TagKind::Ignored),
    ("bindable", TagKind::Ignored),
    ("locale", TagKind::Ignored),
    ("Locale", TagKind::Ignored),
    ("disable", TagKind::Ignored),
    ("cmd-auto-dependency", TagKind::Ignored),
    ("cmd", TagKind::Ignored),
    ("this", TagKind::Ignored),
    ("copyright", TagKind::Ignored),
    ("license", TagKind::Ignored),
    ("date", TagKind::Ignored),
    ("controllable", TagKind::Ignored),
    ("declarativeHandler", TagKind::Ignored),
];

impl TagKind {
    /// Resolve a tag spelling. `@mixin` means a CSS mixin in SCSS and the
    /// `@mixins` list elsewhere.
    pub fn lookup(name: &str, source: SourceKind) -> Option<TagKind> {
        if name == "mixin" {
            return Some(match source {
                SourceKind::Scss => TagKind::CssMixin,
                SourceKind::Js => TagKind::Mixins,
            });
        }
        TAG_TABLE
            .iter()
            .find(|(spelling, _)| *spelling == name)
            .map(|(_, kind)| *kind)
    }

    pub(crate) fn shape(self) -> Shape {
        match self {
            TagKind::Doc
            | TagKind::Singleton
            | TagKind::Constructor
            | TagKind::Private
            | TagKind::Protected
            | TagKind::Static
            | TagKind::Inheritable
            | TagKind::Abstract
            | TagKind::Template
            | TagKind::Chainable
            | TagKind::Accessor
            | TagKind::Evented
            | TagKind::Hide
            | TagKind::Ignore
            | TagKind::Readonly
            | TagKind::Required
            | TagKind::Markdown => Shape::Flag,
            TagKind::Preventable | TagKind::Ignored => Shape::FlagLine,
            TagKind::Class | TagKind::Extends | TagKind::Override | TagKind::Member => {
                Shape::ClassName
            }
            TagKind::Mixins
            | TagKind::AlternateClassName
            | TagKind::Alias
            | TagKind::Xtype
            | TagKind::Ftype
            | TagKind::Ptype
            | TagKind::Requires
            | TagKind::Uses => Shape::ClassList,
            TagKind::Method | TagKind::Event => Shape::MemberName,
            TagKind::Cfg | TagKind::Property | TagKind::Var | TagKind::Param => Shape::Typed,
            TagKind::Return => Shape::Return,
            TagKind::Throws => Shape::Throws,
            TagKind::Type => Shape::Type,
            TagKind::Fires => Shape::Words,
            TagKind::Deprecated | TagKind::Removed => Shape::Version,
            TagKind::Since => Shape::Since,
            TagKind::Localdoc => Shape::Text,
            TagKind::Inheritdoc => Shape::Inheritdoc,
            TagKind::Enum => Shape::Enum,
            TagKind::CssMixin => Shape::CssMixin,
        }
    }

    /// Tags whose trailing text is their own doc rather than the entity's.
    pub(crate) fn captures_doc(self) -> bool {
        matches!(
            self.shape(),
            Shape::Typed | Shape::Return | Shape::Throws | Shape::Version | Shape::Text
        )
    }

    /// Alias namespace implied by `@xtype`-style tags.
    pub(crate) fn alias_prefix(self) -> Option<&'static str> {
        match self {
            TagKind::Xtype => Some("widget."),
            TagKind::Ftype => Some("feature."),
            TagKind::Ptype => Some("plugin."),
            _ => None,
        }
    }
}

/// One tag of a doc-comment with everything its shape can carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTag {
    pub kind: TagKind,
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub default: Option<String>,
    pub optional: bool,
    pub required: bool,
    /// Class lists and event names.
    pub names: Vec<String>,
    pub version: Option<String>,
    pub inheritdoc: Option<InheritDoc>,
    pub doc: String,
}

impl RawTag {
    pub fn new(kind: TagKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
