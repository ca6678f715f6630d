//! Classification of the code following a doc-comment.
//!
//! [`classify`] looks at one code fragment and guesses what kind of entity it
//! defines, together with everything the code says about it: name, type,
//! default value, parameters, class relations and auto-detected members.

mod calls;
mod define;
mod returns;

use rustc_hash::FxHashMap;

use crate::ast::{Call, Function, LiteralKind, Node, ObjectLiteral, Property};
use crate::css;
use crate::model::{CodeFacts, InheritDoc, Member, Param, TagName};

pub(crate) use calls::scan_facts;
pub(crate) use returns::returns_this;

/// Namespaces whose `define`, `extend`, `override` and `apply` calls are
/// recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtPatterns {
    namespaces: Vec<String>,
}

impl Default for ExtPatterns {
    fn default() -> Self {
        Self::new(["Ext"])
    }
}

impl ExtPatterns {
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    fn matches(&self, callee: &str, method: &str) -> bool {
        callee
            .strip_suffix(method)
            .and_then(|ns| ns.strip_suffix('.'))
            .is_some_and(|ns| self.namespaces.iter().any(|n| n == ns))
    }

    pub fn is_define(&self, callee: &str) -> bool {
        callee == "Ext.ClassManager.create" || self.matches(callee, "define")
    }

    pub fn is_extend(&self, callee: &str) -> bool {
        self.matches(callee, "extend")
    }

    pub fn is_override(&self, callee: &str) -> bool {
        self.matches(callee, "override")
    }

    pub fn is_apply(&self, callee: &str) -> bool {
        self.matches(callee, "apply")
    }

    pub fn is_empty_fn(&self, name: &str) -> bool {
        self.matches(name, "emptyFn")
    }
}

/// Special sections of a define body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Config,
    CachedConfig,
    EventedConfig,
    Statics,
    InheritableStatics,
}

impl Section {
    fn from_key(key: &str) -> Option<Section> {
        match key {
            "config" => Some(Section::Config),
            "cachedConfig" => Some(Section::CachedConfig),
            "eventedConfig" => Some(Section::EventedConfig),
            "statics" => Some(Section::Statics),
            "inheritableStatics" => Some(Section::InheritableStatics),
            _ => None,
        }
    }

    fn is_config(self) -> bool {
        matches!(
            self,
            Section::Config | Section::CachedConfig | Section::EventedConfig
        )
    }
}

/// Sections of documented define-body properties, keyed by property offset.
pub type SectionHints = FxHashMap<u32, Section>;

/// What the code says about the entity it defines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeRecord {
    /// There was code to look at.
    pub present: bool,
    pub tagname: TagName,
    /// Full name as written, `this.foo` or `My.Class`.
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub default: Option<String>,
    pub params: Vec<Param>,
    /// Every path of the function returns `this`.
    pub chainable: bool,
    pub facts: CodeFacts,

    pub extends: Option<String>,
    pub mixins: Vec<String>,
    pub alternate_class_names: Vec<String>,
    pub aliases: Vec<String>,
    pub requires: Vec<String>,
    pub uses: Vec<String>,
    pub singleton: bool,
    pub override_target: Option<String>,
    pub ext_define: bool,
    /// Auto-detected members of class bodies and enum literals.
    pub members: Vec<Member>,

    /// Flags of a documented property inside a define-body section.
    pub accessor: bool,
    pub evented: bool,
    pub r#static: bool,
    pub inheritable: bool,

    /// Sections of documented properties inside this define body.
    pub hints: Vec<(u32, Section)>,
}

impl CodeRecord {
    fn of(tagname: TagName, name: Option<String>) -> Self {
        Self {
            present: true,
            tagname,
            name,
            ..Self::default()
        }
    }

    /// Name without its namespace: `this.foo` gives `foo`.
    pub fn short_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(|name| name.rsplit('.').next().unwrap_or(name))
    }
}

/// Classify the code following a doc-comment.
pub fn classify(code: Option<&Node>, patterns: &ExtPatterns, hints: &SectionHints) -> CodeRecord {
    let Some(code) = code else {
        return CodeRecord::default();
    };

    match code {
        Node::Function(function) => match &function.name {
            Some(name) => assignment(name, code, patterns),
            None => method(None, function),
        },
        Node::Var { name, init } => match init {
            Some(init) => assignment(name, init, patterns),
            None => CodeRecord::of(TagName::Property, Some(name.clone())),
        },
        Node::Assign { target, value } => assignment(target, value, patterns),
        Node::Property(property) => documented_property(property, patterns, hints),
        Node::Call(call) => call_statement(call, patterns),
        Node::Literal(lit) if lit.kind == LiteralKind::String => {
            CodeRecord::of(TagName::Property, Some(lit.value.clone()))
        }
        Node::Ident(_) | Node::Member(_) => CodeRecord::of(TagName::Property, code.dotted_name()),
        Node::CssVar { name, value } => {
            let mut record = CodeRecord::of(TagName::CssVar, Some(name.clone()));
            let value = css::strip_flags(value);
            record.r#type = css::value_type(value).map(str::to_string);
            record.default = Some(value.to_string());
            record
        }
        Node::CssMixin(mixin) => {
            let mut record = CodeRecord::of(TagName::CssMixin, Some(mixin.name.clone()));
            record.params = mixin
                .params
                .iter()
                .map(|(name, default)| {
                    let mut param = Param::new(name.clone());
                    if let Some(default) = default {
                        let value = css::strip_flags(default);
                        param.r#type = css::value_type(value).map(str::to_string);
                        param.default = Some(value.to_string());
                    }
                    param
                })
                .collect();
            record
        }
        _ => CodeRecord {
            present: true,
            ..CodeRecord::default()
        },
    }
}

/// `name = value`, `var name = value` and named functions.
fn assignment(name: &str, value: &Node, patterns: &ExtPatterns) -> CodeRecord {
    match value {
        Node::Function(function) if is_class_name(name) => {
            let mut record = CodeRecord::of(TagName::Class, Some(name.to_string()));
            record.facts = scan_facts(&function.body);
            record
        }
        Node::Function(function) => method(Some(name), function),
        Node::Call(call) => {
            let callee = call.callee.dotted_name().unwrap_or_default();
            if patterns.is_extend(&callee) {
                let mut record = CodeRecord::of(TagName::Class, Some(name.to_string()));
                record.extends = call.args.first().and_then(class_ref);
                if let Some(body) = call.args.get(1).and_then(Node::as_object) {
                    record.members = object_members(body, patterns);
                }
                record
            } else if patterns.is_define(&callee) {
                call_statement(call, patterns)
            } else {
                value_record(name, value, patterns)
            }
        }
        Node::Object(object) if is_class_name(name) => {
            let mut record = CodeRecord::of(TagName::Class, Some(name.to_string()));
            record.members = object_members(object, patterns);
            record
        }
        _ if value.dotted_name().is_some_and(|n| patterns.is_empty_fn(&n)) => {
            CodeRecord::of(TagName::Method, Some(name.to_string()))
        }
        _ => value_record(name, value, patterns),
    }
}

/// Documented key inside an object literal, possibly a define-body section.
fn documented_property(
    property: &Property,
    patterns: &ExtPatterns,
    hints: &SectionHints,
) -> CodeRecord {
    let mut record = assignment(&property.key, &property.value, patterns);
    match hints.get(&property.offset) {
        Some(section) if section.is_config() => {
            record.tagname = TagName::Cfg;
            record.params.clear();
            record.accessor = true;
            record.evented = *section == Section::EventedConfig;
        }
        Some(section) => {
            record.r#static = true;
            record.inheritable = *section == Section::InheritableStatics;
        }
        None => {}
    }
    record
}

/// Call expression statements: define, override and fireEvent calls.
fn call_statement(call: &Call, patterns: &ExtPatterns) -> CodeRecord {
    let callee = call.callee.dotted_name().unwrap_or_default();

    if patterns.is_define(&callee) {
        let name = call.args.first().and_then(Node::as_str).map(str::to_string);
        return define::define_record(name, call.args.get(1).and_then(Node::as_object), patterns);
    }

    if patterns.is_extend(&callee) {
        let mut record = CodeRecord::of(TagName::Class, None);
        record.extends = call.args.first().and_then(class_ref);
        return record;
    }

    let target = call.args.first().and_then(Node::dotted_name);
    let body = call.args.get(1).and_then(Node::as_object);
    if patterns.is_override(&callee) {
        return override_record(target, body, patterns);
    }
    if patterns.is_apply(&callee) {
        if let Some(target) = target.as_deref().and_then(|t| t.strip_suffix(".prototype")) {
            return override_record(Some(target.to_string()), body, patterns);
        }
    }

    if callee == "Object.defineProperty" {
        let name = call.args.get(1).and_then(Node::as_str).map(str::to_string);
        let mut record = CodeRecord::of(TagName::Property, name);
        if let Some(value) = call
            .args
            .get(2)
            .and_then(Node::as_object)
            .and_then(|descriptor| descriptor.get("value"))
        {
            let (ty, default) = literal_type_and_default(value);
            record.r#type = ty;
            record.default = default;
        }
        return record;
    }

    if callee.ends_with(".fireEvent") || callee == "fireEvent" {
        let name = call.args.first().and_then(Node::as_str).map(str::to_string);
        return CodeRecord::of(TagName::Event, name);
    }

    CodeRecord {
        present: true,
        ..CodeRecord::default()
    }
}

fn override_record(
    target: Option<String>,
    body: Option<&ObjectLiteral>,
    patterns: &ExtPatterns,
) -> CodeRecord {
    let mut record = CodeRecord::of(TagName::Class, None);
    record.override_target = target;
    if let Some(body) = body {
        record.members = object_members(body, patterns);
    }
    record
}

fn method(name: Option<&str>, function: &Function) -> CodeRecord {
    let mut record = CodeRecord::of(TagName::Method, name.map(str::to_string));
    record.params = function.params.iter().map(Param::new).collect();
    record.chainable = returns_this(&function.body);
    record.facts = scan_facts(&function.body);
    record
}

/// Property assigned an arbitrary value.
fn value_record(name: &str, value: &Node, patterns: &ExtPatterns) -> CodeRecord {
    let mut record = CodeRecord::of(TagName::Property, Some(name.to_string()));
    let (ty, default) = literal_type_and_default(value);
    record.r#type = ty;
    record.default = default;
    match value {
        Node::Object(object) => record.members = object_members(object, patterns),
        Node::Array(array) => {
            record.members = array
                .elements
                .iter()
                .enumerate()
                .filter_map(|(idx, element)| {
                    let name = element.as_str()?;
                    let mut member = Member::new(TagName::Property, name);
                    member.r#type = Some("String".to_string());
                    member.autodetected.r#type = true;
                    member.default = element.raw().map(str::to_string);
                    member.doc = array.comment(idx).unwrap_or_default().to_string();
                    member.autodetected.member = true;
                    member.autodetected.tagname = true;
                    Some(member)
                })
                .collect();
        }
        _ => {}
    }
    record
}

/// Type and verbatim default of a value. Calls and values containing
/// functions have no default.
pub(crate) fn literal_type_and_default(value: &Node) -> (Option<String>, Option<String>) {
    let ty = match value {
        Node::Literal(lit) => match lit.kind {
            LiteralKind::Number => Some("Number"),
            LiteralKind::String => Some("String"),
            LiteralKind::Boolean => Some("Boolean"),
            LiteralKind::RegExp => Some("RegExp"),
            LiteralKind::Null => None,
        },
        Node::Array(_) => Some("Array"),
        Node::Object(_) => Some("Object"),
        _ => None,
    };

    let default = match value {
        Node::Literal(_) | Node::Array(_) | Node::Object(_) if !value.contains_function() => {
            value.raw().map(str::to_string)
        }
        _ => None,
    };
    (ty.map(str::to_string), default)
}

/// Undocumented keys of an object literal as auto-detected members.
pub(crate) fn object_members(object: &ObjectLiteral, patterns: &ExtPatterns) -> Vec<Member> {
    object
        .properties
        .iter()
        .filter(|p| !p.documented)
        .map(|p| auto_member(p, patterns))
        .collect()
}

/// Member detected from an undocumented key. Its doc comes from a preceding
/// line comment, otherwise it inherits the parent's doc.
pub(crate) fn auto_member(property: &Property, patterns: &ExtPatterns) -> Member {
    let code = match &property.value {
        Node::Function(function) => method(Some(&property.key), function),
        value => assignment(&property.key, value, patterns),
    };
    let tagname = match code.tagname {
        TagName::Method => TagName::Method,
        _ => TagName::Property,
    };

    let mut member = Member::new(tagname, property.key.clone());
    member.linenr = property.linenr;
    member.autodetected.member = true;
    member.autodetected.tagname = true;
    if tagname == TagName::Method {
        member.params = code.params;
        member.autodetected.params = !member.params.is_empty();
        member.chainable = code.chainable;
        member.autodetected.chainable = code.chainable;
    } else {
        member.r#type = code.r#type;
        member.autodetected.r#type = member.r#type.is_some();
        member.default = code.default;
        member.autodetected.default = member.default.is_some();
    }
    member.code = code.facts;
    match &property.line_comment {
        Some(comment) => member.doc = comment.clone(),
        None => member.inheritdoc = Some(InheritDoc::default()),
    }
    member
}

/// Class reference in code: an identifier chain or a string.
fn class_ref(node: &Node) -> Option<String> {
    node.as_str()
        .map(str::to_string)
        .or_else(|| node.dotted_name())
}

/// Last name segment starts with an uppercase letter.
fn is_class_name(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .and_then(|segment| segment.chars().next())
        .is_some_and(char::is_uppercase)
}
