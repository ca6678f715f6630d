//! Type expression checking.
//!
//! Types are written as alternatives (`Number/String`, `Number|String`) of
//! class names, arrays (`String[]`), varargs (`Number...`, `...Number`),
//! nullability markers, parenthesized unions, type arguments
//! (`Array.<String>`), function types, record types and literals.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::doc::scanner::{Scanner, is_ident_char};
use crate::model::{FileRef, Member, Param};
use crate::relations::Relations;
use crate::warnings::{WarningKind, Warnings};

/// Why a type expression could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid type syntax")]
    Syntax,
    #[error("unknown type {0}")]
    UnknownName(String),
}

/// Turns a type expression into display text.
pub trait TypeRenderer {
    fn render(&self, ty: &str) -> Result<String, TypeError>;
}

/// Lowercase primitives accepted whatever the registry contains.
const PRIMITIVES: &[&str] = &["boolean", "number", "string", "null", "undefined", "void"];

/// Standard JavaScript and DOM types.
const STANDARD_TYPES: &[&str] = &[
    "Object", "String", "Number", "Boolean", "Function", "Array", "Date", "RegExp", "Error",
    "Arguments", "Mixed", "Symbol", "Promise", "Map", "Set", "WeakMap", "WeakSet", "JSON",
    "Math", "NaN", "Infinity", "HTMLElement", "HTMLDocument", "Element", "Node", "NodeList",
    "TextNode", "Event", "Window", "Document", "XMLElement", "CSSStyleSheet", "CSSStyleRule",
    "Class", "Ext",
    // SCSS value types
    "number", "string", "color", "list", "map", "percentage", "length",
];

/// Renderer knowing the registry's classes and the standard types. Output is
/// the source text with HTML special characters escaped.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTypeRenderer {
    known: FxHashSet<String>,
}

impl BuiltinTypeRenderer {
    pub fn new<I, S>(class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: FxHashSet<String> = STANDARD_TYPES.iter().map(|s| s.to_string()).collect();
        known.extend(class_names.into_iter().map(Into::into));
        Self { known }
    }

    /// Renderer for every class and alternate name in the registry.
    pub fn from_relations(relations: &Relations) -> Self {
        Self::new(relations.classes().iter().flat_map(|class| {
            std::iter::once(class.name.clone()).chain(class.alternate_class_names.iter().cloned())
        }))
    }

    /// Renderer knowing exactly the given names plus the primitives.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: names.into_iter().map(Into::into).collect(),
        }
    }

    fn is_known(&self, name: &str) -> bool {
        PRIMITIVES.contains(&name) || self.known.contains(name)
    }
}

impl TypeRenderer for BuiltinTypeRenderer {
    fn render(&self, ty: &str) -> Result<String, TypeError> {
        let mut parser = TypeParser {
            s: Scanner::new(ty),
            renderer: self,
            unknown: None,
        };
        parser.alteration()?;
        parser.s.skip_white();
        if !parser.s.eof() {
            return Err(TypeError::Syntax);
        }
        match parser.unknown {
            Some(name) => Err(TypeError::UnknownName(name)),
            None => Ok(escape(ty)),
        }
    }
}

struct TypeParser<'a, 'r> {
    s: Scanner<'a>,
    renderer: &'r BuiltinTypeRenderer,
    /// First unknown name seen.
    unknown: Option<String>,
}

type Parsed = Result<(), TypeError>;

impl TypeParser<'_, '_> {
    fn eat(&mut self, token: &str) -> bool {
        self.s.skip_white();
        self.s.eat(token)
    }

    fn expect(&mut self, token: &str) -> Parsed {
        if self.eat(token) {
            Ok(())
        } else {
            Err(TypeError::Syntax)
        }
    }

    /// `<varargs> ( ("/" | "|") <varargs> )*`
    fn alteration(&mut self) -> Parsed {
        self.varargs()?;
        while self.eat("/") || self.eat("|") {
            self.varargs()?;
        }
        Ok(())
    }

    /// `"..."? <nullable>` or `<nullable> "..."?`, never both.
    fn varargs(&mut self) -> Parsed {
        if self.eat("...") {
            return self.nullable();
        }
        self.nullable()?;
        self.eat("...");
        Ok(())
    }

    fn nullable(&mut self) -> Parsed {
        if !self.eat("?") {
            self.eat("!");
        }
        self.array()
    }

    fn array(&mut self) -> Parsed {
        self.base()?;
        while self.eat("[]") {}
        Ok(())
    }

    fn base(&mut self) -> Parsed {
        self.s.skip_white();
        match self.s.peek() {
            Some('*') => {
                self.s.bump();
                Ok(())
            }
            Some('(') => {
                self.s.bump();
                self.alteration()?;
                self.expect(")")
            }
            Some('{') => self.record(),
            Some('"' | '\'') => self.string_literal(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number_literal(),
            _ if self.at_function() => {
                self.s.eat("function");
                self.function()
            }
            _ => self.type_name(),
        }
    }

    fn at_function(&self) -> bool {
        self.s
            .rest()
            .strip_prefix("function")
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    }

    fn type_name(&mut self) -> Parsed {
        let name = self.s.ident_chain().ok_or(TypeError::Syntax)?;
        if !self.renderer.is_known(name) && self.unknown.is_none() {
            self.unknown = Some(name.to_string());
        }
        if self.eat(".<") || self.eat("<") {
            self.alteration()?;
            while self.eat(",") {
                self.alteration()?;
            }
            self.expect(">")?;
        }
        Ok(())
    }

    /// `function(args):ret` with `this:` and `new:` pseudo-arguments.
    fn function(&mut self) -> Parsed {
        self.expect("(")?;
        if !self.eat(")") {
            loop {
                self.function_argument()?;
                if !self.eat(",") {
                    break;
                }
            }
            self.expect(")")?;
        }
        if self.eat(":") {
            self.alteration()?;
        }
        Ok(())
    }

    fn function_argument(&mut self) -> Parsed {
        if self.eat("this") || self.eat("new") {
            self.expect(":")?;
            return self.alteration();
        }
        if self.eat("...") {
            if self.eat("[") {
                self.alteration()?;
                return self.expect("]");
            }
            return self.nullable();
        }
        self.varargs()?;
        self.eat("=");
        Ok(())
    }

    /// `{name, name: type, ...}`
    fn record(&mut self) -> Parsed {
        self.expect("{")?;
        loop {
            self.s.skip_white();
            self.s.ident().ok_or(TypeError::Syntax)?;
            if self.eat(":") {
                self.alteration()?;
            }
            if !self.eat(",") {
                break;
            }
        }
        self.expect("}")
    }

    fn string_literal(&mut self) -> Parsed {
        let quote = self.s.bump().ok_or(TypeError::Syntax)?;
        while let Some(c) = self.s.bump() {
            match c {
                '\\' => {
                    self.s.bump();
                }
                c if c == quote => return Ok(()),
                _ => {}
            }
        }
        Err(TypeError::Syntax)
    }

    fn number_literal(&mut self) -> Parsed {
        self.s.eat("-");
        if self.s.take_while(|c| c.is_ascii_digit()).is_empty() {
            return Err(TypeError::Syntax);
        }
        if self.s.peek() == Some('.') && self.s.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.s.bump();
            self.s.take_while(|c| c.is_ascii_digit());
        }
        if self.s.peek().is_some_and(is_ident_char) {
            return Err(TypeError::Syntax);
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a type, reporting failures as warnings and falling back to the
/// escaped source text.
pub fn format_type(
    renderer: &dyn TypeRenderer,
    ty: &str,
    warnings: &mut Warnings,
    file: Option<&FileRef>,
) -> String {
    match renderer.render(ty) {
        Ok(rendered) => rendered,
        Err(TypeError::Syntax) => {
            warnings.warn(
                WarningKind::TypeSyntax,
                format!("Incorrect type syntax {}", ty),
                file,
            );
            escape(ty)
        }
        Err(TypeError::UnknownName(name)) => {
            warnings.warn(
                WarningKind::TypeName,
                format!("Unknown type {} in {}", name, ty),
                file,
            );
            escape(ty)
        }
    }
}

/// Check every type written on the registry's members.
pub fn check_types(relations: &Relations, renderer: &dyn TypeRenderer, warnings: &mut Warnings) {
    for class in relations.classes() {
        for member in &class.members {
            check_member(member, renderer, warnings);
        }
    }
}

fn check_member(member: &Member, renderer: &dyn TypeRenderer, warnings: &mut Warnings) {
    let file = member.files.first();
    if let Some(ty) = &member.r#type {
        format_type(renderer, ty, warnings, file);
    }
    check_params(&member.params, renderer, warnings, file);
    check_params(&member.properties, renderer, warnings, file);
    if let Some(ret) = &member.r#return {
        if let Some(ty) = &ret.r#type {
            format_type(renderer, ty, warnings, file);
        }
        check_params(&ret.properties, renderer, warnings, file);
    }
    for throws in &member.throws {
        format_type(renderer, &throws.r#type, warnings, file);
    }
}

fn check_params(
    params: &[Param],
    renderer: &dyn TypeRenderer,
    warnings: &mut Warnings,
    file: Option<&FileRef>,
) {
    for param in params {
        if let Some(ty) = &param.r#type {
            format_type(renderer, ty, warnings, file);
        }
        check_params(&param.properties, renderer, warnings, file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parses(ty: &str) -> bool {
        let renderer = BuiltinTypeRenderer::with_names([
            "String",
            "Number",
            "RegExp",
            "Array",
            "Ext.form.Panel",
            "Ext.Element",
            "Ext.fx2.Anim",
        ]);
        renderer.render(ty).is_ok()
    }

    #[test]
    fn literals_and_names() {
        for ty in [
            "'foo'",
            "\"blah \\\"blah\"",
            "42",
            "-6",
            "3.14",
            "String",
            "Ext.form.Panel",
            "Ext.fx2.Anim",
            "String[][]",
            "'foo'/'bar'/32/4",
            "Number/Ext.form.Panel/String[]/RegExp/Ext.Element",
        ] {
            assert!(parses(ty), "{ty} should parse");
        }
    }

    #[test]
    fn varargs_and_nullability() {
        for ty in ["Number...", "Ext.form.Panel[]...", "Number.../String", "...String", "?String", "!String", "*"] {
            assert!(parses(ty), "{ty} should parse");
        }
        for ty in ["...", "...*...", "?!String", "!?String", "String="] {
            assert!(!parses(ty), "{ty} should not parse");
        }
    }

    #[test]
    fn unions_and_type_arguments() {
        for ty in [
            "String|Number|RegExp",
            " String | Number ",
            "(String|(Number|RegExp))",
            "...(String|Number)",
            "Array.<Number>",
            "Ext.Element.< String , Number >",
            "Array.<Array.<String>|Array.<Number>>",
        ] {
            assert!(parses(ty), "{ty} should parse");
        }
        assert!(!parses("(Array|RegExp).<String>"));
        assert!(!parses("Array.<>"));
    }

    #[test]
    fn functions_and_records() {
        for ty in [
            "function()",
            "function(String,Number)",
            "function():Number",
            "function(...Number)",
            "function(...[String])",
            "function(!String, ?Number)",
            "function(Number=)",
            "function(this : Array, Number)",
            "function(new:Array)",
            "function(  ) : Array",
            "{foo, bar, baz}",
            "{foo: String, bar: Number}",
            "{foo: (String|Array.<String>)}",
            "{foo: {bar}}",
        ] {
            assert!(parses(ty), "{ty} should parse");
        }
    }

    #[test]
    fn malformed_types() {
        for ty in ["", "Ext.", ".Ext", "[Number]", "/Number", "Number/"] {
            assert!(!parses(ty), "{ty:?} should not parse");
        }
    }

    #[test]
    fn unknown_names_are_reported() {
        let renderer = BuiltinTypeRenderer::with_names(["String"]);
        assert_eq!(
            renderer.render("String/Blah"),
            Err(TypeError::UnknownName("Blah".to_string()))
        );
        assert!(renderer.render("boolean|void").is_ok());
    }

    #[test]
    fn output_escapes_markup() {
        let renderer = BuiltinTypeRenderer::with_names(["Array"]);
        assert_eq!(
            renderer.render("Array.<string, *>").as_deref(),
            Ok("Array.&lt;string, *&gt;")
        );
    }

    #[test]
    fn failures_become_warnings() {
        let renderer = BuiltinTypeRenderer::new(["My.Class"]);
        let mut warnings = Warnings::new();
        let file = FileRef::new("a.js", 4);

        assert_eq!(format_type(&renderer, "My.Class/Number", &mut warnings, Some(&file)), "My.Class/Number");
        assert_eq!(format_type(&renderer, "Foo<", &mut warnings, Some(&file)), "Foo&lt;");
        assert_eq!(format_type(&renderer, "Nope", &mut warnings, Some(&file)), "Nope");

        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::TypeSyntax, WarningKind::TypeName]);
    }
}
