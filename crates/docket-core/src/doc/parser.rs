//! Doc-comment tokenizer.
//!
//! Turns the text of one `/** ... */` comment into an ordered list of
//! [`RawTag`]s. The first tag is always a [`TagKind::Doc`] holding the
//! leading free text.

use super::default_value;
use super::scanner::{Scanner, is_ident_char};
use super::tags::{RawTag, Shape, TagKind};
use crate::ast::SourceKind;
use crate::model::{InheritDoc, TagName};

/// Tokenized doc-comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDoc {
    pub tags: Vec<RawTag>,
    /// `@words` that looked like tags but are not known.
    pub unknown_tags: Vec<String>,
}

/// Tokenize one doc-comment. `comment` is the text between `/**` and `*/`.
pub fn parse_comment(comment: &str, source: SourceKind) -> ParsedDoc {
    let text = purify(comment);
    DocParser::new(&text, source).run()
}

/// Strip the comment decoration: the leading `*` of every line when the
/// comment uses them, otherwise the indentation of the first line.
pub(crate) fn purify(comment: &str) -> String {
    let lines: Vec<&str> = comment.lines().collect();
    let starred = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.trim_start().starts_with('*'));

    if starred {
        return lines
            .iter()
            .map(|line| strip_star(line))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let indent = lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map_or(0, |line| line.len() - line.trim_start().len());
    lines
        .iter()
        .map(|line| {
            let blank = line.len() - line.trim_start().len();
            &line[blank.min(indent)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_star(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest
            .strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
        None => trimmed,
    }
}

struct DocParser<'a> {
    s: Scanner<'a>,
    source: SourceKind,
    tags: Vec<RawTag>,
    /// Tag receiving free text, `None` until new text opens a doc tag.
    current: Option<usize>,
    unknown: Vec<String>,
}

impl<'a> DocParser<'a> {
    fn new(input: &'a str, source: SourceKind) -> Self {
        Self {
            s: Scanner::new(input),
            source,
            tags: vec![RawTag::new(TagKind::Doc)],
            current: Some(0),
            unknown: Vec::new(),
        }
    }

    fn run(mut self) -> ParsedDoc {
        let mut text_start = 0;
        while let Some(c) = self.s.peek() {
            if c == '@' && self.at_tag_start() {
                let tag_start = self.s.pos();
                self.s.bump();
                let name = self.s.take_while(|c| is_ident_char(c) || c == '-');
                match TagKind::lookup(name, self.source) {
                    Some(kind) => {
                        let text = self.s.slice(text_start, tag_start);
                        self.push_text(text);
                        let tag = self.parse_tag(kind);
                        self.tags.push(tag);
                        self.current = kind.captures_doc().then(|| self.tags.len() - 1);
                        text_start = self.s.pos();
                    }
                    None => self.unknown.push(name.to_string()),
                }
            } else {
                self.s.bump();
            }
        }
        let text = self.s.slice(text_start, self.s.pos());
        self.push_text(text);

        for tag in &mut self.tags {
            tag.doc = tag.doc.trim().to_string();
        }
        ParsedDoc {
            tags: self.tags,
            unknown_tags: self.unknown,
        }
    }

    /// `@` at the start of a word, outside indented code, followed by a name.
    fn at_tag_start(&self) -> bool {
        self.s.prev().is_none_or(char::is_whitespace)
            && self.s.line_indent() < 4
            && self.s.peek_second().is_some_and(is_ident_char)
    }

    fn push_text(&mut self, text: &str) {
        match self.current {
            Some(idx) => self.tags[idx].doc.push_str(text),
            None if !text.trim().is_empty() => {
                let mut tag = RawTag::new(TagKind::Doc);
                tag.doc.push_str(text);
                self.tags.push(tag);
                self.current = Some(self.tags.len() - 1);
            }
            None => {}
        }
    }

    fn parse_tag(&mut self, kind: TagKind) -> RawTag {
        let mut tag = RawTag::new(kind);
        match kind.shape() {
            Shape::Flag => {}
            Shape::FlagLine => {
                self.s.line_rest();
            }
            Shape::ClassName => tag.name = self.class_name(),
            Shape::ClassList => tag.names = self.class_list(),
            Shape::MemberName => {
                self.s.skip_horiz_white();
                tag.name = self.s.ident_chain().map(str::to_string);
            }
            Shape::Typed => self.typed(&mut tag),
            Shape::Return => {
                tag.r#type = self.type_in_braces();
                self.s.skip_horiz_white();
                if self.s.looking_at("return.") {
                    tag.name = self.s.ident_chain().map(str::to_string);
                }
            }
            Shape::Throws => tag.r#type = self.type_in_braces(),
            Shape::Type => {
                self.s.skip_horiz_white();
                tag.r#type = if self.s.peek() == Some('{') {
                    self.s.braces().map(str::to_string)
                } else {
                    let token = self.s.take_while(|c| !c.is_whitespace());
                    (!token.is_empty()).then(|| token.to_string())
                };
            }
            Shape::Words => tag.names = self.words(),
            Shape::Version => {
                self.s.skip_horiz_white();
                if self.s.peek().is_some_and(|c| c.is_ascii_digit()) {
                    tag.version = Some(self.s.take_while(|c| !c.is_whitespace()).to_string());
                }
            }
            Shape::Since => {
                self.s.skip_horiz_white();
                let version = self.s.take_while(|c| !c.is_whitespace());
                tag.version = (!version.is_empty()).then(|| version.to_string());
            }
            Shape::Text => {}
            Shape::Inheritdoc => tag.inheritdoc = Some(self.inheritdoc()),
            Shape::Enum => {
                tag.r#type = self.type_in_braces();
                self.s.skip_horiz_white();
                if self.s.eat("[") {
                    let inner = self.s.take_while(|c| c != ']' && c != '\n');
                    self.s.eat("]");
                    if let Some((key, pattern)) = inner.split_once('=') {
                        tag.name = Some(key.trim().to_string()).filter(|k| !k.is_empty());
                        tag.default = Some(pattern.trim().to_string());
                    }
                } else {
                    tag.name = self.s.ident_chain().map(str::to_string);
                }
            }
            Shape::CssMixin => {
                self.s.skip_horiz_white();
                tag.name = self.s.css_ident().map(str::to_string);
            }
        }
        tag
    }

    fn type_in_braces(&mut self) -> Option<String> {
        self.s.skip_horiz_white();
        self.s.braces().map(|t| t.trim().to_string())
    }

    fn class_name(&mut self) -> Option<String> {
        self.s.skip_horiz_white();
        let braced = self.s.eat("{");
        let name = self.s.ident_chain().map(str::to_string);
        if braced {
            self.s.eat("}");
        }
        name
    }

    fn class_list(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        loop {
            self.s.skip_horiz_white();
            if self.s.eat(",") {
                continue;
            }
            match self.class_name() {
                Some(name) => names.push(name),
                None => break,
            }
        }
        names
    }

    fn words(&mut self) -> Vec<String> {
        let mut words = Vec::new();
        loop {
            self.s.skip_horiz_white();
            let word = self.s.take_while(|c| is_ident_char(c) || c == '-' || c == '.');
            if word.is_empty() {
                break;
            }
            words.push(word.to_string());
        }
        words
    }

    /// `{type} name`, `{type} [name=default]` and their variations.
    fn typed(&mut self, tag: &mut RawTag) {
        if let Some(ty) = self.type_in_braces() {
            match ty.strip_suffix('=') {
                Some(stripped) => {
                    tag.r#type = Some(stripped.to_string());
                    tag.optional = true;
                }
                None => tag.r#type = Some(ty),
            }
        }
        self.s.skip_horiz_white();

        if self.s.eat("[") {
            self.s.skip_horiz_white();
            tag.name = Some(self.name().unwrap_or_default());
            self.s.skip_horiz_white();
            if self.s.eat("=") {
                let (value, consumed) = default_value::bracketed(self.s.rest());
                self.s.advance(consumed);
                tag.default = (!value.is_empty()).then_some(value);
            } else {
                self.s.eat("]");
            }
            tag.optional = true;
            return;
        }

        let Some(name) = self.name() else {
            return;
        };
        tag.name = Some(name.clone());

        let after_name = self.s.pos();
        self.s.skip_horiz_white();
        if self.s.eat("=") {
            self.s.skip_horiz_white();
            let (value, consumed) = default_value::bare(self.s.rest());
            self.s.advance(consumed);
            tag.default = (!value.is_empty()).then_some(value);
            return;
        }

        if self.s.looking_at_ci("(required)") {
            if name.contains('.') {
                self.rewind(after_name);
            } else {
                self.s.advance("(required)".len());
                tag.required = true;
            }
        } else if self.s.eat("(optional)") || self.s.eat("(Optional)") {
            tag.optional = true;
        } else {
            self.rewind(after_name);
        }
    }

    fn name(&mut self) -> Option<String> {
        if self.s.peek() == Some('$') {
            let start = self.s.pos();
            self.s.bump();
            self.s.css_ident();
            return Some(self.s.slice(start, self.s.pos()).to_string());
        }
        self.s.ident_chain().map(str::to_string)
    }

    fn rewind(&mut self, pos: usize) {
        self.s.rewind(pos);
    }

    /// `Class#static-type-member`, every part optional.
    fn inheritdoc(&mut self) -> InheritDoc {
        self.s.skip_horiz_white();
        let cls = self.s.take_while(|c| is_ident_char(c) || c == '.');
        let mut reference = InheritDoc {
            cls: (!cls.is_empty()).then(|| cls.to_string()),
            ..InheritDoc::default()
        };

        if self.s.eat("#") {
            reference.r#static = self.s.eat("static-");
            let member_start = self.s.pos();
            let word = self.s.take_while(|c| c.is_ascii_lowercase() || c == '_');
            match TagName::from_member_kind(word) {
                Some(tagname) if self.s.eat("-") => reference.r#type = Some(tagname),
                _ => self.rewind(member_start),
            }
            let member = self.s.take_while(|c| is_ident_char(c) || c == '-');
            reference.member = (!member.is_empty()).then(|| member.to_string());
        }
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(comment: &str) -> Vec<RawTag> {
        parse_comment(comment, SourceKind::Js).tags
    }

    fn find(tags: &[RawTag], kind: TagKind) -> &RawTag {
        tags.iter()
            .find(|t| t.kind == kind)
            .unwrap_or_else(|| panic!("no {:?} tag", kind))
    }

    #[test]
    fn simple_method_comment() {
        let tags = parse(
            "*\n * @method foo\n * Some docs.\n * @param {Number} x doc for x\n * @return {String} resulting value\n ",
        );
        assert_eq!(tags[0].kind, TagKind::Doc);
        assert_eq!(find(&tags, TagKind::Method).name_str(), "foo");
        assert_eq!(find(&tags, TagKind::Method).doc, "");

        let text: Vec<_> = tags.iter().filter(|t| t.kind == TagKind::Doc).map(|t| t.doc.as_str()).collect();
        assert_eq!(text.concat(), "Some docs.");

        let param = find(&tags, TagKind::Param);
        assert_eq!(param.name_str(), "x");
        assert_eq!(param.r#type.as_deref(), Some("Number"));
        assert_eq!(param.doc, "doc for x");

        let ret = find(&tags, TagKind::Return);
        assert_eq!(ret.r#type.as_deref(), Some("String"));
        assert_eq!(ret.doc, "resulting value");
    }

    #[test]
    fn type_without_braces() {
        let tags = parse("* @type Boolean|String");
        assert_eq!(find(&tags, TagKind::Type).r#type.as_deref(), Some("Boolean|String"));
    }

    #[test]
    fn single_line_comment() {
        let tags = parse(" @event blah ");
        assert_eq!(find(&tags, TagKind::Event).name_str(), "blah");
    }

    #[test]
    fn comment_without_stars_trims_first_line_indent() {
        let tags = parse(
            "\n        @event blah\n        Some comment.\n        More text.\n\n            code sample\n        ",
        );
        assert_eq!(find(&tags, TagKind::Event).name_str(), "blah");
        assert_eq!(tags[1].kind, TagKind::Event);
        assert_eq!(tags[2].doc, "Some comment.\nMore text.\n\n    code sample");
    }

    #[test]
    fn nested_braces_in_types() {
        let tags = parse("* @param {{foo:{bar:Number}}} x");
        assert_eq!(find(&tags, TagKind::Param).r#type.as_deref(), Some("{foo:{bar:Number}}"));
    }

    #[test]
    fn text_that_only_looks_like_tags() {
        assert_eq!(parse("* john@method.com")[0].doc, "john@method.com");
        assert_eq!(parse("* {@inline Some#method}")[0].doc, "{@inline Some#method}");
        assert_eq!(
            parse("* Code:\n *\n *     @example blah")[0].doc,
            "Code:\n\n    @example blah"
        );
        assert_eq!(
            parse("* Code example:\n *\n *     if @method then")[0].doc,
            "Code example:\n\n    if @method then"
        );
        let tags = parse("* Foo:    @method");
        assert_eq!(tags[1].kind, TagKind::Method);
    }

    #[test]
    fn indented_text_does_not_hide_next_tag() {
        let tags = parse("* @param x\n *     Foo\n *     Bar\n * @param y");
        let params: Vec<_> = tags.iter().filter(|t| t.kind == TagKind::Param).collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].doc, "Foo\n    Bar");
    }

    #[test]
    fn unknown_tags_stay_text() {
        let parsed = parse_comment("* Hello @foo world", SourceKind::Js);
        assert_eq!(parsed.tags[0].doc, "Hello @foo world");
        assert_eq!(parsed.unknown_tags, vec!["foo".to_string()]);
    }

    #[test]
    fn optional_and_default_params() {
        let tags = parse("* @param {Number} [x=42] Docs");
        let param = find(&tags, TagKind::Param);
        assert!(param.optional);
        assert_eq!(param.default.as_deref(), Some("42"));
        assert_eq!(param.doc, "Docs");

        let tags = parse("* @param {String} [y] Docs");
        assert!(find(&tags, TagKind::Param).optional);
        assert_eq!(find(&tags, TagKind::Param).default, None);

        let tags = parse("* @cfg {Number} x=10 Blah");
        let cfg = find(&tags, TagKind::Cfg);
        assert_eq!(cfg.default.as_deref(), Some("10"));
        assert_eq!(cfg.doc, "Blah");

        let tags = parse("* @cfg {Number=} x Blah");
        assert!(find(&tags, TagKind::Cfg).optional);
        assert_eq!(find(&tags, TagKind::Cfg).r#type.as_deref(), Some("Number"));
    }

    #[test]
    fn required_and_optional_markers() {
        let tags = parse("* @cfg {String} foo (required) Some docs");
        let cfg = find(&tags, TagKind::Cfg);
        assert!(cfg.required);
        assert_eq!(cfg.doc, "Some docs");

        let tags = parse("* @cfg {String} foo.bar (Required) Some docs");
        let cfg = find(&tags, TagKind::Cfg);
        assert!(!cfg.required);
        assert_eq!(cfg.doc, "(Required) Some docs");

        let tags = parse("* @param {String} foo (optional) Some docs");
        assert!(find(&tags, TagKind::Param).optional);
    }

    #[test]
    fn dotted_name_edge_cases() {
        let tags = parse("* @param {Object} coord. Coordinate");
        let param = find(&tags, TagKind::Param);
        assert_eq!(param.name_str(), "coord");
        assert_eq!(param.doc, ". Coordinate");

        let tags = parse("* @param {Object} .coord Coordinate");
        let param = find(&tags, TagKind::Param);
        assert_eq!(param.name_str(), "");
        assert_eq!(param.doc, ".coord Coordinate");
    }

    #[test]
    fn class_tags() {
        let tags = parse("* @class Foo\n * @extends {Bar.Baz}\n * @mixins A B, C\n * @xtype panel");
        assert_eq!(find(&tags, TagKind::Class).name_str(), "Foo");
        assert_eq!(find(&tags, TagKind::Extends).name_str(), "Bar.Baz");
        assert_eq!(find(&tags, TagKind::Mixins).names, vec!["A", "B", "C"]);
        assert_eq!(find(&tags, TagKind::Xtype).names, vec!["panel"]);
    }

    #[test]
    fn inheritdoc_references() {
        let tags = parse("* @inheritdoc Ext.Foo#static-cfg-bar");
        let reference = find(&tags, TagKind::Inheritdoc).inheritdoc.clone().unwrap_or_default();
        assert_eq!(reference.cls.as_deref(), Some("Ext.Foo"));
        assert_eq!(reference.member.as_deref(), Some("bar"));
        assert_eq!(reference.r#type, Some(TagName::Cfg));
        assert!(reference.r#static);

        let tags = parse("* @inheritdoc #method");
        let reference = find(&tags, TagKind::Inheritdoc).inheritdoc.clone().unwrap_or_default();
        assert_eq!(reference.cls, None);
        assert_eq!(reference.member.as_deref(), Some("method"));
        assert_eq!(reference.r#type, None);

        let tags = parse("* @inheritdoc");
        assert_eq!(find(&tags, TagKind::Inheritdoc).inheritdoc, Some(InheritDoc::default()));
    }

    #[test]
    fn deprecated_and_ignored_tags() {
        let tags = parse("* @deprecated 4.0 Use something else.\n * @todo fix me\n * Rest.");
        let deprecated = find(&tags, TagKind::Deprecated);
        assert_eq!(deprecated.version.as_deref(), Some("4.0"));
        assert_eq!(deprecated.doc, "Use something else.");
        assert!(tags.iter().all(|t| !t.doc.contains("fix me")));
        assert_eq!(tags.last().map(|t| t.doc.as_str()), Some("Rest."));
    }

    #[test]
    fn enum_patterns() {
        let tags = parse("* @enum [xtype=widget.*]");
        let tag = find(&tags, TagKind::Enum);
        assert_eq!(tag.name_str(), "xtype");
        assert_eq!(tag.default.as_deref(), Some("widget.*"));

        let tags = parse("* @enum [foo=plugin.*]");
        let tag = find(&tags, TagKind::Enum);
        assert_eq!(tag.name_str(), "foo");
        assert_eq!(tag.default.as_deref(), Some("plugin.*"));

        let tags = parse("* @enum {String} My.Type");
        let tag = find(&tags, TagKind::Enum);
        assert_eq!(tag.r#type.as_deref(), Some("String"));
        assert_eq!(tag.name_str(), "My.Type");
    }

    #[test]
    fn css_tags() {
        let parsed = parse_comment("* @var {number} $button-height Height.\n", SourceKind::Scss);
        let var = find(&parsed.tags, TagKind::Var);
        assert_eq!(var.name_str(), "$button-height");
        assert_eq!(var.doc, "Height.");

        let parsed = parse_comment("* @mixin button-ui", SourceKind::Scss);
        assert_eq!(find(&parsed.tags, TagKind::CssMixin).name_str(), "button-ui");
    }
}
