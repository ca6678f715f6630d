//! JavaScript front-end.
//!
//! The source is parsed with oxc and translated into the engine's owned
//! [`Node`] tree. Every `/** ... */` comment is paired with the statement or
//! object property starting right after it. When several doc-comments precede
//! the same construct only the last one gets the code.

use std::path::Path;

use docket_core::ast::{
    ArrayLiteral, Call, Function as FunctionNode, IfStmt, Literal, LiteralKind, LoopStmt,
    MemberExpr, Node, ObjectLiteral, Other, Property,
};
use docket_core::{SourceDoc, SourceFile, SourceKind};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpression, BindingPattern, BindingPatternKind, Comment, Expression, FormalParameters,
    Function, ObjectExpression, ObjectPropertyKind, Statement, VariableDeclaration,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use rustc_hash::FxHashMap;

use crate::error::{Result, SourceError};
use crate::line_index::LineIndex;

/// Parse JavaScript source into doc-comment records.
pub fn parse_js(path: &Path, source: &str) -> Result<SourceFile> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(SourceError::Parse {
            path: path.to_path_buf(),
            diagnostics: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let program = &parsed.program;
    let mut translator = Translator::new(source, &program.comments);
    translator.statements(&program.body);
    let docs = translator.finish();
    tracing::debug!(path = %path.display(), docs = docs.len(), "parsed javascript");

    Ok(SourceFile {
        filename: path.to_string_lossy().into_owned(),
        kind: SourceKind::Js,
        docs,
    })
}

struct DocComment {
    text: String,
    linenr: u32,
    code: Option<Node>,
}

struct Translator<'s> {
    source: &'s str,
    lines: LineIndex,
    docs: Vec<DocComment>,
    /// Index of the last doc-comment attached to each token offset.
    doc_at: FxHashMap<u32, usize>,
    /// Line comment texts attached to each token offset.
    line_comments_at: FxHashMap<u32, Vec<String>>,
}

impl<'s> Translator<'s> {
    fn new(source: &'s str, comments: &[Comment]) -> Self {
        let lines = LineIndex::new(source);
        let mut docs = Vec::new();
        let mut doc_at = FxHashMap::default();
        let mut line_comments_at: FxHashMap<u32, Vec<String>> = FxHashMap::default();

        for comment in comments {
            let raw = slice(source, comment.span);
            if comment.is_jsdoc() {
                let text = raw
                    .strip_prefix("/**")
                    .and_then(|rest| rest.strip_suffix("*/"))
                    .unwrap_or(raw);
                doc_at.insert(comment.attached_to, docs.len());
                docs.push(DocComment {
                    text: text.to_string(),
                    linenr: lines.line(comment.span.start),
                    code: None,
                });
            } else if comment.is_line() {
                let text = raw.strip_prefix("//").unwrap_or(raw).trim();
                line_comments_at
                    .entry(comment.attached_to)
                    .or_default()
                    .push(text.to_string());
            }
        }

        Self {
            source,
            lines,
            docs,
            doc_at,
            line_comments_at,
        }
    }

    fn finish(self) -> Vec<SourceDoc> {
        self.docs
            .into_iter()
            .map(|doc| SourceDoc::new(doc.text, doc.code, doc.linenr))
            .collect()
    }

    fn raw(&self, span: Span) -> String {
        slice(self.source, span).to_string()
    }

    fn is_documented(&self, offset: u32) -> bool {
        self.doc_at.contains_key(&offset)
    }

    /// Hand a copy of `node` to the doc-comment preceding `offset`.
    fn attach(&mut self, offset: u32, node: &Node) {
        if let Some(&idx) = self.doc_at.get(&offset) {
            let doc = &mut self.docs[idx];
            if doc.code.is_none() {
                doc.code = Some(node.clone());
            }
        }
    }

    fn line_comment(&self, offset: u32) -> Option<String> {
        self.line_comments_at
            .get(&offset)
            .map(|texts| texts.join("\n"))
    }

    fn statements(&mut self, statements: &[Statement<'_>]) -> Vec<Node> {
        statements.iter().map(|s| self.statement(s)).collect()
    }

    fn statement(&mut self, statement: &Statement<'_>) -> Node {
        let node = match statement {
            Statement::ExpressionStatement(stmt) => self.expression(&stmt.expression),
            Statement::VariableDeclaration(decl) => self.variable(decl),
            Statement::FunctionDeclaration(function) => self.function(function),
            Statement::ReturnStatement(stmt) => Node::Return(
                stmt.argument
                    .as_ref()
                    .map(|value| Box::new(self.expression(value))),
            ),
            Statement::IfStatement(stmt) => Node::If(Box::new(IfStmt {
                test: self.expression(&stmt.test),
                consequent: self.statement(&stmt.consequent),
                alternate: stmt.alternate.as_ref().map(|alt| self.statement(alt)),
            })),
            Statement::BlockStatement(block) => Node::Block(self.statements(&block.body)),
            Statement::DoWhileStatement(stmt) => {
                let header = vec![self.expression(&stmt.test)];
                self.looped(true, header, &stmt.body)
            }
            Statement::WhileStatement(stmt) => {
                let header = vec![self.expression(&stmt.test)];
                self.looped(false, header, &stmt.body)
            }
            Statement::ForStatement(stmt) => {
                let header = stmt
                    .test
                    .iter()
                    .chain(stmt.update.iter())
                    .map(|e| self.expression(e))
                    .collect();
                self.looped(false, header, &stmt.body)
            }
            Statement::ForInStatement(stmt) => {
                let header = vec![self.expression(&stmt.right)];
                self.looped(false, header, &stmt.body)
            }
            Statement::ForOfStatement(stmt) => {
                let header = vec![self.expression(&stmt.right)];
                self.looped(false, header, &stmt.body)
            }
            Statement::TryStatement(stmt) => {
                let mut children = self.statements(&stmt.block.body);
                if let Some(handler) = &stmt.handler {
                    children.extend(self.statements(&handler.body.body));
                }
                if let Some(finalizer) = &stmt.finalizer {
                    children.extend(self.statements(&finalizer.body));
                }
                self.other(stmt.span, children)
            }
            Statement::SwitchStatement(stmt) => {
                let mut children = vec![self.expression(&stmt.discriminant)];
                for case in &stmt.cases {
                    if let Some(test) = &case.test {
                        children.push(self.expression(test));
                    }
                    children.extend(self.statements(&case.consequent));
                }
                self.other(stmt.span, children)
            }
            Statement::ThrowStatement(stmt) => {
                let children = vec![self.expression(&stmt.argument)];
                self.other(stmt.span, children)
            }
            Statement::LabeledStatement(stmt) => {
                let children = vec![self.statement(&stmt.body)];
                self.other(stmt.span, children)
            }
            other => self.other(other.span(), Vec::new()),
        };
        self.attach(statement.span().start, &node);
        node
    }

    fn looped(&mut self, do_while: bool, header: Vec<Node>, body: &Statement<'_>) -> Node {
        Node::Loop(Box::new(LoopStmt {
            do_while,
            header,
            body: self.statement(body),
        }))
    }

    fn other(&self, span: Span, children: Vec<Node>) -> Node {
        Node::Other(Box::new(Other {
            raw: self.raw(span),
            children,
        }))
    }

    /// `var a = 1` gives a var node for the first declarator. Further
    /// declarators are kept as children of a surrounding block.
    fn variable(&mut self, decl: &VariableDeclaration<'_>) -> Node {
        let mut nodes: Vec<Node> = decl
            .declarations
            .iter()
            .map(|declarator| Node::Var {
                name: binding_name(self.source, &declarator.id),
                init: declarator
                    .init
                    .as_ref()
                    .map(|init| Box::new(self.expression(init))),
            })
            .collect();
        if nodes.len() == 1 {
            nodes.remove(0)
        } else {
            Node::Block(nodes)
        }
    }

    fn function(&mut self, function: &Function<'_>) -> Node {
        let body = function
            .body
            .as_ref()
            .map(|body| self.statements(&body.statements))
            .unwrap_or_default();
        Node::Function(Box::new(FunctionNode {
            name: function.id.as_ref().map(|id| id.name.to_string()),
            params: param_names(self.source, &function.params),
            body,
        }))
    }

    fn expression(&mut self, expression: &Expression<'_>) -> Node {
        match expression {
            Expression::BooleanLiteral(lit) => {
                literal(LiteralKind::Boolean, lit.value.to_string(), self.raw(lit.span))
            }
            Expression::NullLiteral(lit) => {
                literal(LiteralKind::Null, "null".to_string(), self.raw(lit.span))
            }
            Expression::NumericLiteral(lit) => {
                let raw = self.raw(lit.span);
                literal(LiteralKind::Number, raw.clone(), raw)
            }
            Expression::StringLiteral(lit) => {
                literal(LiteralKind::String, lit.value.to_string(), self.raw(lit.span))
            }
            Expression::RegExpLiteral(lit) => {
                let raw = self.raw(lit.span);
                literal(LiteralKind::RegExp, raw.clone(), raw)
            }
            Expression::UnaryExpression(unary)
                if matches!(unary.argument, Expression::NumericLiteral(_))
                    && slice(self.source, unary.span).starts_with('-') =>
            {
                let raw = self.raw(unary.span);
                literal(LiteralKind::Number, raw.clone(), raw)
            }
            Expression::Identifier(ident) => Node::Ident(ident.name.to_string()),
            Expression::ThisExpression(_) => Node::This,
            Expression::ParenthesizedExpression(paren) => self.expression(&paren.expression),
            Expression::ObjectExpression(object) => self.object(object),
            Expression::ArrayExpression(array) => self.array(array),
            Expression::FunctionExpression(function) => {
                let mut node = self.function(function);
                if let Node::Function(f) = &mut node {
                    f.name = None;
                }
                node
            }
            Expression::ArrowFunctionExpression(arrow) => {
                Node::Function(Box::new(FunctionNode {
                    name: None,
                    params: param_names(self.source, &arrow.params),
                    body: self.statements(&arrow.body.statements),
                }))
            }
            Expression::CallExpression(call) => {
                let callee = self.expression(&call.callee);
                let args = call
                    .arguments
                    .iter()
                    .map(|arg| match arg.as_expression() {
                        Some(e) => self.expression(e),
                        None => self.other(arg.span(), Vec::new()),
                    })
                    .collect();
                Node::Call(Box::new(Call {
                    callee,
                    args,
                    raw: self.raw(call.span),
                }))
            }
            Expression::StaticMemberExpression(member) => {
                let object = self.expression(&member.object);
                Node::Member(Box::new(MemberExpr {
                    object,
                    property: member.property.name.to_string(),
                    raw: self.raw(member.span),
                }))
            }
            Expression::AssignmentExpression(assign) => Node::Assign {
                target: self.raw(assign.left.span()),
                value: Box::new(self.expression(&assign.right)),
            },
            Expression::ComputedMemberExpression(member) => {
                let children = vec![
                    self.expression(&member.object),
                    self.expression(&member.expression),
                ];
                self.other(member.span, children)
            }
            Expression::NewExpression(new) => {
                let mut children = vec![self.expression(&new.callee)];
                for arg in &new.arguments {
                    if let Some(e) = arg.as_expression() {
                        children.push(self.expression(e));
                    }
                }
                self.other(new.span, children)
            }
            Expression::SequenceExpression(seq) => {
                let children = seq.expressions.iter().map(|e| self.expression(e)).collect();
                self.other(seq.span, children)
            }
            Expression::ConditionalExpression(cond) => {
                let children = vec![
                    self.expression(&cond.test),
                    self.expression(&cond.consequent),
                    self.expression(&cond.alternate),
                ];
                self.other(cond.span, children)
            }
            Expression::LogicalExpression(logical) => {
                let children = vec![
                    self.expression(&logical.left),
                    self.expression(&logical.right),
                ];
                self.other(logical.span, children)
            }
            Expression::BinaryExpression(binary) => {
                let children = vec![
                    self.expression(&binary.left),
                    self.expression(&binary.right),
                ];
                self.other(binary.span, children)
            }
            Expression::UnaryExpression(unary) => {
                let children = vec![self.expression(&unary.argument)];
                self.other(unary.span, children)
            }
            Expression::TemplateLiteral(template) => {
                let children = template
                    .expressions
                    .iter()
                    .map(|e| self.expression(e))
                    .collect();
                self.other(template.span, children)
            }
            other => self.other(other.span(), Vec::new()),
        }
    }

    fn object(&mut self, object: &ObjectExpression<'_>) -> Node {
        let mut properties = Vec::with_capacity(object.properties.len());
        for kind in &object.properties {
            let ObjectPropertyKind::ObjectProperty(prop) = kind else {
                continue;
            };
            let Some(key) = prop.key.static_name() else {
                continue;
            };
            let offset = prop.span.start;
            let property = Property {
                key: key.to_string(),
                value: self.expression(&prop.value),
                offset,
                linenr: self.lines.line(offset),
                documented: self.is_documented(offset),
                line_comment: self.line_comment(offset),
            };
            let node = Node::Property(Box::new(property));
            self.attach(offset, &node);
            if let Node::Property(property) = node {
                properties.push(*property);
            }
        }
        Node::Object(Box::new(ObjectLiteral {
            properties,
            raw: self.raw(object.span),
        }))
    }

    fn array(&mut self, array: &ArrayExpression<'_>) -> Node {
        let mut elements = Vec::with_capacity(array.elements.len());
        let mut comments = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            let span = element.span();
            elements.push(match element.as_expression() {
                Some(e) => self.expression(e),
                None => self.other(span, Vec::new()),
            });
            comments.push(self.line_comment(span.start));
        }
        Node::Array(Box::new(ArrayLiteral {
            elements,
            comments,
            raw: self.raw(array.span),
        }))
    }
}

fn literal(kind: LiteralKind, value: String, raw: String) -> Node {
    Node::Literal(Literal { kind, value, raw })
}

fn slice(source: &str, span: Span) -> &str {
    source
        .get(span.start as usize..span.end as usize)
        .unwrap_or("")
}

fn binding_name(source: &str, pattern: &BindingPattern<'_>) -> String {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => ident.name.to_string(),
        BindingPatternKind::AssignmentPattern(assign) => binding_name(source, &assign.left),
        _ => slice(source, pattern.span()).to_string(),
    }
}

fn param_names(source: &str, params: &FormalParameters<'_>) -> Vec<String> {
    let mut names: Vec<String> = params
        .items
        .iter()
        .map(|param| binding_name(source, &param.pattern))
        .collect();
    if let Some(rest) = &params.rest {
        names.push(binding_name(source, &rest.argument));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        parse_js(Path::new("test.js"), source).expect("source parses")
    }

    #[test]
    fn pairs_comments_with_following_statement() {
        let file = parse(
            "/** @class Foo */\n/**\n * Says hi.\n */\nfunction hello(name) { return name; }\n",
        );
        assert_eq!(file.docs.len(), 2);
        assert_eq!(file.docs[0].code, None);
        assert_eq!(file.docs[1].linenr, 2);
        assert_eq!(file.docs[1].comment, "\n * Says hi.\n ");
        let Some(Node::Function(function)) = &file.docs[1].code else {
            panic!("expected a function");
        };
        assert_eq!(function.name.as_deref(), Some("hello"));
        assert_eq!(function.params, vec!["name"]);
    }

    #[test]
    fn object_properties_know_their_comments() {
        let file = parse(
            "Ext.define('Foo', {\n    /** Documented. */\n    a: 1,\n    // Counter.\n    b: -6\n});\n",
        );
        assert_eq!(file.docs.len(), 1);
        let Some(Node::Property(documented)) = &file.docs[0].code else {
            panic!("expected a property");
        };
        assert_eq!(documented.key, "a");
        assert!(documented.documented);
        assert_eq!(documented.linenr, 3);
    }

    #[test]
    fn negative_numbers_are_literals() {
        let file = parse("/** doc */\nvar x = {b: -6};\n");
        let Some(Node::Var { init: Some(init), .. }) = &file.docs[0].code else {
            panic!("expected a var");
        };
        let object = init.as_object().expect("object literal");
        let Node::Literal(lit) = &object.properties[0].value else {
            panic!("expected literal");
        };
        assert_eq!(lit.kind, LiteralKind::Number);
        assert_eq!(lit.raw, "-6");
    }

    #[test]
    fn line_comments_annotate_keys_and_elements() {
        let file = parse(
            "/** @enum */\nvar sizes = [\n    // Small size.\n    'small',\n    'large'\n];\nvar o = {\n    // Width.\n    width: 10\n};\n/** doc */\nx = o;\n",
        );
        let Some(Node::Var { init: Some(init), .. }) = &file.docs[0].code else {
            panic!("expected a var");
        };
        let Node::Array(array) = init.as_ref() else {
            panic!("expected array");
        };
        assert_eq!(array.comment(0), Some("Small size."));
        assert_eq!(array.comment(1), None);
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let err = parse_js(Path::new("broken.js"), "var = ;").expect_err("invalid source");
        let SourceError::Parse { path, diagnostics } = err else {
            panic!("expected parse error");
        };
        assert_eq!(path, Path::new("broken.js"));
        assert!(!diagnostics.is_empty());
    }
}
