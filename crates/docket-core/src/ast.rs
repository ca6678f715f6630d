//! Owned, parser-independent code tree consumed by the classifier.
//!
//! Front-ends translate their own syntax trees into [`Node`]s. Only the shapes
//! that matter for documentation are modelled; everything else becomes
//! [`Node::Other`] carrying its source text and the interesting sub-nodes.

/// Flavour of the source a comment came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceKind {
    #[default]
    Js,
    Scss,
}

/// One doc-comment with the code construct following it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDoc {
    /// Comment text without the `/**` and `*/` delimiters.
    pub comment: String,
    pub code: Option<Node>,
    pub linenr: u32,
}

impl SourceDoc {
    pub fn new(comment: impl Into<String>, code: Option<Node>, linenr: u32) -> Self {
        Self {
            comment: comment.into(),
            code,
            linenr,
        }
    }
}

/// All doc-comments of one file, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub filename: String,
    pub kind: SourceKind,
    pub docs: Vec<SourceDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
    Null,
    RegExp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Cooked value; the unquoted contents for strings.
    pub value: String,
    /// Source text.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Node,
    /// Source offset of the property, identifying it across records.
    pub offset: u32,
    pub linenr: u32,
    /// The property carries its own doc-comment.
    pub documented: bool,
    /// Text of `//` comments directly before the property.
    pub line_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
    pub raw: String,
}

impl ObjectLiteral {
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Node>,
    /// Text of `//` comments directly before each element.
    pub comments: Vec<Option<String>>,
    pub raw: String,
}

impl ArrayLiteral {
    /// Line comment preceding the element at `idx`.
    pub fn comment(&self, idx: usize) -> Option<&str> {
        self.comments.get(idx).and_then(|c| c.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Node,
    pub args: Vec<Node>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Node,
    pub property: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Node,
    pub consequent: Node,
    pub alternate: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    /// `do { } while` bodies always run at least once.
    pub do_while: bool,
    /// Test and update expressions.
    pub header: Vec<Node>,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Other {
    pub raw: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssMixin {
    pub name: String,
    /// `$name` and optional default value text.
    pub params: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Function(Box<Function>),
    /// `var name = init`.
    Var { name: String, init: Option<Box<Node>> },
    /// `target = value`, target as dotted source text.
    Assign { target: String, value: Box<Node> },
    Call(Box<Call>),
    Member(Box<MemberExpr>),
    Ident(String),
    This,
    Literal(Literal),
    Object(Box<ObjectLiteral>),
    Array(Box<ArrayLiteral>),
    /// Object literal key with its value.
    Property(Box<Property>),
    Return(Option<Box<Node>>),
    If(Box<IfStmt>),
    Block(Vec<Node>),
    Loop(Box<LoopStmt>),
    Other(Box<Other>),
    CssVar { name: String, value: String },
    CssMixin(Box<CssMixin>),
}

impl Node {
    /// Dotted name of identifier/member chains: `Ext.define`, `this.foo`.
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Node::Ident(name) => Some(name.clone()),
            Node::This => Some("this".to_string()),
            Node::Member(member) => member
                .object
                .dotted_name()
                .map(|object| format!("{}.{}", object, member.property)),
            _ => None,
        }
    }

    /// Source text of value-like nodes.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Node::Ident(name) => Some(name),
            Node::This => Some("this"),
            Node::Literal(lit) => Some(&lit.raw),
            Node::Object(obj) => Some(&obj.raw),
            Node::Array(arr) => Some(&arr.raw),
            Node::Call(call) => Some(&call.raw),
            Node::Member(member) => Some(&member.raw),
            Node::Other(other) => Some(&other.raw),
            _ => None,
        }
    }

    /// String literal value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Literal(Literal {
                kind: LiteralKind::String,
                value,
                ..
            }) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectLiteral> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Node::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(
            self,
            Node::Literal(Literal {
                kind: LiteralKind::Boolean,
                value,
                ..
            }) if value == "true"
        )
    }

    /// Direct sub-nodes, for whole-tree scans.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Function(f) => f.body.iter().collect(),
            Node::Var { init, .. } => init.iter().map(|n| n.as_ref()).collect(),
            Node::Assign { value, .. } => vec![value.as_ref()],
            Node::Call(call) => std::iter::once(&call.callee)
                .chain(call.args.iter())
                .collect(),
            Node::Member(member) => vec![&member.object],
            Node::Object(obj) => obj.properties.iter().map(|p| &p.value).collect(),
            Node::Array(arr) => arr.elements.iter().collect(),
            Node::Property(prop) => vec![&prop.value],
            Node::Return(value) => value.iter().map(|n| n.as_ref()).collect(),
            Node::If(stmt) => [&stmt.test, &stmt.consequent]
                .into_iter()
                .chain(stmt.alternate.iter())
                .collect(),
            Node::Block(nodes) => nodes.iter().collect(),
            Node::Loop(stmt) => stmt.header.iter().chain(std::iter::once(&stmt.body)).collect(),
            Node::Other(other) => other.children.iter().collect(),
            Node::Ident(_)
            | Node::This
            | Node::Literal(_)
            | Node::CssVar { .. }
            | Node::CssMixin(_) => Vec::new(),
        }
    }

    /// Whether a function value appears anywhere inside this node.
    pub fn contains_function(&self) -> bool {
        matches!(self, Node::Function(_)) || self.children().iter().any(|c| c.contains_function())
    }
}

/// Build a string literal node. Handy for front-ends and tests.
pub fn string_literal(value: &str, raw: &str) -> Node {
    Node::Literal(Literal {
        kind: LiteralKind::String,
        value: value.to_string(),
        raw: raw.to_string(),
    })
}
