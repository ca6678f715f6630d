use crate::ast::Node;

/// Whether every path through a function body ends in `return this`.
///
/// A return of anything else anywhere in the body (nested functions aside)
/// disqualifies it, and so does falling off the end.
pub(crate) fn returns_this(body: &[Node]) -> bool {
    !body.iter().any(returns_other) && block_returns_this(body)
}

fn block_returns_this(statements: &[Node]) -> bool {
    statements.iter().any(statement_returns_this)
}

fn statement_returns_this(statement: &Node) -> bool {
    match statement {
        Node::Return(Some(value)) => matches!(value.as_ref(), Node::This),
        Node::If(stmt) => {
            statement_returns_this(&stmt.consequent)
                && stmt.alternate.as_ref().is_some_and(statement_returns_this)
        }
        Node::Block(statements) => block_returns_this(statements),
        // Only do-while bodies are guaranteed to run.
        Node::Loop(stmt) => stmt.do_while && statement_returns_this(&stmt.body),
        _ => false,
    }
}

fn returns_other(node: &Node) -> bool {
    match node {
        Node::Function(_) => false,
        Node::Return(None) => true,
        Node::Return(Some(value)) => !matches!(value.as_ref(), Node::This),
        _ => node.children().into_iter().any(returns_other),
    }
}
