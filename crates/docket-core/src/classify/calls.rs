use crate::ast::Node;
use crate::model::CodeFacts;

/// Collect `this.fireEvent("x")` events and `this.foo()` calls from a
/// function body, nested functions included. Variables assigned `this`
/// count as `this`.
pub(crate) fn scan_facts(body: &[Node]) -> CodeFacts {
    let mut aliases = vec!["this".to_string()];
    for node in body {
        collect_this_aliases(node, &mut aliases);
    }

    let mut facts = CodeFacts::default();
    for node in body {
        collect_calls(node, &aliases, &mut facts);
    }
    facts
}

fn collect_this_aliases(node: &Node, aliases: &mut Vec<String>) {
    if let Node::Var {
        name,
        init: Some(init),
    } = node
    {
        if matches!(init.as_ref(), Node::This) && !aliases.contains(name) {
            aliases.push(name.clone());
        }
    }
    for child in node.children() {
        collect_this_aliases(child, aliases);
    }
}

fn collect_calls(node: &Node, aliases: &[String], facts: &mut CodeFacts) {
    if let Node::Call(call) = node {
        if let Node::Member(callee) = &call.callee {
            let on_this = callee
                .object
                .dotted_name()
                .is_some_and(|object| aliases.contains(&object));
            if on_this {
                if callee.property == "fireEvent" {
                    if let Some(event) = call.args.first().and_then(Node::as_str) {
                        push_unique(&mut facts.fires, event);
                    }
                } else {
                    push_unique(&mut facts.method_calls, &callee.property);
                }
            }
        }
    }
    for child in node.children() {
        collect_calls(child, aliases, facts);
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Call, Function, MemberExpr, string_literal};

    fn call_on(object: Node, method: &str, args: Vec<Node>) -> Node {
        Node::Call(Box::new(Call {
            callee: Node::Member(Box::new(MemberExpr {
                object,
                property: method.to_string(),
                raw: String::new(),
            })),
            args,
            raw: String::new(),
        }))
    }

    fn fire(object: Node, event: &str) -> Node {
        call_on(object, "fireEvent", vec![string_literal(event, event)])
    }

    #[test]
    fn collects_fired_events_and_calls() {
        let facts = scan_facts(&[
            fire(Node::This, "click"),
            call_on(Node::This, "doLayout", Vec::new()),
            fire(Node::This, "click"),
            fire(Node::Ident("other".to_string()), "ignored"),
        ]);
        assert_eq!(facts.fires, vec!["click"]);
        assert_eq!(facts.method_calls, vec!["doLayout"]);
    }

    #[test]
    fn follows_this_aliases_into_nested_functions() {
        let nested = Node::Function(Box::new(Function {
            name: None,
            params: Vec::new(),
            body: vec![fire(Node::Ident("me".to_string()), "ready")],
        }));
        let facts = scan_facts(&[
            Node::Var {
                name: "me".to_string(),
                init: Some(Box::new(Node::This)),
            },
            nested,
        ]);
        assert_eq!(facts.fires, vec!["ready"]);
    }
}
