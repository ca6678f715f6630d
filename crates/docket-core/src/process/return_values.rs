//! Chainable methods and constructor return values.

use crate::model::{Class, ReturnDoc, TagName};

pub(crate) fn process_returns(class: &mut Class) {
    let owner = class.name.clone();
    for member in class
        .members
        .iter_mut()
        .filter(|m| m.tagname == TagName::Method)
    {
        if member.name == "constructor" {
            member.chainable = false;
            let ret = member.r#return.get_or_insert_with(ReturnDoc::default);
            if ret.r#type.is_none() {
                ret.r#type = Some(owner.clone());
            }
            continue;
        }

        if member.chainable {
            if member.r#return.is_none() {
                member.r#return = Some(ReturnDoc {
                    r#type: Some(owner.clone()),
                    doc: "this".to_string(),
                    properties: Vec::new(),
                });
            }
        } else if let Some(ret) = &member.r#return {
            member.chainable = ret.r#type.as_deref() == Some(owner.as_str()) && is_this(&ret.doc);
        }
    }
}

/// `this` as a whole word at the start of a return description.
fn is_this(doc: &str) -> bool {
    doc.strip_prefix("this")
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$'))
}
