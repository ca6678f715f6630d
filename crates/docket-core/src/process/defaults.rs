use crate::model::{Class, Param};

const DEFAULT_TYPE: &str = "Object";

/// Fill missing types of params, subproperties, returns and throws.
pub(crate) fn fill_default_types(class: &mut Class) {
    for member in &mut class.members {
        fill_params(&mut member.params);
        fill_params(&mut member.properties);
        if let Some(ret) = &mut member.r#return {
            ret.r#type.get_or_insert_with(|| DEFAULT_TYPE.to_string());
            fill_params(&mut ret.properties);
        }
        for throws in &mut member.throws {
            if throws.r#type.is_empty() {
                throws.r#type = DEFAULT_TYPE.to_string();
            }
        }
    }
}

fn fill_params(params: &mut [Param]) {
    for param in params {
        param.r#type.get_or_insert_with(|| DEFAULT_TYPE.to_string());
        fill_params(&mut param.properties);
    }
}
