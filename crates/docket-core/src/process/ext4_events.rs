use crate::model::{Class, Param, TagName};

const OPTIONS_DOC: &str = "The options object passed to {@link Ext.util.Observable#addListener}.";

/// Whether events get the trailing options parameter: forced by the
/// setting, otherwise on when any class was created through a define call.
pub(crate) fn enabled(setting: Option<bool>, classes: &[Class]) -> bool {
    setting.unwrap_or_else(|| classes.iter().any(|class| class.ext_define))
}

/// Append `eOpts` to every event of the class.
pub(crate) fn add_event_options(class: &mut Class) {
    for event in class
        .members
        .iter_mut()
        .filter(|m| m.tagname == TagName::Event)
    {
        if event.params.iter().any(|p| p.ext4_auto_param) {
            continue;
        }
        event.params.push(Param {
            ext4_auto_param: true,
            ..Param::new("eOpts").with_type("Object").with_doc(OPTIONS_DOC)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;

    #[test]
    fn auto_detection_follows_define_calls() {
        let mut defined = Class::new("Bar");
        defined.ext_define = true;
        assert!(!enabled(None, &[Class::new("Foo")]));
        assert!(enabled(None, &[Class::new("Foo"), defined.clone()]));
        assert!(!enabled(Some(false), &[defined]));
        assert!(enabled(Some(true), &[]));
    }

    #[test]
    fn events_get_options_param_once() {
        let mut event = Member::new(TagName::Event, "click");
        event.params.push(Param::new("foo").with_type("Number"));
        let mut class = Class::new("Foo");
        class.members = vec![event, Member::new(TagName::Method, "run")];

        add_event_options(&mut class);
        add_event_options(&mut class);

        let params = &class.members[0].params;
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].name.as_deref(), Some("eOpts"));
        assert_eq!(params[1].r#type.as_deref(), Some("Object"));
        assert!(params[1].doc.contains("addListener"));
        assert!(params[1].ext4_auto_param);
        assert!(class.members[1].params.is_empty());
    }
}
