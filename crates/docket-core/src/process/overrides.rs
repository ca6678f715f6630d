//! Folding override classes into the classes they patch.

use rustc_hash::FxHashSet;

use crate::model::Class;
use crate::warnings::{WarningKind, Warnings};

/// Remove every override class from `classes` and merge it into its target.
/// Absorbed overrides are recorded in `ignored`.
pub(crate) fn absorb_overrides(
    classes: &mut Vec<Class>,
    ignored: &mut FxHashSet<String>,
    warnings: &mut Warnings,
) {
    let (patches, rest): (Vec<Class>, Vec<Class>) = std::mem::take(classes)
        .into_iter()
        .partition(|class| class.override_target.is_some());
    *classes = rest;

    for patch in patches {
        let target_name = patch.override_target.clone().unwrap_or_default();
        ignored.insert(patch.name.clone());
        match classes.iter_mut().find(|class| class.answers_to(&target_name)) {
            Some(target) => absorb(target, patch),
            None => warnings.warn(
                WarningKind::Override,
                format!(
                    "Class {} not found for override {}",
                    target_name, patch.name
                ),
                patch.files.first(),
            ),
        }
    }
}

fn absorb(target: &mut Class, patch: Class) {
    for mut member in patch.members {
        match target.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => {
                let note = if member.doc.is_empty() {
                    format!("**Overridden in {}.**", patch.name)
                } else {
                    format!("**From override {}:** {}", patch.name, member.doc)
                };
                append_paragraph(&mut existing.doc, &note);
                existing.files.extend(member.files);
            }
            None => {
                append_paragraph(
                    &mut member.doc,
                    &format!("**Defined in override {}.**", patch.name),
                );
                member.owner = target.name.clone();
                target.members.push(member);
            }
        }
    }

    if !patch.doc.is_empty() {
        append_paragraph(
            &mut target.doc,
            &format!("**From override {}:** {}", patch.name, patch.doc),
        );
    }
    target.files.extend(patch.files);
}

fn append_paragraph(doc: &mut String, paragraph: &str) {
    if !doc.is_empty() {
        doc.push_str("\n\n");
    }
    doc.push_str(paragraph);
}
