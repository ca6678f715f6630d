//! Turning the doc-comments of one source file into merged entries.

use crate::ast::SourceFile;
use crate::classify::{CodeRecord, ExtPatterns, SectionHints, classify};
use crate::doc::{Detected, RawTag, detect, expand_class, interpret, parse_comment};
use crate::merger::{merge, merge_member};
use crate::model::{DocEntry, Entity, FileRef, TagName};
use crate::warnings::{WarningKind, Warnings};

/// Parse, classify and merge every doc-comment of a file, in source order.
///
/// Runs independently per file, so it is safe to call from worker threads
/// with a forked [`Warnings`] collector.
pub fn extract_entries(
    file: &SourceFile,
    patterns: &ExtPatterns,
    warnings: &mut Warnings,
) -> Vec<DocEntry> {
    let mut hints = SectionHints::default();
    let mut entries = Vec::with_capacity(file.docs.len());

    for source_doc in &file.docs {
        let file_ref = FileRef::new(file.filename.clone(), source_doc.linenr);
        let parsed = parse_comment(&source_doc.comment, file.kind);
        for tag in &parsed.unknown_tags {
            warnings.warn(
                WarningKind::Tag,
                format!("Unsupported tag: @{}", tag),
                Some(&file_ref),
            );
        }

        let code = classify(source_doc.code.as_ref(), patterns, &hints);
        hints.extend(code.hints.iter().copied());
        let detected = detect(&parsed.tags, code.present.then_some(code.tagname));

        let entry = build_entry(parsed.tags, detected, code, &file_ref, warnings);
        warn_undocumented(&entry, &file_ref, warnings);
        entries.push(entry);
    }

    tracing::debug!(file = %file.filename, entries = entries.len(), "extracted doc entries");
    entries
}

fn build_entry(
    tags: Vec<RawTag>,
    detected: Detected,
    code: CodeRecord,
    file: &FileRef,
    warnings: &mut Warnings,
) -> DocEntry {
    if detected.tagname != TagName::Class {
        let doc = interpret(&tags, detected, warnings, file);
        return merge(doc, code, file);
    }

    // A class comment may also document configs and the constructor.
    let mut groups = expand_class(tags);
    let extra = groups.split_off(1);
    let class_tags = groups.pop().map(|group| group.tags).unwrap_or_default();

    let doc = interpret(&class_tags, detected, warnings, file);
    let mut entry = merge(doc, code, file);
    if let Entity::Class(class) = &mut entry.entity {
        for group in extra {
            let detected = Detected {
                tagname: group.tagname,
                explicit: true,
            };
            let doc = interpret(&group.tags, detected, warnings, file);
            if doc.ignore {
                continue;
            }
            let member = merge_member(doc, &CodeRecord::default(), file);
            class
                .members
                .retain(|m| !(m.autodetected.tagname && m.name == member.name));
            class.members.push(member);
        }
    }
    entry
}

fn warn_undocumented(entry: &DocEntry, file: &FileRef, warnings: &mut Warnings) {
    let (name, undocumented) = match &entry.entity {
        Entity::Class(class) => (
            &class.name,
            class.doc.is_empty() && !class.private && class.inheritdoc.is_none(),
        ),
        Entity::Member(member) => (
            &member.name,
            member.doc.is_empty() && !member.private && member.inheritdoc.is_none(),
        ),
    };
    if undocumented && !entry.ignore {
        warnings.warn(
            WarningKind::Nodoc,
            format!("No documentation for {}", name),
            Some(file),
        );
    }
}
