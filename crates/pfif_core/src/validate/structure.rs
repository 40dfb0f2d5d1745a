//! Structural passes: root shape, mandatory fields, extraneous and duplicate tags.

use super::{ValidationResult, Validator};
use crate::catalog::{
    is_legal_field, legal_root_children, mandatory_fields, RecordKind, NOTE_TAG, PERSON_TAG,
};
use crate::model::message::{Category, Message};
use crate::tree::Element;
use std::collections::HashSet;

pub(super) fn root_has_child(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    if validator.document().root().children().is_empty() {
        return Ok(vec![Message::new(Category::RootMissingChild)]);
    }
    Ok(Vec::new())
}

/// 1.1 needs a person under the root; 1.2+ accepts a person or a note.
pub(super) fn root_has_mandatory_children(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let allows_notes = validator.version().allows_top_level_notes();
    let has_record = doc.root().children().iter().any(|child| {
        doc.is_tag(child, PERSON_TAG) || (allows_notes && doc.is_tag(child, NOTE_TAG))
    });
    if has_record {
        return Ok(Vec::new());
    }
    Ok(vec![Message::new(Category::RootMissingRecord)])
}

pub(super) fn person_has_mandatory_children(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let persons = validator.document().all_persons();
    Ok(missing_mandatory(validator, &persons, RecordKind::Person))
}

pub(super) fn note_has_mandatory_children(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let mut messages = missing_mandatory(validator, &doc.top_level_notes(), RecordKind::TopLevelNote);
    messages.extend(missing_mandatory(validator, &doc.child_notes(), RecordKind::Note));
    Ok(messages)
}

/// Presence alone satisfies the rule; empty fields are reported by the format pass.
fn missing_mandatory(
    validator: &Validator<'_>,
    records: &[&Element],
    kind: RecordKind,
) -> Vec<Message> {
    let doc = validator.document();
    let required = mandatory_fields(validator.version(), kind);
    let mut messages = Vec::new();
    for record in records {
        for tag in required {
            if doc.field(record, tag).is_none() {
                messages.push(validator.missing_field(
                    Category::MissingMandatoryField,
                    record,
                    tag,
                ));
            }
        }
    }
    messages
}

/// Flags unknown tags and repeated tags under the root, persons and notes.
///
/// Elements outside the document namespace are always extraneous.
pub(super) fn extraneous_fields(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let version = validator.version();

    let root_children = legal_root_children(version);
    let mut messages = extraneous_children(validator, doc.root(), |tag| {
        root_children.contains(&tag)
    });
    for person in doc.all_persons() {
        messages.extend(extraneous_children(validator, person, |tag| {
            is_legal_field(version, RecordKind::Person, tag)
        }));
    }
    for note in doc.all_notes() {
        messages.extend(extraneous_children(validator, note, |tag| {
            is_legal_field(version, RecordKind::Note, tag)
        }));
    }
    Ok(messages)
}

fn extraneous_children(
    validator: &Validator<'_>,
    parent: &Element,
    is_legal: impl Fn(&str) -> bool,
) -> Vec<Message> {
    let doc = validator.document();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut messages = Vec::new();
    for child in parent.children() {
        let tag = child.name();
        let in_namespace = child.namespace() == Some(doc.namespace());
        let repeatable = in_namespace && (tag == PERSON_TAG || tag == NOTE_TAG);
        if !in_namespace || !is_legal(tag) {
            messages.push(validator.message(Category::ExtraneousTag, parent, Some(child)));
        } else if !seen.insert(tag) && !repeatable {
            messages.push(validator.message(Category::DuplicateTag, parent, Some(child)));
        }
    }
    messages
}
