//! Cross-record passes: id uniqueness, note ownership, link symmetry.

use super::{ValidationResult, Validator};
use crate::model::message::{Category, Message};
use crate::tree::Element;
use std::collections::HashSet;

const PERSON_RECORD_ID: &str = "person_record_id";
const NOTE_RECORD_ID: &str = "note_record_id";
const LINKED_PERSON_RECORD_ID: &str = "linked_person_record_id";

pub(super) fn person_ids_are_unique(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    let persons = validator.document().all_persons();
    Ok(duplicate_ids(validator, &persons, PERSON_RECORD_ID))
}

pub(super) fn note_ids_are_unique(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    let notes = validator.document().all_notes();
    Ok(duplicate_ids(validator, &notes, NOTE_RECORD_ID))
}

/// Flags every record whose id was already seen. Missing ids belong to the
/// mandatory-field pass and are ignored here.
fn duplicate_ids(validator: &Validator<'_>, records: &[&Element], id_tag: &str) -> Vec<Message> {
    let doc = validator.document();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut messages = Vec::new();
    for &record in records {
        let Some(id) = doc.field_text(record, id_tag) else {
            continue;
        };
        if !seen.insert(id) {
            messages.push(validator.message(Category::DuplicateId, record, Some(record)));
        }
    }
    messages
}

/// Top-level notes must name their person; nested notes that name one must
/// name their parent.
pub(super) fn notes_belong_to_persons(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let mut messages = Vec::new();

    for note in doc.top_level_notes() {
        if doc.field(note, PERSON_RECORD_ID).is_none() {
            messages.push(validator.message(
                Category::TopLevelNoteMissingPerson,
                note,
                Some(note),
            ));
        }
    }

    for person in doc.all_persons() {
        let Some(person_id_field) = doc.field(person, PERSON_RECORD_ID) else {
            continue;
        };
        for note in doc.notes_of(person) {
            let Some(note_person_field) = doc.field(note, PERSON_RECORD_ID) else {
                continue;
            };
            if note_person_field.text() != person_id_field.text() {
                let mut message = Message::new(Category::NotePersonMismatch);
                validator.locate(&mut message, note_person_field);
                message.person_record_id = person_id_field.text().map(str::to_string);
                message.note_record_id = validator.text_of(note, NOTE_RECORD_ID);
                messages.push(message);
            }
        }
    }
    Ok(messages)
}

/// One `owner -> linked` claim and the note making it.
struct Link<'doc> {
    owner: &'doc str,
    linked: &'doc str,
    note: &'doc Element,
}

/// Claims in document order: nested notes (owner is the parent person), then
/// top-level notes (owner is the note's own `person_record_id`).
fn linked_record_index<'doc>(validator: &Validator<'doc>) -> Vec<Link<'doc>> {
    let doc = validator.document();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut links = Vec::new();
    let mut add = |owner: Option<&'doc str>, note: &'doc Element| {
        let (Some(owner), Some(linked)) = (owner, doc.field_text(note, LINKED_PERSON_RECORD_ID))
        else {
            return;
        };
        if seen.insert((owner, linked)) {
            links.push(Link {
                owner,
                linked,
                note,
            });
        }
    };

    for person in doc.all_persons() {
        let owner = doc.field_text(person, PERSON_RECORD_ID);
        for note in doc.notes_of(person) {
            add(owner, note);
        }
    }
    for note in doc.top_level_notes() {
        add(doc.field_text(note, PERSON_RECORD_ID), note);
    }
    links
}

/// Every A -> B link needs a B -> A link. Missing counterparts are warnings
/// since B may live in another document.
pub(super) fn linked_records_matched(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let links = linked_record_index(validator);
    let pairs: HashSet<(&str, &str)> = links.iter().map(|link| (link.owner, link.linked)).collect();

    let mut messages = Vec::new();
    for link in &links {
        if pairs.contains(&(link.linked, link.owner)) {
            continue;
        }
        let link_field = doc.field(link.note, LINKED_PERSON_RECORD_ID);
        messages.push(validator.message(Category::AsymmetricLink, link.note, link_field));
    }
    Ok(messages)
}
