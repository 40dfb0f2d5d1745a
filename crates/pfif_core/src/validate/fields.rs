//! Field value format and field order passes.

use super::{ValidationResult, Validator};
use crate::catalog::{field_formats, field_order, RecordKind};
use crate::model::message::{Category, Message};
use crate::tree::Element;

/// Checks every catalogued field of every person and note.
///
/// Values are matched unstripped. Empty fields are warnings, never errors.
pub(super) fn fields_have_correct_format(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let mut messages = format_messages(validator, &doc.all_persons(), RecordKind::Person);
    messages.extend(format_messages(validator, &doc.all_notes(), RecordKind::Note));
    Ok(messages)
}

fn format_messages(
    validator: &Validator<'_>,
    records: &[&Element],
    kind: RecordKind,
) -> Vec<Message> {
    let doc = validator.document();
    let formats = field_formats(validator.version(), kind);
    let mut messages = Vec::new();
    for record in records {
        for (tag, format) in formats {
            for element in doc.fields(record, tag) {
                let category = match element.text() {
                    Some(text) if format.matches(text) => continue,
                    Some(_) => Category::InvalidFieldFormat,
                    None => Category::EmptyField,
                };
                messages.push(validator.message(category, record, Some(element)));
            }
        }
    }
    messages
}

pub(super) fn person_field_order(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    let persons = validator.document().all_persons();
    Ok(order_messages(validator, &persons, RecordKind::Person))
}

pub(super) fn note_field_order(validator: &Validator<'_>) -> ValidationResult<Vec<Message>> {
    let notes = validator.document().all_notes();
    Ok(order_messages(validator, &notes, RecordKind::Note))
}

/// Reports the first out-of-order field per record, then moves to the next record.
///
/// Tags without an order position are skipped; the extraneous pass owns them.
fn order_messages(
    validator: &Validator<'_>,
    records: &[&Element],
    kind: RecordKind,
) -> Vec<Message> {
    let Some(order) = field_order(validator.version(), kind) else {
        return Vec::new();
    };

    let mut messages = Vec::new();
    for record in records {
        let mut current_max = 0;
        for field in record.children() {
            let Some(position) = order
                .iter()
                .find(|(tag, _)| *tag == field.name())
                .map(|(_, position)| *position)
            else {
                continue;
            };
            if position < current_max {
                messages.push(validator.message(Category::FieldOutOfOrder, record, Some(field)));
                break;
            }
            current_max = position;
        }
    }
    messages
}
