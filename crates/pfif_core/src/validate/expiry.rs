//! Expired-record lifecycle pass (PFIF 1.3+).
//!
//! A person whose `expiry_date` is more than one day in the past may only
//! expose placeholder fields, and its placeholder `source_date` must equal
//! `entry_date` and must not postdate the removal deadline.

use super::{ValidationError, ValidationResult, Validator};
use crate::catalog::{NOTE_TAG, PLACEHOLDER_FIELDS};
use crate::model::message::{Category, Message};
use crate::tree::Element;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PFIF_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?Z$")
        .expect("valid pfif date regex")
});

const EXPIRY_DATE: &str = "expiry_date";
const SOURCE_DATE: &str = "source_date";
const ENTRY_DATE: &str = "entry_date";
const PERSON_RECORD_ID: &str = "person_record_id";

/// Parses `yyyy-mm-ddThh:mm:ss[.fff]Z`. Fractional seconds are dropped.
///
/// Returns `None` for text outside that shape or for impossible dates.
pub fn parse_pfif_date(value: &str) -> Option<DateTime<Utc>> {
    let captures = PFIF_DATE_RE.captures(value)?;
    let part = |index: usize| -> Option<u32> { captures.get(index)?.as_str().parse().ok() };
    let year = i32::try_from(part(1)?).ok()?;
    NaiveDate::from_ymd_opt(year, part(2)?, part(3)?)?
        .and_hms_opt(part(4)?, part(5)?, part(6)?)
        .map(|naive| naive.and_utc())
}

fn required_date(element: &Element, field: &'static str) -> ValidationResult<DateTime<Utc>> {
    let value = element.text().unwrap_or_default();
    parse_pfif_date(value).ok_or_else(|| ValidationError::MalformedDate {
        field,
        value: value.to_string(),
        line: element.line(),
    })
}

/// Removal deadline for `person`: declared expiry plus one grace day.
///
/// An absent, empty or unreadable `expiry_date` gives no deadline; the format
/// pass already reports unreadable values.
fn removal_deadline(validator: &Validator<'_>, person: &Element) -> Option<DateTime<Utc>> {
    let expiry = validator.document().field_text(person, EXPIRY_DATE)?;
    Some(parse_pfif_date(expiry)? + Duration::days(1))
}

pub(super) fn expired_records_removed(
    validator: &Validator<'_>,
) -> ValidationResult<Vec<Message>> {
    if !validator.version().has_expiry() {
        return Ok(Vec::new());
    }

    let doc = validator.document();
    let mut top_level_notes_by_person: HashMap<&str, Vec<&Element>> = HashMap::new();
    for note in doc.top_level_notes() {
        if let Some(person_id) = doc.field_text(note, PERSON_RECORD_ID) {
            top_level_notes_by_person
                .entry(person_id)
                .or_default()
                .push(note);
        }
    }

    let mut messages = Vec::new();
    for person in doc.all_persons() {
        let Some(deadline) = removal_deadline(validator, person) else {
            continue;
        };
        if deadline >= validator.now() {
            continue;
        }

        messages.extend(personal_data_messages(validator, person));
        messages.extend(placeholder_date_messages(validator, person, deadline)?);
        let associated = doc
            .field_text(person, PERSON_RECORD_ID)
            .and_then(|person_id| top_level_notes_by_person.get(person_id));
        for note in associated.into_iter().flatten() {
            messages.extend(personal_data_messages(validator, note));
        }
    }
    Ok(messages)
}

/// Every non-placeholder field with text is personal data. Nested notes are
/// searched recursively; the note element itself is not data.
fn personal_data_messages(validator: &Validator<'_>, record: &Element) -> Vec<Message> {
    let mut messages = Vec::new();
    for child in record.children() {
        if PLACEHOLDER_FIELDS.contains(&child.name()) {
            continue;
        }
        if child.name() == NOTE_TAG {
            messages.extend(personal_data_messages(validator, child));
        } else if child.has_text() {
            messages.push(validator.message(Category::ExpiredPersonalData, record, Some(child)));
        }
    }
    messages
}

fn placeholder_date_messages(
    validator: &Validator<'_>,
    person: &Element,
    deadline: DateTime<Utc>,
) -> ValidationResult<Vec<Message>> {
    let doc = validator.document();
    let source = doc.field(person, SOURCE_DATE).filter(|field| field.has_text());
    let source_text = source.and_then(Element::text);
    let entry_text = doc.field_text(person, ENTRY_DATE);

    let mut messages = Vec::new();
    if source_text.is_none() || source_text != entry_text {
        messages.push(validator.message(
            Category::PlaceholderDatesMismatch,
            person,
            Some(person),
        ));
    }
    // A placeholder made after the deadline means data was exposed past it.
    if let Some(source) = source {
        if required_date(source, SOURCE_DATE)? > deadline {
            messages.push(validator.message(
                Category::PlaceholderCreatedLate,
                person,
                Some(source),
            ));
        }
    }
    Ok(messages)
}
