//! Validation orchestrator and check registry.
//!
//! # Responsibility
//! - Hold the per-run context (document, version, current time).
//! - Run every registered check pass in a fixed order and concatenate results.
//!
//! # Invariants
//! - `CHECKS` is the complete, statically enumerated list of passes.
//! - Passes only read the document; each builds its own message buffer.
//! - A pass never suppresses another; only a hard `ValidationError` ends a run.
//!
//! # See also
//! - crate::report for rendering results.

mod expiry;
mod fields;
mod records;
mod structure;

use crate::catalog::PfifVersion;
use crate::model::message::{Category, Message};
use crate::tree::{Element, PfifDocument};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use expiry::parse_pfif_date;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failures that stop a run because the input cannot be judged further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A date that a lifecycle rule depends on cannot be read.
    MalformedDate {
        field: &'static str,
        value: String,
        line: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDate { field, value, line } => write!(
                f,
                "line {line}: `{field}` value `{value}` is not a yyyy-mm-ddThh:mm:ssZ date"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Signature of one check pass.
pub type CheckFn = fn(&Validator<'_>) -> ValidationResult<Vec<Message>>;

/// One named entry of the check registry.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub run: CheckFn,
}

/// Every pass, in execution order.
pub const CHECKS: &[Check] = &[
    Check {
        name: "root_has_child",
        run: structure::root_has_child,
    },
    Check {
        name: "root_has_mandatory_children",
        run: structure::root_has_mandatory_children,
    },
    Check {
        name: "person_has_mandatory_children",
        run: structure::person_has_mandatory_children,
    },
    Check {
        name: "note_has_mandatory_children",
        run: structure::note_has_mandatory_children,
    },
    Check {
        name: "fields_have_correct_format",
        run: fields::fields_have_correct_format,
    },
    Check {
        name: "person_ids_are_unique",
        run: records::person_ids_are_unique,
    },
    Check {
        name: "note_ids_are_unique",
        run: records::note_ids_are_unique,
    },
    Check {
        name: "notes_belong_to_persons",
        run: records::notes_belong_to_persons,
    },
    Check {
        name: "person_field_order",
        run: fields::person_field_order,
    },
    Check {
        name: "note_field_order",
        run: fields::note_field_order,
    },
    Check {
        name: "expired_records_removed",
        run: expiry::expired_records_removed,
    },
    Check {
        name: "linked_records_matched",
        run: records::linked_records_matched,
    },
    Check {
        name: "extraneous_fields",
        run: structure::extraneous_fields,
    },
];

/// Returns the registered check with `name`.
pub fn find_check(name: &str) -> Option<&'static Check> {
    CHECKS.iter().find(|check| check.name == name)
}

/// Per-run validation context over one document.
pub struct Validator<'doc> {
    doc: &'doc PfifDocument,
    now: DateTime<Utc>,
}

impl<'doc> Validator<'doc> {
    /// Creates a validator that judges expiry against the wall clock.
    pub fn new(doc: &'doc PfifDocument) -> Self {
        Self::with_now(doc, Utc::now())
    }

    /// Creates a validator with a fixed "current time".
    pub fn with_now(doc: &'doc PfifDocument, now: DateTime<Utc>) -> Self {
        Self { doc, now }
    }

    pub fn document(&self) -> &'doc PfifDocument {
        self.doc
    }

    pub fn version(&self) -> PfifVersion {
        self.doc.version()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Runs every registered check and returns all messages in pass order.
    ///
    /// # Errors
    /// - Returns `ValidationError` when a pass meets input it cannot judge.
    pub fn run(&self) -> ValidationResult<Vec<Message>> {
        let started_at = Instant::now();
        let mut messages = Vec::new();
        for check in CHECKS {
            match self.run_check(check) {
                Ok(found) => messages.extend(found),
                Err(err) => {
                    error!(
                        "event=validation_run module=validate status=error check={} duration_ms={} error={}",
                        check.name,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        let errors = messages.iter().filter(|message| message.is_error()).count();
        info!(
            "event=validation_run module=validate status=ok version={} errors={} warnings={} duration_ms={}",
            self.version(),
            errors,
            messages.len() - errors,
            started_at.elapsed().as_millis()
        );
        Ok(messages)
    }

    /// Runs one check pass.
    pub fn run_check(&self, check: &Check) -> ValidationResult<Vec<Message>> {
        let messages = (check.run)(self)?;
        debug!(
            "event=check_run module=validate check={} messages={}",
            check.name,
            messages.len()
        );
        Ok(messages)
    }

    /// Builds a message about `record`, optionally located at `element`.
    ///
    /// Record ids come from the record's own id fields.
    pub(crate) fn message(
        &self,
        category: Category,
        record: &Element,
        element: Option<&Element>,
    ) -> Message {
        let mut message = Message::new(category);
        message.person_record_id = self.text_of(record, "person_record_id");
        message.note_record_id = self.text_of(record, "note_record_id");
        if let Some(element) = element {
            self.locate(&mut message, element);
        }
        message
    }

    /// Builds a message about a field missing from `record`.
    pub(crate) fn missing_field(&self, category: Category, record: &Element, tag: &str) -> Message {
        let mut message = self.message(category, record, None);
        message.xml_tag = Some(tag.to_string());
        message
    }

    pub(crate) fn locate(&self, message: &mut Message, element: &Element) {
        message.line = Some(element.line());
        message.xml_tag = Some(element.name().to_string());
        message.xml_text = element
            .is_leaf()
            .then(|| element.text().map(str::to_string))
            .flatten();
    }

    pub(crate) fn text_of(&self, record: &Element, tag: &str) -> Option<String> {
        self.doc.field_text(record, tag).map(str::to_string)
    }
}
