//! Diagnostic message model.
//!
//! # Responsibility
//! - Define the unit of validator output and its fixed category set.
//!
//! # Invariants
//! - Every category has exactly one severity; callers never pick it.
//! - Category declaration order is the stable order used by summaries.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Concrete violation of the format.
    Error,
    /// Non-fatal or heuristic finding.
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        }
    }
}

/// Fixed set of diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RootMissingChild,
    RootMissingRecord,
    MissingMandatoryField,
    InvalidFieldFormat,
    EmptyField,
    DuplicateId,
    TopLevelNoteMissingPerson,
    NotePersonMismatch,
    FieldOutOfOrder,
    ExpiredPersonalData,
    PlaceholderDatesMismatch,
    PlaceholderCreatedLate,
    AsymmetricLink,
    ExtraneousTag,
    DuplicateTag,
    Truncated,
}

impl Category {
    /// Human-readable category text used in reports.
    pub fn text(self) -> &'static str {
        match self {
            Self::RootMissingChild => "The root node must have at least one child.",
            Self::RootMissingRecord => {
                "Having a person tag (or a note tag in PFIF 1.2+) as one of the children of the root node is mandatory."
            }
            Self::MissingMandatoryField => {
                "You do not have all mandatory children. You were missing a tag."
            }
            Self::InvalidFieldFormat => {
                "The text in one of your fields does not match the requirement in the specification."
            }
            Self::EmptyField => "You had an empty field.",
            Self::DuplicateId => "You had a duplicate id.",
            Self::TopLevelNoteMissingPerson => {
                "A top level note (a note not contained within a person) is missing a person_record_id."
            }
            Self::NotePersonMismatch => {
                "You have a note that has a person_record_id that does not match the person_record_id of the person that owns the note."
            }
            Self::FieldOutOfOrder => "One of your fields was out of order.",
            Self::ExpiredPersonalData => "An expired record still has personal data.",
            Self::PlaceholderDatesMismatch => {
                "An expired record has a source date that does not match the entry date."
            }
            Self::PlaceholderCreatedLate => {
                "The placeholder for an expired record was created more than a day after the record expired."
            }
            Self::AsymmetricLink => {
                "There is an asymmetric linked record. That is, a note has a linked_person_record_id to another person, but that person does not link back."
            }
            Self::ExtraneousTag => "Extraneous Tag.",
            Self::DuplicateTag => "Duplicate Tag.",
            Self::Truncated => "You had too many messages, so some were truncated.",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::EmptyField | Self::AsymmetricLink | Self::Truncated => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// One validator finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub category: Category,
    pub severity: Severity,
    /// 1-based source line of the relevant element, when known.
    pub line: Option<usize>,
    /// Local tag of the relevant element (or of the missing field).
    pub xml_tag: Option<String>,
    /// Text of the relevant element.
    pub xml_text: Option<String>,
    pub person_record_id: Option<String>,
    pub note_record_id: Option<String>,
    /// Free-form detail, e.g. how many messages a truncation dropped.
    pub extra_data: Option<String>,
}

impl Message {
    /// Creates a message with the category's severity and no location.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            severity: category.severity(),
            line: None,
            xml_tag: None,
            xml_text: None,
            person_record_id: None,
            note_record_id: None,
            extra_data: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn with_extra_data(mut self, extra_data: impl Into<String>) -> Self {
        self.extra_data = Some(extra_data.into());
        self
    }

    /// Person id if set, otherwise note id.
    pub fn record_id(&self) -> Option<&str> {
        self.person_record_id
            .as_deref()
            .or(self.note_record_id.as_deref())
    }
}
