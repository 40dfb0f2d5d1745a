//! Version-keyed PFIF rule catalog.
//!
//! # Responsibility
//! - Describe, per PFIF version, which fields each record must carry, which
//!   fields it may carry, how each field is formatted and (before 1.3) in
//!   which order fields must appear.
//! - Keep every table static and immutable.
//!
//! # Invariants
//! - Versions form a closed set; every lookup is an exhaustive `match`.
//! - Tables never inherit from another version. A renamed field (`home_zip`
//!   in 1.1, `home_postal_code` afterwards) is a distinct key per version.
//!
//! # See also
//! - <http://zesty.ca/pfif/>

mod format;

pub use format::{FieldFormat, Pattern};

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported PFIF schema revisions.
///
/// Declaration order is chronological, so `Ord` can be used for
/// "introduced in" comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PfifVersion {
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

impl PfifVersion {
    pub const ALL: [PfifVersion; 3] = [PfifVersion::V1_1, PfifVersion::V1_2, PfifVersion::V1_3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
        }
    }

    /// Whether fields inside a record have a mandated order.
    pub fn has_field_order(self) -> bool {
        match self {
            Self::V1_1 | Self::V1_2 => true,
            Self::V1_3 => false,
        }
    }

    /// Whether notes may appear directly under the `pfif` root.
    pub fn allows_top_level_notes(self) -> bool {
        match self {
            Self::V1_1 => false,
            Self::V1_2 | Self::V1_3 => true,
        }
    }

    /// Whether persons carry an `expiry_date` that triggers data removal.
    pub fn has_expiry(self) -> bool {
        match self {
            Self::V1_1 | Self::V1_2 => false,
            Self::V1_3 => true,
        }
    }
}

impl Display for PfifVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PfifVersion {
    type Err = UnsupportedVersion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            "1.3" => Ok(Self::V1_3),
            other => Err(UnsupportedVersion(other.to_string())),
        }
    }
}

/// A declared version string outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedVersion(pub String);

impl Display for UnsupportedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PFIF version `{}` is not supported; expected one of 1.1, 1.2, 1.3",
            self.0
        )
    }
}

impl Error for UnsupportedVersion {}

/// Record type as seen by the catalog.
///
/// `TopLevelNote` only differs from `Note` in its mandatory fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Person,
    Note,
    TopLevelNote,
}

impl RecordKind {
    fn base(self) -> Self {
        match self {
            Self::Person => Self::Person,
            Self::Note | Self::TopLevelNote => Self::Note,
        }
    }

    pub fn tag(self) -> &'static str {
        match self.base() {
            Self::Person => PERSON_TAG,
            _ => NOTE_TAG,
        }
    }
}

pub const ROOT_TAG: &str = "pfif";
pub const PERSON_TAG: &str = "person";
pub const NOTE_TAG: &str = "note";

/// Fields an expired record may still expose.
pub const PLACEHOLDER_FIELDS: &[&str] =
    &["person_record_id", "expiry_date", "source_date", "entry_date"];

pub type FieldFormats = &'static [(&'static str, FieldFormat)];
pub type FieldOrder = &'static [(&'static str, u8)];

/// Mandatory child fields of one record kind.
pub fn mandatory_fields(version: PfifVersion, kind: RecordKind) -> &'static [&'static str] {
    match (version, kind) {
        (PfifVersion::V1_1 | PfifVersion::V1_2, RecordKind::Person) => {
            &["person_record_id", "first_name", "last_name"]
        }
        (PfifVersion::V1_3, RecordKind::Person) => {
            &["person_record_id", "source_date", "full_name"]
        }
        (_, RecordKind::Note) => &["note_record_id", "author_name", "source_date", "text"],
        (_, RecordKind::TopLevelNote) => &[
            "person_record_id",
            "note_record_id",
            "author_name",
            "source_date",
            "text",
        ],
    }
}

/// Format of every known field of one record kind.
pub fn field_formats(version: PfifVersion, kind: RecordKind) -> FieldFormats {
    match (version, kind.base()) {
        (PfifVersion::V1_1, RecordKind::Person) => PERSON_FORMATS_1_1,
        (PfifVersion::V1_2, RecordKind::Person) => PERSON_FORMATS_1_2,
        (PfifVersion::V1_3, RecordKind::Person) => PERSON_FORMATS_1_3,
        (PfifVersion::V1_1, _) => NOTE_FORMATS_1_1,
        (PfifVersion::V1_2 | PfifVersion::V1_3, _) => NOTE_FORMATS_1_2,
    }
}

/// Format of one field, or `None` when the field is unknown for the kind.
pub fn field_format(version: PfifVersion, kind: RecordKind, tag: &str) -> Option<FieldFormat> {
    field_formats(version, kind)
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, format)| *format)
}

/// Ordering positions for versions that mandate field order.
///
/// Fields sharing a position may appear in any order relative to each other.
pub fn field_order(version: PfifVersion, kind: RecordKind) -> Option<FieldOrder> {
    match (version, kind.base()) {
        (PfifVersion::V1_1, RecordKind::Person) => Some(PERSON_ORDER_1_1),
        (PfifVersion::V1_1, _) => Some(NOTE_ORDER_1_1),
        (PfifVersion::V1_2, RecordKind::Person) => Some(PERSON_ORDER_1_2),
        (PfifVersion::V1_2, _) => Some(NOTE_ORDER_1_2),
        (PfifVersion::V1_3, _) => None,
    }
}

/// Children allowed under the `pfif` root element.
pub fn legal_root_children(version: PfifVersion) -> &'static [&'static str] {
    if version.allows_top_level_notes() {
        &[PERSON_TAG, NOTE_TAG]
    } else {
        &[PERSON_TAG]
    }
}

/// Whether `tag` may appear as a child of a record of `kind`.
///
/// The legal set is every formatted field, plus nested notes for persons.
pub fn is_legal_field(version: PfifVersion, kind: RecordKind, tag: &str) -> bool {
    if kind.base() == RecordKind::Person && tag == NOTE_TAG {
        return true;
    }
    field_format(version, kind, tag).is_some()
}

/// Every tag that may appear as a child of a record of `kind`.
pub fn legal_fields(version: PfifVersion, kind: RecordKind) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = field_formats(version, kind)
        .iter()
        .map(|(name, _)| *name)
        .collect();
    if kind.base() == RecordKind::Person {
        fields.push(NOTE_TAG);
    }
    fields
}

const RECORD_ID: FieldFormat = FieldFormat::Regex(Pattern::RecordId);
const DATE: FieldFormat = FieldFormat::Regex(Pattern::Date);
const TEXT: FieldFormat = FieldFormat::Regex(Pattern::Text);
const EMAIL: FieldFormat = FieldFormat::Regex(Pattern::Email);
const PHONE: FieldFormat = FieldFormat::Regex(Pattern::Phone);
const URL: FieldFormat = FieldFormat::AbsoluteUrl;
const CAPS: FieldFormat = FieldFormat::Regex(Pattern::Caps);
const US_STATE: FieldFormat = FieldFormat::Regex(Pattern::UsState);
const ISO31661_COUNTRY: FieldFormat = FieldFormat::Regex(Pattern::Iso31661Country);
const ISO31662_STATE: FieldFormat = FieldFormat::Regex(Pattern::Iso31662State);
const INTEGER: FieldFormat = FieldFormat::Regex(Pattern::Integer);
const BOOLEAN: FieldFormat = FieldFormat::Regex(Pattern::Boolean);
const STATUS: FieldFormat = FieldFormat::Regex(Pattern::Status);
const SEX: FieldFormat = FieldFormat::Regex(Pattern::Sex);
const DATE_OF_BIRTH: FieldFormat = FieldFormat::Regex(Pattern::DateOfBirth);
const AGE: FieldFormat = FieldFormat::Regex(Pattern::Age);

const PERSON_FORMATS_1_1: FieldFormats = &[
    ("person_record_id", RECORD_ID),
    ("entry_date", DATE),
    ("author_name", TEXT),
    ("author_email", EMAIL),
    ("author_phone", PHONE),
    ("source_name", TEXT),
    ("source_date", DATE),
    ("source_url", URL),
    ("first_name", CAPS),
    ("last_name", CAPS),
    ("home_city", CAPS),
    ("home_state", US_STATE),
    ("home_neighborhood", CAPS),
    ("home_street", CAPS),
    ("home_zip", INTEGER),
    ("photo_url", URL),
    ("other", TEXT),
];

const PERSON_FORMATS_1_2: FieldFormats = &[
    ("person_record_id", RECORD_ID),
    ("entry_date", DATE),
    ("author_name", TEXT),
    ("author_email", EMAIL),
    ("author_phone", PHONE),
    ("source_name", TEXT),
    ("source_date", DATE),
    ("source_url", URL),
    ("first_name", TEXT),
    ("last_name", TEXT),
    ("sex", SEX),
    ("date_of_birth", DATE_OF_BIRTH),
    ("age", AGE),
    ("home_street", TEXT),
    ("home_city", TEXT),
    ("home_neighborhood", TEXT),
    ("home_state", ISO31662_STATE),
    ("home_postal_code", INTEGER),
    ("home_country", ISO31661_COUNTRY),
    ("photo_url", URL),
    ("other", TEXT),
];

// 1.3 relaxes home_postal_code to free text and adds expiry_date/full_name.
const PERSON_FORMATS_1_3: FieldFormats = &[
    ("person_record_id", RECORD_ID),
    ("entry_date", DATE),
    ("expiry_date", DATE),
    ("author_name", TEXT),
    ("author_email", EMAIL),
    ("author_phone", PHONE),
    ("source_name", TEXT),
    ("source_date", DATE),
    ("source_url", URL),
    ("full_name", TEXT),
    ("first_name", TEXT),
    ("last_name", TEXT),
    ("sex", SEX),
    ("date_of_birth", DATE_OF_BIRTH),
    ("age", AGE),
    ("home_street", TEXT),
    ("home_city", TEXT),
    ("home_neighborhood", TEXT),
    ("home_state", ISO31662_STATE),
    ("home_postal_code", TEXT),
    ("home_country", ISO31661_COUNTRY),
    ("photo_url", URL),
    ("other", TEXT),
];

const NOTE_FORMATS_1_1: FieldFormats = &[
    ("note_record_id", RECORD_ID),
    ("entry_date", DATE),
    ("author_name", TEXT),
    ("author_email", EMAIL),
    ("author_phone", PHONE),
    ("source_date", DATE),
    ("found", BOOLEAN),
    ("email_of_found_person", EMAIL),
    ("phone_of_found_person", PHONE),
    ("last_known_location", TEXT),
    ("text", TEXT),
];

const NOTE_FORMATS_1_2: FieldFormats = &[
    ("note_record_id", RECORD_ID),
    ("person_record_id", RECORD_ID),
    ("linked_person_record_id", RECORD_ID),
    ("entry_date", DATE),
    ("author_name", TEXT),
    ("author_email", EMAIL),
    ("author_phone", PHONE),
    ("source_date", DATE),
    ("found", BOOLEAN),
    ("status", STATUS),
    ("email_of_found_person", EMAIL),
    ("phone_of_found_person", PHONE),
    ("last_known_location", TEXT),
    ("text", TEXT),
];

const PERSON_ORDER_1_1: FieldOrder = &[
    ("person_record_id", 1),
    ("entry_date", 2),
    ("author_name", 3),
    ("author_email", 4),
    ("author_phone", 5),
    ("source_name", 6),
    ("source_date", 7),
    ("source_url", 8),
    ("first_name", 9),
    ("last_name", 10),
    ("home_city", 11),
    ("home_state", 12),
    ("home_neighborhood", 13),
    ("home_street", 14),
    ("home_zip", 15),
    ("photo_url", 16),
    ("other", 17),
    ("note", 18),
];

const NOTE_ORDER_1_1: FieldOrder = &[
    ("note_record_id", 1),
    ("entry_date", 2),
    ("author_name", 3),
    ("author_email", 4),
    ("author_phone", 5),
    ("source_date", 6),
    ("found", 7),
    ("email_of_found_person", 8),
    ("phone_of_found_person", 9),
    ("last_known_location", 10),
    ("text", 11),
];

// 1.2 only pins the id first and nested notes last.
const PERSON_ORDER_1_2: FieldOrder = &[
    ("person_record_id", 1),
    ("entry_date", 2),
    ("author_name", 2),
    ("author_email", 2),
    ("author_phone", 2),
    ("source_name", 2),
    ("source_date", 2),
    ("source_url", 2),
    ("first_name", 2),
    ("last_name", 2),
    ("home_city", 2),
    ("home_state", 2),
    ("home_neighborhood", 2),
    ("home_street", 2),
    ("home_postal_code", 2),
    ("home_country", 2),
    ("sex", 2),
    ("date_of_birth", 2),
    ("age", 2),
    ("photo_url", 2),
    ("other", 2),
    ("note", 3),
];

const NOTE_ORDER_1_2: FieldOrder = &[
    ("note_record_id", 1),
    ("person_record_id", 2),
    ("linked_person_record_id", 3),
    ("entry_date", 3),
    ("author_name", 3),
    ("author_email", 3),
    ("author_phone", 3),
    ("source_date", 3),
    ("found", 3),
    ("email_of_found_person", 3),
    ("phone_of_found_person", 3),
    ("last_known_location", 3),
    ("text", 3),
];
