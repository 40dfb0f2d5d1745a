//! Field value formats.
//!
//! Regex formats are full matches against the raw, unstripped text, so
//! surrounding whitespace is a format violation.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// RFC 1034 label: starts with a letter, ends with a letter or digit, 1-63 chars.
// The trailing dot of a fully qualified name is optional.
static RECORD_ID_RE: Lazy<Regex> = Lazy::new(|| {
    let label = r"[a-zA-Z](?:[-a-zA-Z0-9]{0,61}[a-zA-Z0-9])?";
    let domain = format!(r"(?:{label}\.)*{label}\.?");
    Regex::new(&format!(r"^{domain}/.+$")).expect("valid record id regex")
});
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?Z$")
        .expect("valid date regex")
});
static TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^.*$").expect("valid text regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+$").expect("valid email regex"));
// Any number of delimiters around each digit, with an optional `#`/`x` extension.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-.+() ]*[0-9][-.+() ]*)+(?:[#x][0-9]+)?$").expect("valid phone regex")
});
static CAPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z ]+$").expect("valid caps regex"));
static TWO_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z]$").expect("valid two letter code regex"));
static ISO31662_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z][A-Z]-)?[A-Z0-9]{1,3}$").expect("valid subdivision regex")
});
static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid integer regex"));
static BOOLEAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:true|false)$").expect("valid boolean regex"));
static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:information_sought|is_note_author|believed_alive|believed_missing|believed_dead)$",
    )
    .expect("valid status regex")
});
static SEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:male|female|other)$").expect("valid sex regex"));
static DATE_OF_BIRTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}(?:-[0-9]{2}(?:-[0-9]{2})?)?$").expect("valid date of birth regex")
});
static AGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:-[0-9]+)?$").expect("valid age regex"));

/// Named regex formats used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `domain.name/local-part`.
    RecordId,
    /// `YYYY-MM-DDThh:mm:ss[.fff]Z`.
    Date,
    /// Any text.
    Text,
    Email,
    Phone,
    /// Uppercase letters and spaces (1.1 names and addresses).
    Caps,
    UsState,
    Iso31661Country,
    /// `[CC-]SSS` subdivision code.
    Iso31662State,
    Integer,
    Boolean,
    Status,
    Sex,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    DateOfBirth,
    /// One integer or a range between two integers.
    Age,
}

impl Pattern {
    pub fn regex(self) -> &'static Regex {
        match self {
            Self::RecordId => &RECORD_ID_RE,
            Self::Date => &DATE_RE,
            Self::Text => &TEXT_RE,
            Self::Email => &EMAIL_RE,
            Self::Phone => &PHONE_RE,
            Self::Caps => &CAPS_RE,
            Self::UsState | Self::Iso31661Country => &TWO_LETTER_RE,
            Self::Iso31662State => &ISO31662_STATE_RE,
            Self::Integer => &INTEGER_RE,
            Self::Boolean => &BOOLEAN_RE,
            Self::Status => &STATUS_RE,
            Self::Sex => &SEX_RE,
            Self::DateOfBirth => &DATE_OF_BIRTH_RE,
            Self::Age => &AGE_RE,
        }
    }
}

/// How the text of one field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFormat {
    Regex(Pattern),
    /// Absolute `http`/`https` URL with a non-empty host.
    AbsoluteUrl,
}

impl FieldFormat {
    /// Returns whether `text` satisfies this format.
    pub fn matches(self, text: &str) -> bool {
        match self {
            Self::Regex(pattern) => pattern.regex().is_match(text),
            Self::AbsoluteUrl => is_absolute_http_url(text),
        }
    }
}

fn is_absolute_http_url(text: &str) -> bool {
    // The URL parser trims surrounding whitespace; raw text must not carry any.
    if text.trim() != text {
        return false;
    }
    match Url::parse(text) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
