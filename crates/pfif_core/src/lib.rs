//! Core validation logic for PFIF person and note feeds.
//! This crate is the single source of truth for per-version PFIF rules.

pub mod catalog;
pub mod logging;
pub mod model;
pub mod report;
pub mod tree;
pub mod validate;

pub use catalog::{FieldFormat, Pattern, PfifVersion, RecordKind, UnsupportedVersion};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::message::{Category, Message, Severity};
pub use report::{
    render_messages, render_report, ReportOptions, ReportSummary, TRUNCATE_THRESHOLD,
};
pub use tree::{Element, ParseError, PfifDocument};
pub use validate::{
    find_check, parse_pfif_date, Check, ValidationError, ValidationResult, Validator, CHECKS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
