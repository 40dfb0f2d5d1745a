//! Validator output model.
//!
//! # Responsibility
//! - Define the diagnostic message shape shared by validators and reports.
//!
//! # Invariants
//! - Messages are plain data; they hold copies of tag/text/id strings and
//!   never borrow from the document.

pub mod message;
