//! Plain-text rendering of validator messages.
//!
//! # Responsibility
//! - Summarise error and warning counts per category.
//! - Render the detailed message listing with optional source excerpts.
//! - Group and truncate message lists for display.
//!
//! # Invariants
//! - Rendering never reorders messages except for truncation notices, which
//!   are appended after the kept messages.
//! - Output is a pure function of its inputs.

use crate::model::message::{Category, Message, Severity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Messages kept per category when truncation is on.
pub const TRUNCATE_THRESHOLD: usize = 100;

/// Record key used when a message names no record.
pub const NO_RECORD_ID: &str = "None Specified";

/// Display switches for the detailed listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub show_errors: bool,
    pub show_warnings: bool,
    pub show_error_type: bool,
    pub show_line_numbers: bool,
    pub show_full_line: bool,
    pub show_record_ids: bool,
    pub show_xml_tag: bool,
    pub show_xml_text: bool,
    pub truncate: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_errors: true,
            show_warnings: true,
            show_error_type: true,
            show_line_numbers: true,
            show_full_line: true,
            show_record_ids: true,
            show_xml_tag: true,
            show_xml_text: true,
            truncate: true,
        }
    }
}

/// Error and warning counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub text: &'static str,
    pub errors: usize,
    pub warnings: usize,
}

/// Counts per category, in category declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub categories: Vec<CategoryCount>,
}

impl ReportSummary {
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut counts: BTreeMap<Category, (usize, usize)> = BTreeMap::new();
        for message in messages {
            let entry = counts.entry(message.category).or_default();
            match message.severity {
                Severity::Error => entry.0 += 1,
                Severity::Warning => entry.1 += 1,
            }
        }

        let categories: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, (errors, warnings))| CategoryCount {
                category,
                text: category.text(),
                errors,
                warnings,
            })
            .collect();
        Self {
            errors: categories.iter().map(|count| count.errors).sum(),
            warnings: categories.iter().map(|count| count.warnings).sum(),
            categories,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    /// Tab-separated table: category, error count, warning count.
    pub fn render(&self) -> String {
        let mut output = String::from("Category\tErrors\tWarnings\n");
        for count in &self.categories {
            let _ = writeln!(output, "{}\t{}\t{}", count.text, count.errors, count.warnings);
        }
        let _ = writeln!(output, "Total\t{}\t{}", self.errors, self.warnings);
        output
    }
}

/// Keeps at most `threshold` messages per category and appends one notice per
/// truncated category.
pub fn truncate(messages: &[Message], threshold: usize) -> Vec<Message> {
    let totals = group_by_category(messages);
    let mut kept_per_category: BTreeMap<Category, usize> = BTreeMap::new();
    let mut kept = Vec::with_capacity(messages.len());
    for message in messages {
        let kept_count = kept_per_category.entry(message.category).or_default();
        if *kept_count < threshold {
            *kept_count += 1;
            kept.push(message.clone());
        }
    }
    for (category, group) in &totals {
        if group.len() > threshold {
            kept.push(Message::new(Category::Truncated).with_extra_data(format!(
                "You had {} messages in the following category: {}",
                group.len(),
                category.text()
            )));
        }
    }
    kept
}

pub fn group_by_category(messages: &[Message]) -> BTreeMap<Category, Vec<&Message>> {
    let mut grouped: BTreeMap<Category, Vec<&Message>> = BTreeMap::new();
    for message in messages {
        grouped.entry(message.category).or_default().push(message);
    }
    grouped
}

/// Groups by person id, else note id, else `NO_RECORD_ID`.
pub fn group_by_record(messages: &[Message]) -> BTreeMap<String, Vec<&Message>> {
    let mut grouped: BTreeMap<String, Vec<&Message>> = BTreeMap::new();
    for message in messages {
        let record_id = message.record_id().unwrap_or(NO_RECORD_ID).to_string();
        grouped.entry(record_id).or_default().push(message);
    }
    grouped
}

/// Renders the detailed listing. `xml_lines` supplies source excerpts.
pub fn render_messages(messages: &[Message], options: &ReportOptions, xml_lines: &[String]) -> String {
    let truncated;
    let messages = if options.truncate {
        truncated = truncate(messages, TRUNCATE_THRESHOLD);
        truncated.as_slice()
    } else {
        messages
    };

    let mut output = String::new();
    for message in messages {
        let visible = match message.severity {
            Severity::Error => options.show_errors,
            Severity::Warning => options.show_warnings,
        };
        if visible {
            render_message(&mut output, message, options, xml_lines);
        }
    }
    output
}

fn render_message(output: &mut String, message: &Message, options: &ReportOptions, xml_lines: &[String]) {
    if options.show_error_type {
        let _ = write!(output, "{} ", message.severity.label());
    }
    if options.show_line_numbers {
        if let Some(line) = message.line {
            let _ = write!(output, "Line {line}: ");
        }
    }
    output.push_str(message.category.text());
    if let Some(extra_data) = &message.extra_data {
        let _ = write!(output, ": {extra_data}");
    }
    if options.show_record_ids {
        if let Some(person_record_id) = &message.person_record_id {
            let _ = write!(output, "\nThe relevant person_record_id is: {person_record_id}");
        }
        if let Some(note_record_id) = &message.note_record_id {
            let _ = write!(output, "\nThe relevant note_record_id is: {note_record_id}");
        }
    }
    if options.show_xml_tag {
        if let Some(tag) = message.xml_tag.as_deref().filter(|tag| !tag.is_empty()) {
            let _ = write!(output, "\nThe tag of the relevant PFIF XML node: {tag}");
        }
    }
    if options.show_xml_text {
        if let Some(text) = message.xml_text.as_deref().filter(|text| !text.is_empty()) {
            let _ = write!(output, "\nThe text of the relevant PFIF XML node: {text}");
        }
    }
    if options.show_full_line {
        let excerpt = message
            .line
            .and_then(|line| line.checked_sub(1))
            .and_then(|index| xml_lines.get(index));
        if let Some(excerpt) = excerpt {
            let _ = write!(output, "\n{excerpt}");
        }
    }
    output.push('\n');
}

/// Summary block followed by the detailed listing.
pub fn render_report(messages: &[Message], options: &ReportOptions, xml_lines: &[String]) -> String {
    let mut output = ReportSummary::from_messages(messages).render();
    output.push('\n');
    output.push_str(&render_messages(messages, options, xml_lines));
    output
}
