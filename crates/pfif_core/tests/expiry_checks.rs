use chrono::{DateTime, TimeZone, Utc};
use pfif_core::{Category, Message, PfifDocument, ValidationError, Validator};

const EXPIRY: &str = "1999-02-03T04:05:06Z";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1999, 3, 1, 0, 0, 0).unwrap()
}

fn validate_at(xml: &str, now: DateTime<Utc>) -> Vec<Message> {
    let doc = PfifDocument::parse(xml).unwrap();
    Validator::with_now(&doc, now).run().unwrap()
}

fn validate(xml: &str) -> Vec<Message> {
    validate_at(xml, now())
}

fn categories(messages: &[Message]) -> Vec<Category> {
    messages.iter().map(|message| message.category).collect()
}

fn document(body: &str) -> String {
    format!("<pfif:pfif xmlns:pfif=\"http://zesty.ca/pfif/1.3\">\n{body}\n</pfif:pfif>")
}

/// Expired placeholder with matching dates; `extra` is appended inside.
fn placeholder(expiry: &str, source: &str, entry: &str, extra: &str) -> String {
    format!(
        "<pfif:person>\n\
         <pfif:person_record_id>example.org/p1</pfif:person_record_id>\n\
         <pfif:expiry_date>{expiry}</pfif:expiry_date>\n\
         <pfif:source_date>{source}</pfif:source_date>\n\
         <pfif:entry_date>{entry}</pfif:entry_date>\n\
         <pfif:full_name></pfif:full_name>\n\
         {extra}</pfif:person>"
    )
}

#[test]
fn purged_placeholder_has_no_lifecycle_errors() {
    let messages = validate(&document(&placeholder(EXPIRY, EXPIRY, EXPIRY, "")));
    assert_eq!(categories(&messages), vec![Category::EmptyField]);
}

#[test]
fn expired_person_with_other_data_is_unpurged() {
    let xml = document(&placeholder(
        EXPIRY,
        EXPIRY,
        EXPIRY,
        "<pfif:other>description: tall</pfif:other>\n",
    ));
    let messages = validate(&xml);
    let unpurged: Vec<&Message> = messages
        .iter()
        .filter(|message| message.category == Category::ExpiredPersonalData)
        .collect();
    assert_eq!(unpurged.len(), 1);
    assert_eq!(unpurged[0].xml_tag.as_deref(), Some("other"));
    assert_eq!(unpurged[0].line, Some(8));
    assert_eq!(unpurged[0].person_record_id.as_deref(), Some("example.org/p1"));
}

#[test]
fn grace_day_is_measured_from_expiry() {
    let xml = document(&placeholder(
        EXPIRY,
        EXPIRY,
        EXPIRY,
        "<pfif:other>still here</pfif:other>\n",
    ));
    let inside_grace = Utc.with_ymd_and_hms(1999, 2, 4, 4, 5, 6).unwrap();
    let just_past = Utc.with_ymd_and_hms(1999, 2, 4, 4, 5, 7).unwrap();
    assert!(!categories(&validate_at(&xml, inside_grace)).contains(&Category::ExpiredPersonalData));
    assert!(categories(&validate_at(&xml, just_past)).contains(&Category::ExpiredPersonalData));
}

#[test]
fn records_without_expiry_are_never_expired() {
    let xml = document(
        "<pfif:person>\
         <pfif:person_record_id>example.org/p1</pfif:person_record_id>\
         <pfif:source_date>1990-01-01T00:00:00Z</pfif:source_date>\
         <pfif:full_name>Ann Lee</pfif:full_name>\
         </pfif:person>",
    );
    assert!(validate(&xml).is_empty());
}

#[test]
fn unsynced_placeholder_dates_are_an_error() {
    let messages = validate(&document(&placeholder(
        EXPIRY,
        EXPIRY,
        "1999-02-03T04:05:07Z",
        "",
    )));
    assert_eq!(
        categories(&messages),
        vec![Category::EmptyField, Category::PlaceholderDatesMismatch]
    );
    assert_eq!(messages[1].line, Some(2));
    assert_eq!(messages[1].xml_tag.as_deref(), Some("person"));
}

#[test]
fn late_placeholder_is_reported_at_source_date() {
    let late = "1999-02-05T00:00:00Z";
    let messages = validate(&document(&placeholder(EXPIRY, late, late, "")));
    assert_eq!(
        categories(&messages),
        vec![Category::EmptyField, Category::PlaceholderCreatedLate]
    );
    assert_eq!(messages[1].line, Some(5));
    assert_eq!(messages[1].xml_text.as_deref(), Some(late));
}

#[test]
fn missing_placeholder_source_date_is_one_mismatch() {
    let xml = document(
        "<pfif:person>\n\
         <pfif:person_record_id>example.org/p1</pfif:person_record_id>\n\
         <pfif:expiry_date>1999-02-03T04:05:06Z</pfif:expiry_date>\n\
         <pfif:entry_date>1999-02-03T04:05:06Z</pfif:entry_date>\n\
         <pfif:full_name></pfif:full_name>\n\
         </pfif:person>",
    );
    let messages = validate(&xml);
    assert_eq!(
        categories(&messages),
        vec![
            Category::MissingMandatoryField,
            Category::EmptyField,
            Category::PlaceholderDatesMismatch
        ]
    );
}

#[test]
fn notes_of_expired_person_are_personal_data() {
    let nested = "<pfif:note>\n\
                  <pfif:note_record_id>example.org/n1</pfif:note_record_id>\n\
                  <pfif:author_name>Bob</pfif:author_name>\n\
                  <pfif:source_date>1999-01-01T00:00:00Z</pfif:source_date>\n\
                  <pfif:text>Seen.</pfif:text>\n\
                  </pfif:note>\n";
    let top_level = "<pfif:note>\
                     <pfif:note_record_id>example.org/n2</pfif:note_record_id>\
                     <pfif:person_record_id>example.org/p1</pfif:person_record_id>\
                     <pfif:author_name>Cy</pfif:author_name>\
                     <pfif:source_date>1999-01-01T00:00:00Z</pfif:source_date>\
                     <pfif:text>Also seen.</pfif:text>\
                     </pfif:note>";
    let xml = document(&format!(
        "{}\n{top_level}",
        placeholder(EXPIRY, EXPIRY, EXPIRY, nested)
    ));
    let unpurged: Vec<Message> = validate(&xml)
        .into_iter()
        .filter(|message| message.category == Category::ExpiredPersonalData)
        .collect();
    let tags: Vec<(&str, &str)> = unpurged
        .iter()
        .map(|message| {
            (
                message.note_record_id.as_deref().unwrap(),
                message.xml_tag.as_deref().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        tags,
        vec![
            ("example.org/n1", "note_record_id"),
            ("example.org/n1", "author_name"),
            ("example.org/n1", "text"),
            ("example.org/n2", "note_record_id"),
            ("example.org/n2", "author_name"),
            ("example.org/n2", "text"),
        ]
    );
}

#[test]
fn malformed_expiry_date_is_a_format_error_only() {
    let xml = document(&placeholder(
        "2010-01-01",
        EXPIRY,
        EXPIRY,
        "<pfif:bogus/>\n",
    ))
    .replace("example.org/p1", "bad id");
    let messages = validate(&xml);
    assert_eq!(
        categories(&messages),
        vec![
            Category::InvalidFieldFormat,
            Category::InvalidFieldFormat,
            Category::EmptyField,
            Category::ExtraneousTag,
        ]
    );
    assert_eq!(messages[0].xml_tag.as_deref(), Some("person_record_id"));
    assert_eq!(messages[1].xml_tag.as_deref(), Some("expiry_date"));
    assert_eq!(messages[1].line, Some(4));
}

#[test]
fn malformed_placeholder_source_date_stops_the_run() {
    let xml = document(&placeholder(EXPIRY, "1999-02-03", "1999-02-03", ""));
    let doc = PfifDocument::parse(&xml).unwrap();
    let err = Validator::with_now(&doc, now()).run().unwrap_err();
    assert_eq!(
        err,
        ValidationError::MalformedDate {
            field: "source_date",
            value: "1999-02-03".to_string(),
            line: 5,
        }
    );
}

#[test]
fn expiry_is_ignored_before_1_3() {
    let xml = r#"<pfif:pfif xmlns:pfif="http://zesty.ca/pfif/1.2"><pfif:person><pfif:person_record_id>example.org/p1</pfif:person_record_id><pfif:first_name>Ann</pfif:first_name><pfif:last_name>Lee</pfif:last_name><pfif:expiry_date>1999-02-03</pfif:expiry_date></pfif:person></pfif:pfif>"#;
    let messages = validate_at(xml, now());
    assert_eq!(categories(&messages), vec![Category::ExtraneousTag]);
}
