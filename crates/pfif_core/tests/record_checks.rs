use chrono::{TimeZone, Utc};
use pfif_core::{Category, Message, PfifDocument, Severity, Validator};

fn validate(xml: &str) -> Vec<Message> {
    let doc = PfifDocument::parse(xml).unwrap();
    let now = Utc.with_ymd_and_hms(1999, 3, 1, 0, 0, 0).unwrap();
    Validator::with_now(&doc, now).run().unwrap()
}

fn of_category(messages: &[Message], category: Category) -> Vec<&Message> {
    messages
        .iter()
        .filter(|message| message.category == category)
        .collect()
}

fn document(body: &str) -> String {
    format!(r#"<pfif:pfif xmlns:pfif="http://zesty.ca/pfif/1.2">{body}</pfif:pfif>"#)
}

fn person(id: &str, notes: &str) -> String {
    format!(
        "<pfif:person><pfif:person_record_id>{id}</pfif:person_record_id><pfif:first_name>Ann</pfif:first_name><pfif:last_name>Lee</pfif:last_name>{notes}</pfif:person>"
    )
}

fn nested_note(id: &str, extra: &str) -> String {
    format!(
        "<pfif:note><pfif:note_record_id>{id}</pfif:note_record_id>{extra}<pfif:author_name>Bob</pfif:author_name><pfif:source_date>2010-01-01T00:00:00Z</pfif:source_date><pfif:text>Seen.</pfif:text></pfif:note>"
    )
}

fn owner(id: &str) -> String {
    format!("<pfif:person_record_id>{id}</pfif:person_record_id>")
}

fn link(id: &str) -> String {
    format!("<pfif:linked_person_record_id>{id}</pfif:linked_person_record_id>")
}

#[test]
fn duplicate_person_and_note_ids_yield_two_errors() {
    let xml = document(&format!(
        "{}{}",
        person("example.org/p1", &nested_note("example.org/n1", "")),
        person("example.org/p1", &nested_note("example.org/n1", "")),
    ));
    let messages = validate(&xml);
    let duplicates = of_category(&messages, Category::DuplicateId);
    assert_eq!(messages.len(), 2);
    assert_eq!(duplicates.len(), 2);
    assert_eq!(duplicates[0].xml_tag.as_deref(), Some("person"));
    assert_eq!(duplicates[1].xml_tag.as_deref(), Some("note"));
    assert_eq!(duplicates[1].note_record_id.as_deref(), Some("example.org/n1"));
}

#[test]
fn top_level_and_nested_notes_share_one_id_space() {
    let top_level = format!(
        "<pfif:note><pfif:note_record_id>example.org/n1</pfif:note_record_id>{}<pfif:author_name>Bob</pfif:author_name><pfif:source_date>2010-01-01T00:00:00Z</pfif:source_date><pfif:text>Seen.</pfif:text></pfif:note>",
        owner("example.org/p1")
    );
    let xml = document(&format!(
        "{}{top_level}",
        person("example.org/p1", &nested_note("example.org/n1", ""))
    ));
    assert_eq!(of_category(&validate(&xml), Category::DuplicateId).len(), 1);
}

#[test]
fn top_level_note_without_owner_is_one_ownership_error() {
    let xml = document(
        "<pfif:note><pfif:note_record_id>example.org/n1</pfif:note_record_id><pfif:author_name>Bob</pfif:author_name><pfif:source_date>2010-01-01T00:00:00Z</pfif:source_date><pfif:text>Seen.</pfif:text></pfif:note>",
    );
    let messages = validate(&xml);
    assert_eq!(
        of_category(&messages, Category::TopLevelNoteMissingPerson).len(),
        1
    );
    let missing = of_category(&messages, Category::MissingMandatoryField);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].xml_tag.as_deref(), Some("person_record_id"));
}

#[test]
fn nested_note_with_other_owner_names_both_ids() {
    let xml = document(&person(
        "example.org/p1",
        &nested_note("example.org/n1", &owner("example.org/p2")),
    ));
    let messages = validate(&xml);
    assert_eq!(messages.len(), 1);
    let mismatch = &messages[0];
    assert_eq!(mismatch.category, Category::NotePersonMismatch);
    assert_eq!(mismatch.person_record_id.as_deref(), Some("example.org/p1"));
    assert_eq!(mismatch.note_record_id.as_deref(), Some("example.org/n1"));
    assert_eq!(mismatch.xml_tag.as_deref(), Some("person_record_id"));
    assert_eq!(mismatch.xml_text.as_deref(), Some("example.org/p2"));
}

#[test]
fn nested_note_naming_its_parent_is_fine() {
    let xml = document(&person(
        "example.org/p1",
        &nested_note("example.org/n1", &owner("example.org/p1")),
    ));
    assert!(validate(&xml).is_empty());
}

#[test]
fn one_sided_link_warns_until_reciprocated() {
    let one_sided = document(&format!(
        "{}{}",
        person(
            "example.org/p1",
            &nested_note("example.org/n1", &link("example.org/p2"))
        ),
        person("example.org/p2", ""),
    ));
    let messages = validate(&one_sided);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].category, Category::AsymmetricLink);
    assert_eq!(messages[0].severity, Severity::Warning);
    assert_eq!(messages[0].xml_tag.as_deref(), Some("linked_person_record_id"));
    assert_eq!(messages[0].note_record_id.as_deref(), Some("example.org/n1"));

    let reciprocated = document(&format!(
        "{}{}",
        person(
            "example.org/p1",
            &nested_note("example.org/n1", &link("example.org/p2"))
        ),
        person(
            "example.org/p2",
            &nested_note("example.org/n2", &link("example.org/p1"))
        ),
    ));
    assert!(validate(&reciprocated).is_empty());
}

#[test]
fn top_level_note_links_on_behalf_of_its_owner() {
    let reciprocal = format!(
        "<pfif:note><pfif:note_record_id>example.org/n2</pfif:note_record_id>{}{}<pfif:author_name>Bob</pfif:author_name><pfif:source_date>2010-01-01T00:00:00Z</pfif:source_date><pfif:text>Same person.</pfif:text></pfif:note>",
        owner("example.org/p2"),
        link("example.org/p1")
    );
    let xml = document(&format!(
        "{}{reciprocal}",
        person(
            "example.org/p1",
            &nested_note("example.org/n1", &link("example.org/p2"))
        ),
    ));
    assert!(validate(&xml).is_empty());
}

#[test]
fn repeated_link_claims_warn_once() {
    let notes = format!(
        "{}{}",
        nested_note("example.org/n1", &link("example.org/p2")),
        nested_note("example.org/n2", &link("example.org/p2"))
    );
    let xml = document(&person("example.org/p1", &notes));
    assert_eq!(of_category(&validate(&xml), Category::AsymmetricLink).len(), 1);
}
