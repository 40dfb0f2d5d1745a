//! Person and note record accessors.
//!
//! Classification is purely structural (by tag); nothing is filtered or
//! deduplicated here.

use super::{Element, PfifDocument};
use crate::catalog::{NOTE_TAG, PERSON_TAG};

impl PfifDocument {
    /// Persons directly under the root, in document order.
    pub fn all_persons(&self) -> Vec<&Element> {
        self.fields(&self.root, PERSON_TAG).collect()
    }

    /// Notes directly under the root.
    pub fn top_level_notes(&self) -> Vec<&Element> {
        self.fields(&self.root, NOTE_TAG).collect()
    }

    /// Notes nested inside `person`.
    pub fn notes_of<'a>(&'a self, person: &'a Element) -> Vec<&'a Element> {
        self.fields(person, NOTE_TAG).collect()
    }

    /// Notes nested inside any person.
    pub fn child_notes(&self) -> Vec<&Element> {
        self.all_persons()
            .into_iter()
            .flat_map(|person| self.fields(person, NOTE_TAG))
            .collect()
    }

    /// Top-level notes followed by nested notes.
    pub fn all_notes(&self) -> Vec<&Element> {
        let mut notes = self.top_level_notes();
        notes.extend(self.child_notes());
        notes
    }
}
