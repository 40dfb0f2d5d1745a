//! Immutable PFIF document tree.
//!
//! # Responsibility
//! - Turn PFIF XML text into an owned element tree with source line numbers.
//! - Resolve the declared PFIF version from the root namespace.
//! - Offer namespace-aware field lookups and record accessors to validators.
//!
//! # Invariants
//! - A `PfifDocument` always has a supported version; unsupported or unknown
//!   versions are rejected at construction.
//! - The tree is never mutated after construction.
//! - Field lookups only match children in the document namespace; structural
//!   scans (`Element::children`) see every child element.

mod parse;
mod records;

use crate::catalog::PfifVersion;

pub use parse::ParseError;

/// One XML element with its local name, namespace, leading text and line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    text: Option<String>,
    line: usize,
    children: Vec<Element>,
}

impl Element {
    /// Local tag name without namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Text before the first child element; `None` when absent or empty.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    pub fn has_text(&self) -> bool {
        self.text().is_some()
    }

    /// 1-based line of the element's start tag.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// `{namespace}name`, or the bare name for elements without namespace.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{{{namespace}}}{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Parsed PFIF document: root element, declared version and source lines.
#[derive(Debug, Clone)]
pub struct PfifDocument {
    version: PfifVersion,
    namespace: String,
    root: Element,
    lines: Vec<String>,
}

impl PfifDocument {
    pub fn version(&self) -> PfifVersion {
        self.version
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Source text split into lines, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Source line by 1-based number.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// Turns a local tag into `{namespace}tag`.
    pub fn qualify(&self, tag: &str) -> String {
        format!("{{{}}}{tag}", self.namespace)
    }

    /// Whether `element` is `tag` in the document namespace.
    pub fn is_tag(&self, element: &Element, tag: &str) -> bool {
        element.name == tag && element.namespace.as_deref() == Some(self.namespace.as_str())
    }

    /// First child of `parent` named `tag`.
    pub fn field<'a>(&self, parent: &'a Element, tag: &str) -> Option<&'a Element> {
        parent.children.iter().find(|child| self.is_tag(child, tag))
    }

    /// Every child of `parent` named `tag`, in document order.
    pub fn fields<'a>(
        &'a self,
        parent: &'a Element,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        parent
            .children
            .iter()
            .filter(move |child| self.is_tag(child, tag))
    }

    /// Text of the first child named `tag`, if that child exists and has text.
    pub fn field_text<'a>(&self, parent: &'a Element, tag: &str) -> Option<&'a str> {
        self.field(parent, tag).and_then(Element::text)
    }
}
