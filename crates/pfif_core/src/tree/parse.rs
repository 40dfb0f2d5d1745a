//! XML text to `PfifDocument`.

use super::{Element, PfifDocument};
use crate::catalog::{PfifVersion, UnsupportedVersion, ROOT_TAG};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

// Namespace form: http://zesty.ca/pfif/VERSION
static PFIF_NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^http://zesty\.ca/pfif/([0-9]\.[0-9])").expect("valid namespace regex")
});

/// Reasons a document cannot be validated at all.
#[derive(Debug)]
pub enum ParseError {
    /// Input is not well-formed XML.
    Xml(roxmltree::Error),
    /// Root element carries no namespace.
    MissingNamespace,
    /// Root element is not `pfif`.
    NotPfifRoot(String),
    /// Root namespace is not `http://zesty.ca/pfif/VERSION`.
    UnrecognizedNamespace(String),
    /// Declared version is outside the catalog.
    UnsupportedVersion(UnsupportedVersion),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "invalid XML: {err}"),
            Self::MissingNamespace => {
                write!(f, "the XML root node does not specify a namespace")
            }
            Self::NotPfifRoot(tag) => write!(f, "the root node must be pfif, found `{tag}`"),
            Self::UnrecognizedNamespace(namespace) => write!(
                f,
                "namespace `{namespace}` is not in the form http://zesty.ca/pfif/VERSION"
            ),
            Self::UnsupportedVersion(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            Self::UnsupportedVersion(err) => Some(err),
            Self::MissingNamespace | Self::NotPfifRoot(_) | Self::UnrecognizedNamespace(_) => None,
        }
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<UnsupportedVersion> for ParseError {
    fn from(value: UnsupportedVersion) -> Self {
        Self::UnsupportedVersion(value)
    }
}

impl PfifDocument {
    /// Parses PFIF XML text.
    ///
    /// # Errors
    /// - Returns `ParseError::Xml` for malformed XML.
    /// - Returns a root/namespace/version error when the root is not a PFIF
    ///   1.1-1.3 `pfif` element.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let started_at = Instant::now();
        match parse_document(xml) {
            Ok(doc) => {
                info!(
                    "event=document_parse module=tree status=ok version={} persons={} duration_ms={}",
                    doc.version,
                    doc.all_persons().len(),
                    started_at.elapsed().as_millis()
                );
                Ok(doc)
            }
            Err(err) => {
                error!(
                    "event=document_parse module=tree status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn parse_document(xml: &str) -> Result<PfifDocument, ParseError> {
    // Feeds may start with a DOCTYPE line.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let parsed = roxmltree::Document::parse_with_options(xml, options)?;
    let root_node = parsed.root_element();

    let namespace = root_node
        .tag_name()
        .namespace()
        .ok_or(ParseError::MissingNamespace)?
        .to_string();
    let root_name = root_node.tag_name().name();
    if root_name != ROOT_TAG {
        return Err(ParseError::NotPfifRoot(root_name.to_string()));
    }

    let declared = PFIF_NAMESPACE_RE
        .captures(&namespace)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| ParseError::UnrecognizedNamespace(namespace.clone()))?;
    let version: PfifVersion = declared.as_str().parse()?;

    Ok(PfifDocument {
        version,
        root: build_element(&parsed, root_node),
        namespace,
        lines: xml.lines().map(str::to_string).collect(),
    })
}

fn build_element(doc: &roxmltree::Document<'_>, node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    Element {
        namespace: tag.namespace().map(str::to_string),
        name: tag.name().to_string(),
        text: node.text().map(str::to_string),
        line: doc.text_pos_at(node.range().start).row as usize,
        children: node
            .children()
            .filter(roxmltree::Node::is_element)
            .map(|child| build_element(doc, child))
            .collect(),
    }
}
