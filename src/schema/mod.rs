//! Schema loader: parses the schema document into a raw element tree.
//!
//! The loader is the leaf of the pipeline. It knows nothing about interface
//! semantics; it only turns the document into a generic attribute-tagged
//! [`Element`] tree for the builder to walk. Malformed documents fail the
//! whole run with a [`SchemaError`]; there is no partial-load mode.

use std::fs;
use std::path::{Path, PathBuf};

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "schema/document.pest"]
struct DocumentParser;

/// A single node of the raw element tree.
///
/// Attributes keep document order; `text` accumulates all character data
/// directly inside the element (used for `include` identifiers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Find the first direct child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }
}

/// Errors raised while loading a schema document.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("malformed schema:\n{0}")]
    Syntax(Box<pest::error::Error<Rule>>),

    #[error("malformed schema: closing tag </{found}> does not match <{expected}>")]
    MismatchedTag { expected: String, found: String },

    #[error("malformed schema: document has no root element")]
    EmptyDocument,

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read and parse a schema document from disk.
pub fn load_document(path: &Path) -> Result<Element, SchemaError> {
    let input = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&input)
}

/// Parse a schema document from a string.
pub fn parse_document(input: &str) -> Result<Element, SchemaError> {
    let mut pairs = DocumentParser::parse(Rule::document, input)
        .map_err(|err| SchemaError::Syntax(Box::new(err)))?;
    let document = pairs.next().ok_or(SchemaError::EmptyDocument)?;
    let root = document
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::element)
        .ok_or(SchemaError::EmptyDocument)?;
    build_element(root)
}

fn build_element(pair: Pair<Rule>) -> Result<Element, SchemaError> {
    let mut element = Element {
        tag: String::new(),
        attributes: Vec::new(),
        children: Vec::new(),
        text: String::new(),
    };

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::open_tag | Rule::self_closing => read_tag(part, &mut element),
            Rule::element => element.children.push(build_element(part)?),
            Rule::text => element.text.push_str(part.as_str()),
            Rule::close_tag => {
                let closing = part
                    .into_inner()
                    .find(|inner| inner.as_rule() == Rule::name)
                    .map(|inner| inner.as_str().to_owned())
                    .unwrap_or_default();
                if closing != element.tag {
                    return Err(SchemaError::MismatchedTag {
                        expected: element.tag,
                        found: closing,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(element)
}

fn read_tag(pair: Pair<Rule>, element: &mut Element) {
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::name => element.tag = part.as_str().to_owned(),
            Rule::attribute => {
                let mut key = String::new();
                let mut value = String::new();
                for attr_part in part.into_inner() {
                    match attr_part.as_rule() {
                        Rule::name => key = attr_part.as_str().to_owned(),
                        Rule::quoted => {
                            value = attr_part
                                .into_inner()
                                .find(|inner| inner.as_rule() == Rule::attr_value)
                                .map(|inner| inner.as_str().to_owned())
                                .unwrap_or_default();
                        }
                        _ => {}
                    }
                }
                element.attributes.push((key, value));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_with_namespace() {
        let root = parse_document(r#"<interface namespace="wm"></interface>"#).unwrap();
        assert_eq!(root.tag, "interface");
        assert_eq!(root.attr("namespace"), Some("wm"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn parses_nested_elements_in_document_order() {
        let root = parse_document(
            r#"<interface>
                <request name="open">
                    <arg name="path" type="String"/>
                </request>
                <include>ipc/window.h</include>
            </interface>"#,
        )
        .unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].tag, "request");
        assert_eq!(root.children[0].children[0].attr("type"), Some("String"));
        assert_eq!(root.children[1].text.trim(), "ipc/window.h");
    }

    #[test]
    fn skips_prolog_and_comments() {
        let root = parse_document(
            "<?xml version=\"1.0\"?>\n<!-- window protocol -->\n<interface></interface>",
        )
        .unwrap();
        assert_eq!(root.tag, "interface");
    }

    #[test]
    fn rejects_mismatched_close_tag() {
        let err = parse_document("<interface><request></event></interface>").unwrap_err();
        assert!(matches!(err, SchemaError::MismatchedTag { .. }));
    }

    #[test]
    fn rejects_unterminated_document() {
        let err = parse_document("<interface><request name=\"x\">").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(_)));
    }
}
