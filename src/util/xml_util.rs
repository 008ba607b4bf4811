use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};

/// Parses an XML document, tolerating a leading BOM and a DOCTYPE.
pub(crate) fn parse_document(text: &str) -> Result<Document<'_>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    Ok(Document::parse_with_options(text, options)?)
}

/// First child element with the given local name, in any namespace.
pub(crate) fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|node| node.has_tag_name(name))
}

/// Trimmed text of an element, with runs of whitespace collapsed to one space.
pub(crate) fn text_norm(node: &Node) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let text: String = node
        .descendants()
        .filter(|node| node.is_text())
        .filter_map(|node| node.text())
        .collect();

    whitespace.replace_all(text.trim(), " ").to_string()
}
