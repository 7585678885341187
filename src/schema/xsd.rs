//! Small helpers over the XML document model.

use std::fs;
use std::path::Path;

use roxmltree::Node;

use crate::constants::XSD_NAMESPACE;

use super::errors::{SchemaError, SchemaResult};

/// Reads a schema document into memory.
pub(crate) fn load(path: &Path) -> SchemaResult<String> {
    fs::read_to_string(path)
        .map_err(|e| SchemaError::Io { file: path.display().to_string(), source: e })
}

/// True for an element with the given local name in the XML Schema
/// namespace.
pub(crate) fn is_xsd(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(XSD_NAMESPACE)
        && node.tag_name().name() == name
}

/// The element children of a node, skipping text and comments.
pub(crate) fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// The first child element with the given XSD local name.
pub(crate) fn xsd_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    element_children(node).find(|n| is_xsd(*n, name))
}

/// A mandatory attribute; its absence is a schema error.
pub(crate) fn required_attr<'a>(
    node: Node<'a, '_>,
    name: &str,
    file: &str,
) -> SchemaResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        SchemaError::parse(
            file,
            format!(
                "The element <{}> is missing the required attribute \"{}\"",
                node.tag_name().name(),
                name
            ),
        )
    })
}

/// Strips any namespace prefix from a type reference.
pub(crate) fn local_name(type_attr: &str) -> &str {
    type_attr.rsplit(':').next().unwrap_or(type_attr)
}
