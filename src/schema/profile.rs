//! Compilation of a profile's content model into a grammar tree.

use std::collections::HashMap;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::conformance::{GrammarNode, MaxOccurs, Occurs};
use crate::constants;

use super::errors::{SchemaError, SchemaResult};
use super::xsd;

/// Naming exception: grouping declarations that end in "profile" without
/// being profiles.
const GROUPING_NAME_PREFIX: &str = "ResourceIdentificationGroupingFor";

/// The outcome of looking a profile up in the row/profile document.
///
/// A missing profile is not itself an error; the caller decides how to
/// surface the diagnostic, which lists the profiles the document does
/// declare.
#[derive(Debug)]
pub enum ProfileLookup {
    Found(GrammarNode),
    Missing { requested: String, available: Vec<String> },
}

/// Compiles the content model of `profile_name` from the row/profile
/// document.
///
/// The document is scanned twice so declarations may reference each other
/// out of order: the first pass records every composite declaration that
/// is not a row type, the second finds the profile declarations and the
/// `<profile>Block` declaration whose children become the grammar tree.
pub fn compile_profile(schema_path: &Path, profile_name: &str) -> SchemaResult<ProfileLookup> {
    let file = schema_path.display().to_string();
    let text = xsd::load(schema_path)?;
    let doc =
        Document::parse(&text).map_err(|e| SchemaError::Xml { file: file.clone(), source: e })?;
    let root = doc.root_element();

    let mut composites: HashMap<&str, Node<'_, '_>> = HashMap::new();
    for element in xsd::element_children(root) {
        if !xsd::is_xsd(element, "complexType") {
            continue;
        }
        let name = composite_name(element, &file)?;
        if !constants::is_row_type(name) {
            composites.insert(name, element);
        }
    }

    let wanted = format!("{}block", profile_name.to_lowercase());
    let mut available = Vec::new();
    let mut found = None;
    for element in xsd::element_children(root) {
        if !xsd::is_xsd(element, "complexType") {
            continue;
        }
        let name = composite_name(element, &file)?;
        if constants::is_row_type(name) {
            continue;
        }
        if is_profile_name(name) {
            available.push(name.to_string());
        }
        if name.to_lowercase() == wanted {
            found = Some(build_root(element, &composites, &file)?);
        }
    }

    match found {
        Some(node) => Ok(ProfileLookup::Found(node)),
        None => {
            Ok(ProfileLookup::Missing { requested: profile_name.to_string(), available })
        }
    }
}

fn composite_name<'a>(element: Node<'a, '_>, file: &str) -> SchemaResult<&'a str> {
    element.attribute("name").ok_or_else(|| {
        SchemaError::parse(file, "Unexpected complexType without a name.".to_string())
    })
}

fn is_profile_name(name: &str) -> bool {
    name.to_lowercase().ends_with("profile") && !name.starts_with(GROUPING_NAME_PREFIX)
}

/// True for the element tags that form the content model.
fn is_structural(node: Node<'_, '_>) -> bool {
    xsd::is_xsd(node, "sequence") || xsd::is_xsd(node, "choice") || xsd::is_xsd(node, "element")
}

fn build_root(
    block: Node<'_, '_>,
    composites: &HashMap<&str, Node<'_, '_>>,
    file: &str,
) -> SchemaResult<GrammarNode> {
    let mut children = build_children(block, composites, file)?;
    if children.is_empty() {
        return Err(SchemaError::parse(
            file,
            format!(
                "The profile block declaration \"{}\" has no content model.",
                block.attribute("name").unwrap_or("?")
            ),
        ));
    }
    // The content model of a profile block is its single structural child.
    let child = children.remove(0);
    Ok(GrammarNode::Root { child: Box::new(child) })
}

fn build_children(
    parent: Node<'_, '_>,
    composites: &HashMap<&str, Node<'_, '_>>,
    file: &str,
) -> SchemaResult<Vec<GrammarNode>> {
    xsd::element_children(parent)
        .filter(|n| is_structural(*n))
        .map(|n| build_node(n, composites, file))
        .collect()
}

/// Builds one grammar node from a structural schema element.
fn build_node(
    element: Node<'_, '_>,
    composites: &HashMap<&str, Node<'_, '_>>,
    file: &str,
) -> SchemaResult<GrammarNode> {
    let occurs = occurs_of(element, file)?;
    let type_attr = element.attribute("type").unwrap_or("");
    if !type_attr.is_empty() && !type_attr.starts_with(constants::SIMPLE_TYPE_PREFIX) {
        return Err(SchemaError::parse(
            file,
            format!(
                "The element \"{}\" with type \"{}\" does not have the \"{}\" prefix. This is \
                 likely caused by the type of the parent element not being recognized as a valid \
                 row type. Please ensure that all row types in the schema document start with the \
                 prefix \"{}\".",
                element.attribute("name").unwrap_or("?"),
                type_attr,
                constants::SIMPLE_TYPE_PREFIX,
                constants::ROW_TYPE_PREFIX
            ),
        ));
    }
    let referenced = xsd::local_name(type_attr);
    if !referenced.is_empty() {
        if constants::is_row_type(referenced) {
            let row_type = referenced[constants::ROW_TYPE_PREFIX.len()..].to_string();
            return Ok(GrammarNode::Leaf { row_type, occurs });
        }
        if let Some(declaration) = composites.get(referenced) {
            // Composite declarations are implicit sequences.
            let children = build_children(*declaration, composites, file)?;
            return Ok(GrammarNode::Sequence { children, occurs });
        }
        return Err(SchemaError::parse(
            file,
            format!(
                "The element \"{}\" with type \"{}\" does not exist in the schema document.",
                element.attribute("name").unwrap_or("?"),
                referenced
            ),
        ));
    }
    let children = build_children(element, composites, file)?;
    if xsd::is_xsd(element, "choice") {
        Ok(GrammarNode::Choice { children, occurs })
    } else {
        Ok(GrammarNode::Sequence { children, occurs })
    }
}

fn occurs_of(element: Node<'_, '_>, file: &str) -> SchemaResult<Occurs> {
    let min = bound(element.attribute("minOccurs").unwrap_or("1"), "minOccurs", file)?;
    let max = match element.attribute("maxOccurs").unwrap_or("1") {
        max if max.eq_ignore_ascii_case("unbounded") => MaxOccurs::Unbounded,
        max => MaxOccurs::Bounded(bound(max, "maxOccurs", file)?),
    };
    Ok(Occurs::new(min, max))
}

fn bound(value: &str, attribute: &str, file: &str) -> SchemaResult<u32> {
    value.parse().map_err(|_| {
        SchemaError::parse(
            file,
            format!(
                "The value \"{}\" is invalid as a {}. Expected an integer/\"unbounded\".",
                value, attribute
            ),
        )
    })
}
