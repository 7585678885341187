//! The enumeration table compiled from the allowed-value document.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use roxmltree::Document;

use crate::constants;

use super::errors::{SchemaError, SchemaResult};
use super::xsd;

/// Maps each enumeration-type name to its allowed values, including the
/// values contributed transitively by union types. Built once from the
/// allowed-value document and read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct EnumerationTable {
    types: HashMap<String, Vec<String>>,
}

impl EnumerationTable {
    /// Compiles the allowed-value document.
    ///
    /// Every simple type contributes its literal enumeration values. Union
    /// types (declared over `avs:`-prefixed member types) are expanded by
    /// repeated passes until a fixpoint; a member that never resolves is a
    /// schema error.
    pub fn from_document(path: &Path) -> SchemaResult<Self> {
        let file = path.display().to_string();
        let text = xsd::load(path)?;
        let doc = Document::parse(&text)
            .map_err(|e| SchemaError::Xml { file: file.clone(), source: e })?;

        let mut types: HashMap<String, Vec<String>> = HashMap::new();
        let mut unions: Vec<(String, Vec<String>)> = Vec::new();
        for element in xsd::element_children(doc.root_element()) {
            if !xsd::is_xsd(element, "simpleType") {
                continue;
            }
            let name = xsd::required_attr(element, "name", &file)?;
            if let Some(union) = xsd::xsd_child(element, "union") {
                let members = xsd::required_attr(union, "memberTypes", &file)?
                    .split_whitespace()
                    .map(|m| {
                        m.strip_prefix(constants::ENUM_TYPE_PREFIX).unwrap_or(m).to_string()
                    })
                    .collect();
                types.insert(name.to_string(), Vec::new());
                unions.push((name.to_string(), members));
            } else if let Some(restriction) = xsd::xsd_child(element, "restriction") {
                let mut values = Vec::new();
                for facet in xsd::element_children(restriction) {
                    if xsd::is_xsd(facet, "enumeration") {
                        values.push(xsd::required_attr(facet, "value", &file).map_err(|_| {
                            SchemaError::parse(
                                &file,
                                format!("Malformed allowed-value element: {}.", name),
                            )
                        })?.to_string());
                    }
                }
                types.insert(name.to_string(), values);
            } else {
                return Err(SchemaError::parse(
                    &file,
                    format!("Malformed allowed-value element: {}.", name),
                ));
            }
        }

        resolve_unions(&mut types, unions, &file)?;
        Ok(Self { types })
    }

    /// The allowed values of an enumeration type, in declaration order.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.types.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Expands union types until no progress is possible. A round that
/// resolves nothing while unions remain means an undeclared or cyclic
/// member.
fn resolve_unions(
    types: &mut HashMap<String, Vec<String>>,
    mut unions: Vec<(String, Vec<String>)>,
    file: &str,
) -> SchemaResult<()> {
    while !unions.is_empty() {
        let blocked: HashSet<String> = unions.iter().map(|(name, _)| name.clone()).collect();
        let mut ready = Vec::new();
        let mut still = Vec::new();
        for (name, members) in unions {
            let resolvable = members
                .iter()
                .all(|m| types.contains_key(m) && !blocked.contains(m));
            if resolvable {
                ready.push((name, members));
            } else {
                still.push((name, members));
            }
        }
        if ready.is_empty() {
            let (name, members) = &still[0];
            let missing = members
                .iter()
                .find(|m| !types.contains_key(*m) || blocked.contains(*m))
                .map(|m| m.as_str())
                .unwrap_or("?");
            return Err(SchemaError::parse(
                file,
                format!(
                    "The member type {} of the union type {} cannot be resolved.",
                    missing, name
                ),
            ));
        }
        for (name, members) in ready {
            let mut values = Vec::new();
            for member in &members {
                if let Some(contributed) = types.get(member) {
                    values.extend(contributed.iter().cloned());
                }
            }
            types.insert(name, values);
        }
        unions = still;
    }
    Ok(())
}
