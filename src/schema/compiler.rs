//! Compilation of the row/profile document into a row schema.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::cell::{CellKind, CellValidator};
use crate::constants;
use crate::logging::ReportLogger;

use super::enums::EnumerationTable;
use super::errors::{SchemaError, SchemaResult};
use super::types::RowSchema;
use super::xsd;

/// Compiles the row/profile document and its allowed-value document into
/// a [`RowSchema`].
pub struct SchemaCompiler {
    schema_path: PathBuf,
    enums_path: Option<PathBuf>,
}

impl SchemaCompiler {
    /// A compiler over the given documents. When `enums_path` is absent it
    /// is resolved from the row/profile document's allowed-value import,
    /// relative to that document's directory.
    pub fn new(schema_path: impl Into<PathBuf>, enums_path: Option<PathBuf>) -> Self {
        Self { schema_path: schema_path.into(), enums_path }
    }

    /// Compiles every row-type declaration into its ordered validator
    /// list.
    ///
    /// A structural error inside one row declaration is logged and that
    /// row type is skipped; the final diagnostics check makes the
    /// accumulated errors fatal to the compile as a whole.
    pub fn compile(&self, logger: &ReportLogger) -> SchemaResult<RowSchema> {
        let file = self.schema_path.display().to_string();
        let text = xsd::load(&self.schema_path)?;
        let doc = Document::parse(&text)
            .map_err(|e| SchemaError::Xml { file: file.clone(), source: e })?;
        let root = doc.root_element();

        let enums_path = match &self.enums_path {
            Some(path) => path.clone(),
            None => self.enum_document_location(root, &file)?,
        };
        logger.info(format!("Allowed-value document location: {}", enums_path.display()));
        let enums = EnumerationTable::from_document(&enums_path)?;

        let mut simple_types: HashMap<&str, Node<'_, '_>> = HashMap::new();
        for element in xsd::element_children(root) {
            if xsd::is_xsd(element, "simpleType") {
                simple_types.insert(xsd::required_attr(element, "name", &file)?, element);
            }
        }

        let mut rows = HashMap::new();
        for element in xsd::element_children(root) {
            if !xsd::is_xsd(element, "complexType") {
                continue;
            }
            let name = xsd::required_attr(element, "name", &file)?;
            if !constants::is_row_type(name) {
                continue;
            }
            let row_type = name[constants::ROW_TYPE_PREFIX.len()..].to_string();
            match self.row_validators(element, &simple_types, &enums, &file) {
                Ok(cells) => {
                    rows.insert(row_type, cells);
                }
                Err(e) => logger.error(&e)?,
            }
        }
        logger.raise_if_fatal_errors_found()?;
        Ok(RowSchema::new(rows))
    }

    /// Locates the allowed-value document through the import declaration
    /// carrying its namespace.
    fn enum_document_location(&self, root: Node<'_, '_>, file: &str) -> SchemaResult<PathBuf> {
        for element in xsd::element_children(root) {
            if xsd::is_xsd(element, "import")
                && element.attribute("namespace") == Some(constants::ENUM_NAMESPACE)
            {
                let location = xsd::required_attr(element, "schemaLocation", file)?;
                let base = self.schema_path.parent().unwrap_or_else(|| Path::new("."));
                return Ok(base.join(location));
            }
        }
        Err(SchemaError::parse(
            file,
            format!("No allowed-value import found (namespace = {}).", constants::ENUM_NAMESPACE),
        ))
    }

    /// The field validators of one row declaration, in document order.
    fn row_validators(
        &self,
        row_element: Node<'_, '_>,
        simple_types: &HashMap<&str, Node<'_, '_>>,
        enums: &EnumerationTable,
        file: &str,
    ) -> SchemaResult<Vec<CellValidator>> {
        let mut cells = Vec::new();
        for group in xsd::element_children(row_element) {
            if !xsd::is_xsd(group, "sequence") {
                continue;
            }
            for element in xsd::element_children(group) {
                if !xsd::is_xsd(element, "element") {
                    continue;
                }
                let cell_name = xsd::required_attr(element, "name", file)?;
                let required = is_required(element, file)?;
                let repeated = is_repeated(element);
                let kind = match element.attribute("type") {
                    Some(type_attr) => {
                        self.field_kind(cell_name, type_attr, simple_types, enums, file)?
                    }
                    None => match inline_pattern(element) {
                        Some(pattern) => pattern_kind(pattern, cell_name, file)?,
                        None => {
                            return Err(SchemaError::parse(
                                file,
                                format!(
                                    "Unexpected inline content in the field declaration \"{}\".",
                                    cell_name
                                ),
                            ))
                        }
                    },
                };
                cells.push(CellValidator::new(cell_name, kind, required, repeated));
            }
        }
        Ok(cells)
    }

    /// Resolves a field's type reference: primitive kinds first, then
    /// simple types with a pattern facet, then enumeration references.
    fn field_kind(
        &self,
        cell_name: &str,
        type_attr: &str,
        simple_types: &HashMap<&str, Node<'_, '_>>,
        enums: &EnumerationTable,
        file: &str,
    ) -> SchemaResult<CellKind> {
        match type_attr {
            "xs:string" => return Ok(CellKind::Text),
            "xs:integer" => return Ok(CellKind::Integer),
            "xs:decimal" => return Ok(CellKind::Decimal),
            "xs:boolean" => return Ok(CellKind::Boolean),
            "xs:duration" => return Ok(CellKind::duration()),
            "xs:dateTime" => return Ok(CellKind::date_time()),
            _ => {}
        }
        let mut name = type_attr;
        if name.starts_with(constants::SIMPLE_TYPE_PREFIX) {
            name = xsd::local_name(name);
        }
        if let Some(declaration) = simple_types.get(name) {
            if let Some(pattern) = restriction_pattern(*declaration) {
                return pattern_kind(pattern, cell_name, file);
            }
        }
        let name = name.strip_prefix(constants::ENUM_TYPE_PREFIX).unwrap_or(name);
        match enums.values(name) {
            Some(values) => Ok(CellKind::fixed_string(values.to_vec())),
            None => Err(SchemaError::parse(
                file,
                format!(
                    "The cell type {} does not exist in the provided configuration files. \
                     Please make sure you use the right files and version.",
                    name
                ),
            )),
        }
    }
}

/// A field is optional when its declaration carries `minOccurs="0"`.
fn is_required(element: Node<'_, '_>, file: &str) -> SchemaResult<bool> {
    let min_occurs = element.attribute("minOccurs").unwrap_or("1");
    let min: u32 = min_occurs.parse().map_err(|_| {
        SchemaError::parse(
            file,
            format!("The value \"{}\" is invalid as a minOccurs. Expected an integer.", min_occurs),
        )
    })?;
    Ok(min == 1)
}

/// A field is repeated when its declaration carries
/// `maxOccurs="unbounded"`.
fn is_repeated(element: Node<'_, '_>) -> bool {
    element
        .attribute("maxOccurs")
        .map(|max| max.eq_ignore_ascii_case("unbounded"))
        .unwrap_or(false)
}

/// The pattern facet of an inline simple type, if that is what the
/// element declares.
fn inline_pattern<'a>(element: Node<'a, '_>) -> Option<&'a str> {
    restriction_pattern(xsd::xsd_child(element, "simpleType")?)
}

/// The pattern facet of a simple type declaration.
fn restriction_pattern<'a>(declaration: Node<'a, '_>) -> Option<&'a str> {
    let restriction = xsd::xsd_child(declaration, "restriction")?;
    xsd::xsd_child(restriction, "pattern")?.attribute("value")
}

fn pattern_kind(pattern: &str, cell_name: &str, file: &str) -> SchemaResult<CellKind> {
    CellKind::pattern(pattern).map_err(|e| {
        SchemaError::parse(
            file,
            format!(
                "The pattern \"{}\" in the declaration of \"{}\" is not a valid \
                 regular expression: {}",
                pattern, cell_name, e
            ),
        )
    })
}
