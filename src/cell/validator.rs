//! Validation and coercion of raw field values.

use std::collections::HashSet;
use std::str;

use regex::Regex;

use crate::constants;
use crate::logging::{DiagnosticsError, ReportLogger};
use crate::record::CellData;

use super::errors::{CellFailure, CellLocation};

/// The declared kind of a cell. A closed set; dispatch is a `match`.
#[derive(Debug, Clone)]
pub enum CellKind {
    /// Any valid UTF-8 text.
    Text,
    /// A decimal number that is mathematically integral.
    Integer,
    /// A floating-point number.
    Decimal,
    /// "true" or "false", case-insensitively.
    Boolean,
    /// Text fully matching a declared pattern facet.
    Pattern { regex: Regex, expected: String },
    /// Membership in a fixed allowed-value set, compared case-insensitively.
    FixedString { declared: Vec<String>, allowed: HashSet<String> },
}

impl CellKind {
    /// A pattern kind from a schema pattern facet. The pattern must match
    /// the whole value, so it is anchored on both ends.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(CellKind::Pattern { regex, expected: format!("of the form \"{}\"", source) })
    }

    /// The ISO 8601 duration specialization of the pattern kind.
    pub fn duration() -> Self {
        CellKind::Pattern {
            regex: constants::duration_pattern().clone(),
            expected: "ISO 8601 duration".to_string(),
        }
    }

    /// The ISO 8601 date-time specialization of the pattern kind.
    pub fn date_time() -> Self {
        CellKind::Pattern {
            regex: constants::datetime_pattern().clone(),
            expected: "ISO 8601 dateTime".to_string(),
        }
    }

    /// An enumeration kind over the given allowed values.
    pub fn fixed_string(declared: Vec<String>) -> Self {
        let allowed = declared.iter().map(|v| v.to_uppercase()).collect();
        CellKind::FixedString { declared, allowed }
    }

    /// The human-readable expectation used in failure messages.
    fn expected_value(&self) -> String {
        match self {
            CellKind::Text => "a string".to_string(),
            CellKind::Integer => "an integer".to_string(),
            CellKind::Decimal => "a decimal".to_string(),
            CellKind::Boolean => "a boolean".to_string(),
            CellKind::Pattern { expected, .. } => expected.clone(),
            CellKind::FixedString { declared, .. } => {
                format!("one of the following: {:?}", declared)
            }
        }
    }
}

/// Location of the row under validation, passed through for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub file_name: &'a str,
    pub row_number: u64,
    pub block_number: Option<u64>,
}

impl CellContext<'_> {
    fn location(&self) -> CellLocation {
        CellLocation {
            row_number: self.row_number,
            file_name: self.file_name.to_string(),
            block_number: self.block_number,
        }
    }
}

/// Validates one field position of a row type.
#[derive(Debug, Clone)]
pub struct CellValidator {
    name: String,
    kind: CellKind,
    required: bool,
    repeated: bool,
}

impl CellValidator {
    pub fn new(name: impl Into<String>, kind: CellKind, required: bool, repeated: bool) -> Self {
        Self { name: name.into(), kind, required, repeated }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Validates a raw field value.
    ///
    /// Returns the typed payload, or `None` when the cell must be omitted
    /// from its row: an empty optional, or a failed validation (which is
    /// logged). Only a fail-fast logger escalation comes back as an error.
    pub fn validate(
        &self,
        raw: &[u8],
        ctx: CellContext<'_>,
        logger: &ReportLogger,
    ) -> Result<Option<CellData>, DiagnosticsError> {
        match self.check(raw, ctx, logger) {
            Ok(data) => Ok(data),
            Err(failure) => {
                logger.error(&failure)?;
                Ok(None)
            }
        }
    }

    fn check(
        &self,
        raw: &[u8],
        ctx: CellContext<'_>,
        logger: &ReportLogger,
    ) -> Result<Option<CellData>, CellFailure> {
        if raw.is_empty() {
            if self.required {
                return Err(CellFailure::RequiredMissing {
                    cell_name: self.name.clone(),
                    expected: self.kind.expected_value(),
                    location: ctx.location(),
                });
            }
            return Ok(None);
        }
        let parts: Vec<&[u8]> = if self.repeated {
            raw.split(|b| *b == constants::REPEATED_VALUE_DELIMITER).collect()
        } else {
            vec![raw]
        };
        let data = match &self.kind {
            CellKind::Text => CellData::Strings(
                parts.iter().map(|p| self.text(p, ctx)).collect::<Result<_, _>>()?,
            ),
            CellKind::Integer => CellData::Integers(
                parts
                    .iter()
                    .map(|p| self.integer(p, ctx, logger))
                    .collect::<Result<_, _>>()?,
            ),
            CellKind::Decimal => CellData::Decimals(
                parts.iter().map(|p| self.decimal(p, ctx)).collect::<Result<_, _>>()?,
            ),
            CellKind::Boolean => CellData::Booleans(
                parts.iter().map(|p| self.boolean(p, ctx)).collect::<Result<_, _>>()?,
            ),
            CellKind::Pattern { regex, .. } => CellData::Strings(
                parts
                    .iter()
                    .map(|p| self.matching(regex, p, ctx))
                    .collect::<Result<_, _>>()?,
            ),
            CellKind::FixedString { allowed, .. } => CellData::Strings(
                parts
                    .iter()
                    .map(|p| self.member(allowed, p, ctx))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Some(data))
    }

    /// UTF-8 decoding for the text kind; failure is a bad-encoding error
    /// carrying the decoding diagnostic.
    fn text(&self, part: &[u8], ctx: CellContext<'_>) -> Result<String, CellFailure> {
        match str::from_utf8(part) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(CellFailure::BadEncoding {
                cell_name: self.name.clone(),
                detail: e.to_string(),
                location: ctx.location(),
            }),
        }
    }

    /// UTF-8 decoding for non-text kinds; failure is a type mismatch.
    fn utf8<'v>(&self, part: &'v [u8], ctx: CellContext<'_>) -> Result<&'v str, CellFailure> {
        str::from_utf8(part).map_err(|_| self.mismatch(part, ctx))
    }

    fn mismatch(&self, part: &[u8], ctx: CellContext<'_>) -> CellFailure {
        CellFailure::InvalidValue {
            cell_name: self.name.clone(),
            value: String::from_utf8_lossy(part).into_owned(),
            expected: self.kind.expected_value(),
            location: ctx.location(),
        }
    }

    fn integer(
        &self,
        part: &[u8],
        ctx: CellContext<'_>,
        logger: &ReportLogger,
    ) -> Result<i64, CellFailure> {
        let value = self.utf8(part, ctx)?;
        if let Ok(number) = value.parse::<f64>() {
            if number.is_finite() && number.fract() == 0.0 {
                if value.contains('.') {
                    logger.warning(format!(
                        "The cell {} in line number {} (file={}) is a decimal ({}), \
                         but expected to be an integer.",
                        self.name, ctx.row_number, ctx.file_name, value
                    ));
                }
                return Ok(number as i64);
            }
        }
        Err(self.mismatch(part, ctx))
    }

    fn decimal(&self, part: &[u8], ctx: CellContext<'_>) -> Result<f64, CellFailure> {
        let value = self.utf8(part, ctx)?;
        value.parse::<f64>().map_err(|_| self.mismatch(part, ctx))
    }

    fn boolean(&self, part: &[u8], ctx: CellContext<'_>) -> Result<bool, CellFailure> {
        let value = self.utf8(part, ctx)?;
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.mismatch(part, ctx))
        }
    }

    fn matching(
        &self,
        regex: &Regex,
        part: &[u8],
        ctx: CellContext<'_>,
    ) -> Result<String, CellFailure> {
        let value = self.utf8(part, ctx)?;
        if regex.is_match(value) {
            Ok(value.to_string())
        } else {
            Err(self.mismatch(part, ctx))
        }
    }

    fn member(
        &self,
        allowed: &HashSet<String>,
        part: &[u8],
        ctx: CellContext<'_>,
    ) -> Result<String, CellFailure> {
        let value = self.utf8(part, ctx)?.to_uppercase();
        if allowed.contains(&value) {
            Ok(value)
        } else {
            Err(self.mismatch(part, ctx))
        }
    }
}
