//! Constants of the flat-file report format.

use std::sync::OnceLock;

use regex::Regex;

/// Primary field delimiter of the flat file.
pub const FIELD_DELIMITER: u8 = b'\t';

/// Secondary delimiter separating the values of a repeated field.
pub const REPEATED_VALUE_DELIMITER: u8 = b'|';

/// Escape character; the byte following it is taken literally.
pub const ESCAPE: u8 = b'\\';

/// Lines beginning with this byte are comments.
pub const COMMENT_MARKER: u8 = b'#';

/// Every row-type declaration in the schema document carries this name
/// prefix.
pub const ROW_TYPE_PREFIX: &str = "RecordType-";

/// Namespace prefix of simple types declared in the schema document itself.
pub const SIMPLE_TYPE_PREFIX: &str = "dsrf:";

/// Namespace prefix of enumeration types from the allowed-value document.
pub const ENUM_TYPE_PREFIX: &str = "avs:";

/// The XML Schema namespace used to recognize structural elements.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespace under which the allowed-value document is imported from the
/// row/profile document.
pub const ENUM_NAMESPACE: &str = "http://ddex.net/xml/avs/avs";

/// The literal row type of the file header record that carries the report
/// version, profile name and profile version.
pub const FILE_HEADER_ROW_TYPE: &str = "HEAD";

/// Row types forming the terminal footer block of a file.
pub const FOOTER_ROW_TYPES: [&str; 2] = ["FOOT", "FFOO"];

/// Filename suffix signalling a gzip-compressed report file.
pub const GZIP_SUFFIX: &str = ".gz";

/// Returns true if `code` names a row-type declaration.
pub fn is_row_type(code: &str) -> bool {
    code.starts_with(ROW_TYPE_PREFIX)
}

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("constant pattern compiles"))
}

/// Row types occurring only at the top of a file: summary rows and the
/// file/message header codes.
pub fn header_row_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(?:SY[0-9]{2,4}$|HEAD|FHEA)")
}

/// Versioned row-type codes carry a period, e.g. "SY02.01".
pub fn versioned_row_type_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Z]{2}[0-9]{2}\.[0-9]{2}$")
}

/// ISO 8601 duration. The alternation requires at least one component (or
/// the time designator) after "P"; a bare "P" is not a duration.
pub const DURATION_PATTERN: &str = r"(?x)^[+-]?P(?:
    (?:
      [0-9]+(?:[,.][0-9]+)?Y(?:[0-9]+(?:[,.][0-9]+)?M)?(?:[0-9]+(?:[,.][0-9]+)?W)?(?:[0-9]+(?:[,.][0-9]+)?D)?
     |[0-9]+(?:[,.][0-9]+)?M(?:[0-9]+(?:[,.][0-9]+)?W)?(?:[0-9]+(?:[,.][0-9]+)?D)?
     |[0-9]+(?:[,.][0-9]+)?W(?:[0-9]+(?:[,.][0-9]+)?D)?
     |[0-9]+(?:[,.][0-9]+)?D
    )
    (?:T(?:[0-9]+(?:[,.][0-9]+)?H)?(?:[0-9]+(?:[,.][0-9]+)?M)?(?:[0-9]+(?:[,.][0-9]+)?S)?)?
   |T(?:[0-9]+(?:[,.][0-9]+)?H)?(?:[0-9]+(?:[,.][0-9]+)?M)?(?:[0-9]+(?:[,.][0-9]+)?S)?
  )$";

/// ISO 8601 date-time with a mandatory zone designator.
pub const DATETIME_PATTERN: &str =
    r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:Z|[-+][0-9]{2}:?[0-9]{2})$";

pub fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, DURATION_PATTERN)
}

pub fn datetime_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, DATETIME_PATTERN)
}
