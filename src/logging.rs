//! Diagnostics sink for the validation run.
//!
//! Every component reports through a [`ReportLogger`]: informational
//! progress, non-fatal warnings and row-local errors. The logger keeps a
//! count per severity and remembers the first error; after a run the
//! caller asks [`ReportLogger::raise_if_fatal_errors_found`] whether the
//! accumulated errors make the report invalid. In fail-fast mode the
//! first error aborts immediately instead.
//!
//! The logger owns only the output writer; where the log goes and whether
//! the run is fail-fast is decided by the caller.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raised when logged errors make the run as a whole fail.
#[derive(Debug, Clone)]
pub enum DiagnosticsError {
    /// The run completed but errors were logged along the way.
    ErrorsFound {
        errors: u64,
        warnings: u64,
        log_path: Option<PathBuf>,
        first_error: Option<String>,
    },
    /// Fail-fast mode: the first logged error aborts the run.
    FailFast(String),
}

impl fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticsError::ErrorsFound { errors, warnings, log_path, first_error } => {
                write!(f, "Found {} fatal error(s) and {} warning(s)", errors, warnings)?;
                if let Some(path) = log_path {
                    write!(f, ", please check log file at \"{}\" for details", path.display())?;
                }
                if let Some(first) = first_error {
                    write!(f, "\nFirst error: {}", first)?;
                }
                Ok(())
            }
            DiagnosticsError::FailFast(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DiagnosticsError {}

/// The diagnostics logger shared by the schema compiler, the block reader
/// and the report manager.
///
/// Methods take `&self`; counters and the writer use interior mutability
/// so the logger can be shared by the components of a single-threaded run.
pub struct ReportLogger {
    out: RefCell<Box<dyn Write>>,
    log_path: Option<PathBuf>,
    fail_fast: bool,
    infos: Cell<u64>,
    warnings: Cell<u64>,
    errors: Cell<u64>,
    first_error: RefCell<Option<String>>,
}

impl ReportLogger {
    /// Creates a logger writing to an arbitrary writer.
    pub fn with_writer(out: Box<dyn Write>, fail_fast: bool) -> Self {
        Self {
            out: RefCell::new(out),
            log_path: None,
            fail_fast,
            infos: Cell::new(0),
            warnings: Cell::new(0),
            errors: Cell::new(0),
            first_error: RefCell::new(None),
        }
    }

    /// Creates a logger writing to the given log file, truncating it.
    pub fn to_file(path: impl AsRef<Path>, fail_fast: bool) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut logger = Self::with_writer(Box::new(BufWriter::new(file)), fail_fast);
        logger.log_path = Some(path.to_path_buf());
        Ok(logger)
    }

    /// Creates a logger that discards its output. Counters still apply.
    pub fn sink() -> Self {
        Self::with_writer(Box::new(io::sink()), false)
    }

    /// The log file path, when logging to a file.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn write_line(&self, severity: Severity, msg: &dyn fmt::Display) {
        let mut out = self.out.borrow_mut();
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(out, "{} {} {}", stamp, severity.as_str(), msg);
        let _ = out.flush();
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.infos.set(self.infos.get() + 1);
        self.write_line(Severity::Info, &msg);
    }

    pub fn warning(&self, msg: impl fmt::Display) {
        self.warnings.set(self.warnings.get() + 1);
        self.write_line(Severity::Warning, &msg);
    }

    /// Records an error. Errors do not interrupt the run unless the logger
    /// is in fail-fast mode, in which case the error comes straight back.
    pub fn error(&self, msg: impl fmt::Display) -> Result<(), DiagnosticsError> {
        self.errors.set(self.errors.get() + 1);
        let rendered = msg.to_string();
        self.write_line(Severity::Error, &rendered);
        let mut first = self.first_error.borrow_mut();
        if first.is_none() {
            *first = Some(rendered.clone());
        }
        if self.fail_fast {
            return Err(DiagnosticsError::FailFast(rendered));
        }
        Ok(())
    }

    pub fn info_count(&self) -> u64 {
        self.infos.get()
    }

    pub fn warning_count(&self) -> u64 {
        self.warnings.get()
    }

    pub fn error_count(&self) -> u64 {
        self.errors.get()
    }

    /// Fails if any error was logged during the run.
    pub fn raise_if_fatal_errors_found(&self) -> Result<(), DiagnosticsError> {
        if self.errors.get() == 0 {
            return Ok(());
        }
        Err(DiagnosticsError::ErrorsFound {
            errors: self.errors.get(),
            warnings: self.warnings.get(),
            log_path: self.log_path.clone(),
            first_error: self.first_error.borrow().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_counts_accumulate() {
        let logger = ReportLogger::sink();
        logger.info("starting");
        logger.warning("odd value");
        logger.error("bad row").unwrap();
        logger.error("worse row").unwrap();
        assert_eq!(logger.info_count(), 1);
        assert_eq!(logger.warning_count(), 1);
        assert_eq!(logger.error_count(), 2);
    }

    #[test]
    fn test_no_errors_passes_final_check() {
        let logger = ReportLogger::sink();
        logger.info("all fine");
        assert!(logger.raise_if_fatal_errors_found().is_ok());
    }

    #[test]
    fn test_first_error_is_reported() {
        let logger = ReportLogger::sink();
        logger.error("first failure").unwrap();
        logger.error("second failure").unwrap();
        match logger.raise_if_fatal_errors_found() {
            Err(DiagnosticsError::ErrorsFound { errors, first_error, .. }) => {
                assert_eq!(errors, 2);
                assert_eq!(first_error.as_deref(), Some("first failure"));
            }
            other => panic!("expected ErrorsFound, got {:?}", other),
        }
    }

    #[test]
    fn test_fail_fast_returns_the_error() {
        let logger = ReportLogger::with_writer(Box::new(io::sink()), true);
        let err = logger.error("fatal row").unwrap_err();
        match err {
            DiagnosticsError::FailFast(msg) => assert_eq!(msg, "fatal row"),
            other => panic!("expected FailFast, got {:?}", other),
        }
    }

    #[test]
    fn test_lines_carry_severity() {
        let buffer = SharedBuffer::default();
        let logger = ReportLogger::with_writer(Box::new(buffer.clone()), false);
        logger.info("reading file");
        logger.error("broken record").unwrap();
        let text = buffer.contents();
        assert!(text.contains("INFO reading file"));
        assert!(text.contains("ERROR broken record"));
    }

    #[test]
    fn test_summary_names_the_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.log");
        let logger = ReportLogger::to_file(&path, false).unwrap();
        logger.error("oops").unwrap();
        let rendered = logger.raise_if_fatal_errors_found().unwrap_err().to_string();
        assert!(rendered.contains("1 fatal error(s)"));
        assert!(rendered.contains("report.log"));
        assert!(rendered.contains("First error: oops"));
    }
}
