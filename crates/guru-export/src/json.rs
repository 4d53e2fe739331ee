//! JSON serialization of the export artifact.
//!
//! Wraps a [`SessionExport`] reference and writes it as compact or
//! pretty-printed JSON.
//!
//! # Example
//!
//! ```rust
//! use guru_export::{json::JsonExporter, SessionExport};
//! use guru_session::{Session, TraceLog};
//!
//! let session = Session::new("Algebra", "9", "");
//! let export = SessionExport::from_session(&session, &TraceLog::new());
//!
//! let exporter = JsonExporter::new(&export);
//! let compact = exporter.generate().unwrap();
//! assert!(!compact.contains('\n'));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{ExportError, Result, SessionExport};

/// JSON writer for a session export artifact.
pub struct JsonExporter<'a> {
    export: &'a SessionExport,
}

impl<'a> JsonExporter<'a> {
    /// Creates an exporter for the given artifact.
    #[must_use]
    pub const fn new(export: &'a SessionExport) -> Self {
        Self { export }
    }

    /// Generates compact JSON (single line, no extra whitespace).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.export).map_err(ExportError::from)
    }

    /// Generates pretty-printed JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.export).map_err(ExportError::from)
    }

    /// Writes the artifact to a file, creating or overwriting it.
    ///
    /// Parent directories must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if JSON serialization fails.
    /// Returns [`ExportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
