use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Error type covering the failure cases that can occur while reading an
/// export, reshaping it, or writing the derived tables.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a JSON configuration file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the requested sheet is not part of the workbook.
    #[error("workbook {} has no sheet {sheet}", path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    /// Raised when a sheet does not follow the export layout the fixed row
    /// offsets were written for.
    #[error("unexpected layout in {}: {detail}", path.display())]
    StructuralMismatch { path: PathBuf, detail: String },

    /// Raised when every requested comparison column was excluded.
    #[error("none of the requested columns are present in every case: {0:?}")]
    NoComparableColumns(Vec<String>),

    /// Raised when no input workbooks were supplied.
    #[error("no input workbooks given")]
    NoCases,

    /// Raised when a scenario case has no entry in the parameter file.
    #[error("unknown case '{case}', expected one of {known:?}")]
    UnknownCase { case: String, known: Vec<String> },

    /// Raised when an override names a parameter the input file lacks.
    #[error("input file {} has no parameter {name}", path.display())]
    UnknownParameter { path: PathBuf, name: String },

    /// Raised when an input file is not UTF-16 text.
    #[error("input file {} is not valid UTF-16 text", .0.display())]
    InvalidEncoding(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
