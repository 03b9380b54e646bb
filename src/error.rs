//! Error handling for the profile reader.

use std::io;

/// Specialized error type for profile reader operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileReaderError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing delimited text data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading a spreadsheet workbook
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    /// Source parsed but did not yield a usable table
    #[error("Malformed table: {0}")]
    MalformedTable(String),
}

/// Result type for profile reader operations
pub type Result<T> = std::result::Result<T, ProfileReaderError>;
