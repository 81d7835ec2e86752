//! Unified error types for bindline.
//!
//! Row-level problems (missing columns, unparsable numbers, ineligible barcodes)
//! are not errors: they degrade the affected feature and are logged. The variants
//! below cover failures that stop a single operation.
use thiserror::Error;

/// Main error type for bindline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input file type is not one bindline can read
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Spreadsheet workbook could not be opened or read
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Input contained no header row
    #[error("Input has no header row")]
    EmptyInput,

    /// Row index does not exist in the session
    #[error("Row {index} out of range (session holds {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Column name is not present in the header list
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// Barcode rendering error
    #[error("Render error: {0}")]
    Render(String),

    /// Archive could not be produced
    #[error("Archive error: {0}")]
    Archive(String),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for bindline operations.
pub type Result<T> = std::result::Result<T, Error>;
