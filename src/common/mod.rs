//! Common types and utilities shared by the readers, the row pipeline, and
//! the export layer.

// Submodule declarations
pub mod error;
pub mod number;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use number::{format_number, parse_lenient, parse_number};
