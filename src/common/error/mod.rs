//! Unified error types for bindline.
//!
//! This module provides a single error type shared by the readers, the row
//! pipeline, and the export layer.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
