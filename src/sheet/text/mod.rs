//! Delimited text input (CSV, TSV).
//!
//! # Example
//!
//! ```rust
//! use bindline::sheet::text::{TextConfig, TextParser};
//!
//! let csv = "Wi_Number,Title\nW1,\"Foo, Bar\"\n";
//! let rows: Vec<Vec<String>> = TextParser::new(csv.as_bytes(), TextConfig::default())
//!     .collect::<bindline::Result<_>>()?;
//! assert_eq!(rows[1], vec!["W1", "Foo, Bar"]);
//! # Ok::<(), bindline::Error>(())
//! ```

pub mod config;
pub mod parser;

pub use config::TextConfig;
pub use parser::TextParser;
