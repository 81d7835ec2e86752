//! Row transformation pipeline.
//!
//! Rows flow through the production rule (which may rewrite `Trim_Width` in
//! place) and are then derived, independently of each other, into an XML
//! record and a barcode record. The [`Session`] owns the rows and keeps the
//! derived records aligned with them.
//!
//! # Example
//!
//! ```rust
//! use bindline::{PipelineConfig, Session};
//! use bindline::sheet::Table;
//!
//! let table = Table::from_rows(vec![
//!     vec!["Wi_Number".into(), "Limp_ISBN".into(), "Trim_Width".into(), "Production_Route".into()],
//!     vec!["W1".into(), "9780000000002".into(), "150".into(), "Limp P/Bound 8pp Cover".into()],
//! ])?;
//! let session = Session::load(table, PipelineConfig::default());
//!
//! assert!(session.is_adjusted(0));
//! assert_eq!(session.xml_records()[0].trim_width, "160");
//! assert!(session.barcode_records()[0].is_eligible());
//! # Ok::<(), bindline::Error>(())
//! ```

pub mod barcode;
pub mod codec;
pub mod rules;
pub mod schema;
pub mod session;
pub mod xml;

pub use barcode::{BarcodeEncoder, BarcodePayload, PAYLOAD_LEN, TransferStation};
pub use rules::{ProductionRule, RuleOutcome};
pub use schema::{Column, ColumnMap};
pub use session::{BarcodeRecord, Session, XmlRecord};
pub use xml::XmlRecordBuilder;

#[cfg(test)]
mod tests;
