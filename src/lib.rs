//! Bindline - work instruction sheets to binding line artifacts
//!
//! This library turns the rows of a work instruction spreadsheet into the files
//! a binding line consumes: one XML record per row and one DataMatrix barcode
//! per row carrying a 37-digit machine-setup payload.
//!
//! # Features
//!
//! - **Spreadsheet input**: CSV, TSV and (feature `xlsx`) Excel/ODS workbooks
//! - **Production rule**: widen `Trim_Width` for rows on the limp 8pp cover route
//! - **XML records**: one pretty-printed document per row
//! - **Barcode payloads**: fixed-width 37-digit strings, validated before use
//! - **Export**: a single ZIP with every XML record and every barcode PDF
//!   (rendering needs feature `render`)
//!
//! # Example - Converting a sheet
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bindline::render::{DataMatrixPdfRenderer, PageLayout};
//! use bindline::{PipelineConfig, Session, Table, export};
//!
//! # async fn run() -> bindline::Result<()> {
//! let table = Table::open("work_instructions.xlsx")?;
//! let session = Session::load(table, PipelineConfig::default());
//!
//! for record in session.xml_records() {
//!     println!("{} -> {}", record.wi_number, record.file_name());
//! }
//!
//! let renderer = Arc::new(DataMatrixPdfRenderer::new(PageLayout::default()));
//! let bundle = export::export_archive(&session, renderer).await?;
//! bundle.write_to_dir("out").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a payload
//!
//! ```
//! use bindline::pipeline::{BarcodeEncoder, ColumnMap};
//!
//! let columns = ColumnMap::resolve(&["Limp_ISBN", "Trim_Height", "Trim_Width", "Spine_Size", "Cut_Off"]);
//! let payload = BarcodeEncoder::new(&columns)
//!     .encode(&["9780000000002", "200", "150", "12", "5"])
//!     .unwrap();
//! assert_eq!(payload.as_str(), "9780000000002000012000500030200015001");
//! ```

/// Shared error type, number handling and XML helpers
pub mod common;

/// Pipeline configuration
pub mod config;

/// Archive and file export of derived records
pub mod export;

/// Row rule, XML records, barcode payloads and the session that holds them
pub mod pipeline;

/// Barcode symbol rendering
pub mod render;

/// Spreadsheet readers
pub mod sheet;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use config::PipelineConfig;
pub use export::{ExportBundle, ExportReport, export_archive};
pub use pipeline::{BarcodePayload, BarcodeRecord, Session, XmlRecord};
pub use sheet::Table;
