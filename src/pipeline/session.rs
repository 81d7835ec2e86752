//! In-memory session: the loaded rows and everything derived from them.
//!
//! The row collection is the single source of truth. XML records, barcode
//! records, and the adjusted-row set are index-aligned with it and are rebuilt
//! whenever rows change. Every mutation goes through `&mut Session`, so the
//! four structures are always updated together.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::barcode::{BarcodeEncoder, BarcodePayload};
use super::codec::ISBN_LEN;
use super::schema::{Column, ColumnMap};
use super::xml::XmlRecordBuilder;
use crate::common::{Error, Result};
use crate::config::PipelineConfig;
use crate::sheet::Table;

/// Identity used when a row has no `Wi_Number`.
pub const UNKNOWN_WI_NUMBER: &str = "unknown";

/// Placeholder for absent summary fields.
const NOT_AVAILABLE: &str = "N/A";

/// Derived XML output for one row, with the summary fields shown in previews.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlRecord {
    pub wi_number: String,
    pub isbn: String,
    pub title: String,
    pub production_route: String,
    pub trim_width: String,
    /// Serialized document, `None` if serialization failed for this row
    pub xml: Option<String>,
}

impl XmlRecord {
    /// Archive entry name: `<Wi_Number>.xml`.
    pub fn file_name(&self) -> String {
        format!("{}.xml", self.wi_number)
    }
}

/// Derived barcode output for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeRecord {
    pub wi_number: String,
    pub isbn: String,
    /// `None` when the row is ineligible
    pub payload: Option<BarcodePayload>,
    pub row_index: usize,
}

impl BarcodeRecord {
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.payload.is_some()
    }

    /// Artifact name without extension: `<Wi_Number>_<ISBN-13>_DBC`, for
    /// eligible rows only.
    pub fn file_stem(&self) -> Option<String> {
        self.payload
            .as_ref()
            .map(|p| format!("{}_{}_DBC", self.wi_number, &p.as_str()[..ISBN_LEN]))
    }

    /// Artifact name with the given extension.
    pub fn file_name_with_extension(&self, extension: &str) -> Option<String> {
        self.file_stem().map(|stem| format!("{}.{}", stem, extension))
    }

    /// Archive entry name of the PDF artifact: `<Wi_Number>_<ISBN-13>_DBC.pdf`.
    pub fn file_name(&self) -> Option<String> {
        self.file_name_with_extension("pdf")
    }
}

/// Row identity for file names: trimmed `Wi_Number`, or `unknown`.
///
/// Path separators are replaced so the name stays a single archive entry.
pub fn row_identity<S: AsRef<str>>(columns: &ColumnMap, row: &[S]) -> String {
    let wi = columns.get(row, Column::WiNumber).trim();
    if wi.is_empty() {
        UNKNOWN_WI_NUMBER.to_string()
    } else {
        wi.replace(['/', '\\'], "_")
    }
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Loaded spreadsheet plus derived records.
#[derive(Debug, Clone)]
pub struct Session {
    config: PipelineConfig,
    headers: Vec<String>,
    columns: ColumnMap,
    xml_builder: XmlRecordBuilder,
    rows: Vec<Vec<String>>,
    xml_records: Vec<XmlRecord>,
    barcode_records: Vec<BarcodeRecord>,
    adjusted: BTreeSet<usize>,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: PipelineConfig) -> Self {
        let xml_builder = XmlRecordBuilder::new::<String>(&[], &config.root_tag);
        Self {
            config,
            headers: Vec::new(),
            columns: ColumnMap::default(),
            xml_builder,
            rows: Vec::new(),
            xml_records: Vec::new(),
            barcode_records: Vec::new(),
            adjusted: BTreeSet::new(),
        }
    }

    /// Create a session from a loaded table.
    ///
    /// Applies the production rule (unless disabled) and derives every record.
    pub fn load(table: Table, config: PipelineConfig) -> Self {
        let mut session = Session::new(config);
        session.replace(table);
        session
    }

    /// Replace all state with `table`. Nothing from the previous load survives.
    pub fn replace(&mut self, table: Table) {
        let Table { headers, rows } = table;
        self.columns = ColumnMap::resolve(&headers);
        self.xml_builder = XmlRecordBuilder::new(&headers, &self.config.root_tag);
        self.headers = headers;
        self.rows = rows;

        let missing = self.columns.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|c| c.name()).collect();
            warn!(missing = ?names, "input is missing contract columns, dependent features are disabled");
        }

        if self.config.apply_production_rule {
            self.adjusted = self.config.rule.apply(&self.columns, &mut self.rows).adjusted;
        } else {
            self.adjusted.clear();
        }
        self.derive_all();

        info!(
            rows = self.rows.len(),
            adjusted = self.adjusted.len(),
            barcodes = self.barcode_records.iter().filter(|b| b.is_eligible()).count(),
            "session loaded"
        );
    }

    /// Drop all rows and derived state; the configuration is kept.
    pub fn clear(&mut self) {
        self.headers.clear();
        self.columns = ColumnMap::default();
        self.xml_builder = XmlRecordBuilder::new::<String>(&[], &self.config.root_tag);
        self.rows.clear();
        self.xml_records.clear();
        self.barcode_records.clear();
        self.adjusted.clear();
    }

    /// Run the production rule over the current rows again.
    ///
    /// The adjusted set is replaced by this run's result. Rows that already
    /// carry an adjusted width are widened again if they still match.
    pub fn reapply_rules(&mut self) -> usize {
        let outcome = self.config.rule.apply(&self.columns, &mut self.rows);
        self.adjusted = outcome.adjusted;
        self.derive_all();
        self.adjusted.len()
    }

    /// Remove row `index` and shift everything after it down by one.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(Error::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }

        self.rows.remove(index);
        self.xml_records.remove(index);
        self.barcode_records.remove(index);
        for record in &mut self.barcode_records[index..] {
            record.row_index -= 1;
        }
        self.adjusted = remap_after_delete(&self.adjusted, index);

        debug!(index, remaining = self.rows.len(), "row deleted");
        Ok(())
    }

    /// Set one cell and re-derive that row's records.
    ///
    /// The production rule is not re-run; the row keeps its adjusted flag.
    pub fn edit_cell(&mut self, index: usize, header: &str, value: &str) -> Result<()> {
        let len = self.rows.len();
        let column = self
            .headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| Error::UnknownColumn(header.to_string()))?;
        let row = self
            .rows
            .get_mut(index)
            .ok_or(Error::RowOutOfRange { index, len })?;

        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value.to_string();

        let (xml, barcode) = self.derive_row(index);
        self.xml_records[index] = xml;
        self.barcode_records[index] = barcode;
        Ok(())
    }

    fn derive_all(&mut self) {
        let (xml_records, barcode_records): (Vec<_>, Vec<_>) = (0..self.rows.len())
            .into_par_iter()
            .map(|index| self.derive_row(index))
            .unzip();
        self.xml_records = xml_records;
        self.barcode_records = barcode_records;
    }

    fn derive_row(&self, index: usize) -> (XmlRecord, BarcodeRecord) {
        let row = &self.rows[index];
        let columns = &self.columns;
        let wi_number = row_identity(columns, row);

        let limp = columns.get(row, Column::LimpIsbn);
        let cased = columns.get(row, Column::CasedIsbn);
        let isbn = or_not_available(if limp.is_empty() { cased } else { limp });

        let title = columns.get(row, Column::Title);
        let title = if title.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            title.replace(',', "")
        };

        let xml = match self.xml_builder.build(row) {
            Ok(xml) => Some(xml),
            Err(err) => {
                warn!(row = index, wi_number = %wi_number, error = %err, "failed to build XML record");
                None
            }
        };

        let payload = BarcodeEncoder::new(columns).encode(row);
        if payload.is_none() {
            debug!(row = index, wi_number = %wi_number, "row is not eligible for a barcode");
        }

        let xml_record = XmlRecord {
            wi_number: wi_number.clone(),
            isbn: isbn.clone(),
            title,
            production_route: or_not_available(columns.get(row, Column::ProductionRoute)),
            trim_width: or_not_available(columns.get(row, Column::TrimWidth)),
            xml,
        };
        let barcode_record = BarcodeRecord {
            wi_number,
            isbn,
            payload,
            row_index: index,
        };
        (xml_record, barcode_record)
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[inline]
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[inline]
    pub fn xml_records(&self) -> &[XmlRecord] {
        &self.xml_records
    }

    #[inline]
    pub fn barcode_records(&self) -> &[BarcodeRecord] {
        &self.barcode_records
    }

    #[inline]
    pub fn adjusted_rows(&self) -> &BTreeSet<usize> {
        &self.adjusted
    }

    #[inline]
    pub fn is_adjusted(&self, index: usize) -> bool {
        self.adjusted.contains(&index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// XML document of row `index`.
    pub fn xml_document(&self, index: usize) -> Result<&str> {
        let record = self.xml_records.get(index).ok_or(Error::RowOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        record
            .xml
            .as_deref()
            .ok_or_else(|| Error::Xml(format!("no XML record for row {}", index)))
    }

    /// Barcode records that carry a payload, in row order.
    pub fn eligible_barcodes(&self) -> impl Iterator<Item = (&BarcodeRecord, &BarcodePayload)> {
        self.barcode_records
            .iter()
            .filter_map(|record| record.payload.as_ref().map(|p| (record, p)))
    }
}

/// Adjusted-set remapping for the removal of row `deleted`: indices below it
/// are kept, indices above it move down by one, `deleted` itself is dropped.
pub fn remap_after_delete(adjusted: &BTreeSet<usize>, deleted: usize) -> BTreeSet<usize> {
    adjusted
        .iter()
        .filter(|&&i| i != deleted)
        .map(|&i| if i > deleted { i - 1 } else { i })
        .collect()
}
