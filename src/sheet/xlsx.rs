//! Workbook input through calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::common::{Error, Result, format_number};

/// Render a workbook cell as the text a user sees in the sheet.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(v) => format_number(*v),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => (if *v { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Read every row of the first worksheet as text.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_owned();
    let first = sheet_names.first().ok_or(Error::EmptyInput)?;
    debug!(sheet = %first, sheets = sheet_names.len(), "reading first worksheet");

    let range = workbook.worksheet_range(first)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}
