//! Spreadsheet input.
//!
//! Input is read into a [`Table`]: the first row becomes the header list and
//! every following row that has at least one non-empty cell becomes a data row.
//! Only the first worksheet of a workbook is read.
//!
//! # Supported Formats
//!
//! - `.csv`, `.txt` - comma-separated text
//! - `.tsv` - tab-separated text
//! - `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` - workbooks (feature `xlsx`)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bindline::sheet::Table;
//!
//! let table = Table::open("work_instructions.xlsx")?;
//! println!("{} columns, {} rows", table.headers.len(), table.rows.len());
//! # Ok::<(), bindline::Error>(())
//! ```

pub mod text;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::common::{Error, Result};
use text::{TextConfig, TextParser};

/// Header row plus data rows, all cells as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Input kinds recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Tsv,
    Workbook,
}

impl InputKind {
    /// Determine the input kind from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<InputKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(InputKind::Csv),
            "tsv" | "tab" => Some(InputKind::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(InputKind::Workbook),
            _ => None,
        }
    }
}

impl Table {
    /// Build a table from raw rows; the first row is the header row.
    ///
    /// Rows without any non-empty cell are dropped. Returns
    /// [`Error::EmptyInput`] when there is no header row.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = rows.into_iter();
        let headers = rows.next().ok_or(Error::EmptyInput)?;
        let rows: Vec<Vec<String>> = rows
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();
        Ok(Table { headers, rows })
    }

    /// Read delimited text from any reader.
    pub fn from_reader<R: Read>(reader: R, config: TextConfig) -> Result<Self> {
        let rows = TextParser::new(reader, config).collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// Open a file, choosing the reader by extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, TextConfig::default())
    }

    /// Open a file; `config` applies to comma-separated text input.
    ///
    /// `.tsv` files always use a tab delimiter.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: TextConfig) -> Result<Self> {
        let path = path.as_ref();
        let kind = InputKind::from_path(path)
            .ok_or_else(|| Error::UnsupportedInput(path.display().to_string()))?;
        debug!(path = %path.display(), ?kind, "opening input");

        match kind {
            InputKind::Csv | InputKind::Tsv => {
                let config = if kind == InputKind::Tsv {
                    config.with_delimiter(b'\t')
                } else {
                    config
                };
                let file = File::open(path)?;
                let reader = BufReader::with_capacity(config.buffer_size, file);
                Self::from_reader(reader, config)
            },
            InputKind::Workbook => Self::open_workbook(path),
        }
    }

    #[cfg(feature = "xlsx")]
    fn open_workbook(path: &Path) -> Result<Self> {
        Self::from_rows(xlsx::read_first_sheet(path)?)
    }

    #[cfg(not(feature = "xlsx"))]
    fn open_workbook(path: &Path) -> Result<Self> {
        Err(Error::UnsupportedInput(format!(
            "{} (workbook input requires the `xlsx` feature)",
            path.display()
        )))
    }

    /// Number of data rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_input_kind_from_path() {
        assert_eq!(InputKind::from_path(Path::new("a.CSV")), Some(InputKind::Csv));
        assert_eq!(InputKind::from_path(Path::new("a.tsv")), Some(InputKind::Tsv));
        assert_eq!(InputKind::from_path(Path::new("dir/a.xlsx")), Some(InputKind::Workbook));
        assert_eq!(InputKind::from_path(Path::new("a.pdf")), None);
        assert_eq!(InputKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_open_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Wi_Number,Title").unwrap();
        writeln!(file, "W1,Book").unwrap();
        drop(file);

        let table = Table::open(&path).unwrap();
        assert_eq!(table.headers, vec!["Wi_Number", "Title"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_open_tsv_file_uses_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.tsv");
        std::fs::write(&path, "Wi_Number\tTitle\nW1\tA, B\n").unwrap();

        let table = Table::open(&path).unwrap();
        assert_eq!(table.rows[0], vec!["W1", "A, B"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Table::open("jobs.pdf");
        assert!(matches!(result, Err(Error::UnsupportedInput(_))));
    }
}
