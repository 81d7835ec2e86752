//! Fixed column contract and header resolution.
//!
//! The spreadsheet header row is matched against a closed set of column names.
//! Columns are resolved once per batch into a [`ColumnMap`]; row access then goes
//! through the map instead of searching the header list for every cell.

use std::fmt;

/// A column of the work-instruction sheet contract.
///
/// Names are exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    WiNumber,
    LimpIsbn,
    CasedIsbn,
    Title,
    TrimHeight,
    TrimWidth,
    PageExtent,
    SpineSize,
    ReelWidth,
    CutOff,
    Imposition,
    PaperCode,
    ProductionRoute,
}

impl Column {
    /// Every contract column, in sheet order.
    pub const ALL: [Column; 13] = [
        Column::WiNumber,
        Column::LimpIsbn,
        Column::CasedIsbn,
        Column::Title,
        Column::TrimHeight,
        Column::TrimWidth,
        Column::PageExtent,
        Column::SpineSize,
        Column::ReelWidth,
        Column::CutOff,
        Column::Imposition,
        Column::PaperCode,
        Column::ProductionRoute,
    ];

    /// Header text for this column.
    pub const fn name(self) -> &'static str {
        match self {
            Column::WiNumber => "Wi_Number",
            Column::LimpIsbn => "Limp_ISBN",
            Column::CasedIsbn => "Cased_ISBN",
            Column::Title => "Title",
            Column::TrimHeight => "Trim_Height",
            Column::TrimWidth => "Trim_Width",
            Column::PageExtent => "Page_Extent",
            Column::SpineSize => "Spine_Size",
            Column::ReelWidth => "Reel_Width",
            Column::CutOff => "Cut_Off",
            Column::Imposition => "Imposition",
            Column::PaperCode => "Paper_Code",
            Column::ProductionRoute => "Production_Route",
        }
    }

    /// Look up a contract column by its header text.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column positions resolved against one header list.
///
/// A header name that appears more than once resolves to its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 13],
}

impl ColumnMap {
    /// Resolve every contract column against `headers`.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = [None; 13];
        for (slot, column) in positions.iter_mut().zip(Column::ALL) {
            *slot = headers.iter().position(|h| h.as_ref() == column.name());
        }
        ColumnMap { positions }
    }

    /// Position of `column` in the header list, if present.
    #[inline]
    pub fn index(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }

    #[inline]
    pub fn contains(&self, column: Column) -> bool {
        self.index(column).is_some()
    }

    /// Raw cell text of `column` in `row`.
    ///
    /// Returns `""` when the column is absent from the headers or the row is
    /// shorter than the column position.
    #[inline]
    pub fn get<'r, S: AsRef<str>>(&self, row: &'r [S], column: Column) -> &'r str {
        self.index(column)
            .and_then(|i| row.get(i))
            .map(AsRef::as_ref)
            .unwrap_or("")
    }

    /// Contract columns that the header list does not provide.
    pub fn missing(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_and_get() {
        let headers = ["Title", "Wi_Number", "Trim_Width"];
        let map = ColumnMap::resolve(&headers);
        assert_eq!(map.index(Column::WiNumber), Some(1));
        assert_eq!(map.index(Column::LimpIsbn), None);

        let row = vec!["A Book".to_string(), "W7".to_string()];
        assert_eq!(map.get(&row, Column::WiNumber), "W7");
        // Trim_Width is a known column but the row is too short
        assert_eq!(map.get(&row, Column::TrimWidth), "");
        assert_eq!(map.get(&row, Column::CutOff), "");
    }

    #[test]
    fn test_duplicate_headers_use_first() {
        let map = ColumnMap::resolve(&["Title", "Title"]);
        assert_eq!(map.index(Column::Title), Some(0));
    }

    #[test]
    fn test_missing_columns() {
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        assert!(ColumnMap::resolve(&headers).missing().is_empty());

        let map = ColumnMap::resolve(&["Wi_Number"]);
        assert_eq!(map.missing().len(), 12);
        assert!(!map.missing().contains(&Column::WiNumber));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        assert_eq!(Column::from_name("Cut_Off"), Some(Column::CutOff));
        assert_eq!(Column::from_name("cut_off"), None);
        assert_eq!(ColumnMap::resolve(&["trim_width"]).index(Column::TrimWidth), None);
    }
}
