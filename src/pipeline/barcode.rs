//! 37-digit DataMatrix payload for the binding line.
//!
//! Layout (all decimal digits):
//!
//! | Segment              | Width | Source                                  |
//! |----------------------|-------|-----------------------------------------|
//! | ISBN                 | 13    | `Limp_ISBN`, else `Cased_ISBN`          |
//! | Endsheet height      | 4     | always `0000`                           |
//! | Spine                | 3     | `Spine_Size`, rounded, then `0`         |
//! | Cut-off              | 4     | `Cut_Off`, rounded, 3 digits, then `0`  |
//! | Trim off head        | 4     | always `0030`                           |
//! | Trim height          | 4     | `Trim_Height`, rounded, 3 digits, `0`   |
//! | Trim width           | 4     | `Trim_Width`, rounded, 3 digits, `0`    |
//! | Transfer station     | 1     | `1` limp, `2` cased                     |

use std::fmt;

use tracing::debug;

use super::codec::{
    ENDSHEET_HEIGHT, ISBN_LEN, TRIM_OFF_HEAD, dimension_segment, normalize_isbn, spine_segment,
};
use super::schema::{Column, ColumnMap};
use crate::common::parse_number;

/// Length of a payload.
pub const PAYLOAD_LEN: usize = 37;

/// Binding line variant that produced the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStation {
    Limp,
    Cased,
}

impl TransferStation {
    pub const fn digit(self) -> char {
        match self {
            TransferStation::Limp => '1',
            TransferStation::Cased => '2',
        }
    }
}

/// A validated payload: exactly 37 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarcodePayload(String);

impl BarcodePayload {
    /// Validate `candidate` as a payload.
    pub fn new(candidate: String) -> Option<Self> {
        if candidate.len() == PAYLOAD_LEN && candidate.bytes().all(|b| b.is_ascii_digit()) {
            Some(BarcodePayload(candidate))
        } else {
            None
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalized ISBN that opens the payload.
    #[inline]
    pub fn isbn(&self) -> &str {
        &self.0[..ISBN_LEN]
    }

    /// The transfer station recorded in the final digit.
    pub fn transfer_station(&self) -> TransferStation {
        if self.0.ends_with('2') {
            TransferStation::Cased
        } else {
            TransferStation::Limp
        }
    }
}

impl fmt::Display for BarcodePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BarcodePayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds payloads for rows of one header layout.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeEncoder<'a> {
    columns: &'a ColumnMap,
}

impl<'a> BarcodeEncoder<'a> {
    pub fn new(columns: &'a ColumnMap) -> Self {
        Self { columns }
    }

    /// Pick the ISBN source for `row`: limp first, then cased.
    pub fn isbn_source<'r, S: AsRef<str>>(
        &self,
        row: &'r [S],
    ) -> Option<(&'r str, TransferStation)> {
        let limp = self.columns.get(row, Column::LimpIsbn);
        if !limp.trim().is_empty() {
            return Some((limp, TransferStation::Limp));
        }
        let cased = self.columns.get(row, Column::CasedIsbn);
        if !cased.trim().is_empty() {
            return Some((cased, TransferStation::Cased));
        }
        None
    }

    /// Encode `row`, or `None` when the row is ineligible.
    ///
    /// A row is ineligible when it has neither ISBN, when a dimension is
    /// infinite, or when the assembled string is not 37 digits (a spine of
    /// 100 mm or more, a negative dimension, or a dimension of 1000 mm or more).
    pub fn encode<S: AsRef<str>>(&self, row: &[S]) -> Option<BarcodePayload> {
        let (raw_isbn, station) = self.isbn_source(row)?;

        let number = |column| parse_number(self.columns.get(row, column));
        let height = number(Column::TrimHeight);
        let width = number(Column::TrimWidth);
        let spine = number(Column::SpineSize);
        let cut_off = number(Column::CutOff);
        if ![height, width, spine, cut_off].iter().all(|v| v.is_finite()) {
            debug!(isbn = raw_isbn, "infinite dimension, no barcode");
            return None;
        }

        let mut candidate = String::with_capacity(PAYLOAD_LEN + 4);
        candidate.push_str(&normalize_isbn(raw_isbn));
        candidate.push_str(ENDSHEET_HEIGHT);
        candidate.push_str(&spine_segment(spine));
        candidate.push_str(&dimension_segment(cut_off));
        candidate.push_str(TRIM_OFF_HEAD);
        candidate.push_str(&dimension_segment(height));
        candidate.push_str(&dimension_segment(width));
        candidate.push(station.digit());

        let payload = BarcodePayload::new(candidate);
        if payload.is_none() {
            debug!(isbn = raw_isbn, "assembled barcode failed validation");
        }
        payload
    }
}
