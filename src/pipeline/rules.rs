//! Production-route driven correction of `Trim_Width`.
//!
//! Rows printed on the limp paperback 8pp cover route are trimmed 10 mm wider
//! than the sheet states. The rule rewrites `Trim_Width` in place and reports
//! which rows it touched.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::schema::{Column, ColumnMap};
use crate::common::{format_number, parse_lenient};

/// Route value that triggers the width correction.
pub const LIMP_8PP_COVER_ROUTE: &str = "Limp P/Bound 8pp Cover";

/// Default amount added to `Trim_Width` for triggered rows, in millimetres.
pub const DEFAULT_WIDTH_INCREMENT: f64 = 10.0;

/// The production-route width rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductionRule {
    /// `Production_Route` value (compared after trimming) that triggers the rule
    pub trigger_route: String,
    /// Amount added to the parsed `Trim_Width`
    pub width_increment: f64,
}

impl Default for ProductionRule {
    fn default() -> Self {
        Self {
            trigger_route: LIMP_8PP_COVER_ROUTE.to_string(),
            width_increment: DEFAULT_WIDTH_INCREMENT,
        }
    }
}

/// Rows adjusted by one run of [`ProductionRule::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub adjusted: BTreeSet<usize>,
}

impl RuleOutcome {
    #[inline]
    pub fn count(&self) -> usize {
        self.adjusted.len()
    }
}

impl ProductionRule {
    /// Apply the rule to every row, mutating `Trim_Width` in place.
    ///
    /// The returned outcome describes this run only; callers replace any
    /// previous adjusted set with it. When either `Production_Route` or
    /// `Trim_Width` is missing from the headers nothing is changed and the
    /// outcome is empty: a header mismatch degrades the feature, it does not
    /// fail the batch.
    pub fn apply(&self, columns: &ColumnMap, rows: &mut [Vec<String>]) -> RuleOutcome {
        let (Some(route_idx), Some(width_idx)) = (
            columns.index(Column::ProductionRoute),
            columns.index(Column::TrimWidth),
        ) else {
            warn!(
                "production rule skipped: {} or {} column not found",
                Column::ProductionRoute,
                Column::TrimWidth
            );
            return RuleOutcome::default();
        };

        let mut outcome = RuleOutcome::default();
        for (index, row) in rows.iter_mut().enumerate() {
            let triggered = row
                .get(route_idx)
                .is_some_and(|route| route.trim() == self.trigger_route);
            if !triggered {
                continue;
            }

            let current = row.get(width_idx).map(String::as_str).unwrap_or("");
            let adjusted = format_number(parse_lenient(current) + self.width_increment);
            debug!(row = index, from = current, to = %adjusted, "trim width adjusted");

            if row.len() <= width_idx {
                row.resize(width_idx + 1, String::new());
            }
            row[width_idx] = adjusted;
            outcome.adjusted.insert(index);
        }

        if outcome.count() > 0 {
            info!(
                count = outcome.count(),
                route = %self.trigger_route,
                "Trim_Width increased by {} for matching production route",
                format_number(self.width_increment)
            );
        }
        outcome
    }
}
