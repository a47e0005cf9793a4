// src/market_year.rs

use crate::record::{ExportSeries, WeeklyRecord};
use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, info};

/// Trade-accounting year starting in calendar year `start`, shown as `2021/22`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketYear {
    pub start: i32,
}

impl MarketYear {
    pub fn starting(start: i32) -> Self {
        Self { start }
    }

    /// Two-digit suffix of the following year; 1999 rolls over to `00`.
    pub fn end_suffix(&self) -> i32 {
        (self.start + 1).rem_euclid(100)
    }
}

impl fmt::Display for MarketYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.start, self.end_suffix())
    }
}

impl Serialize for MarketYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Tag every record with the market year it belongs to.
///
/// Boundary weeks open a new market year named after the calendar year of
/// their week ending; later weeks carry the last seen year forward. Weeks
/// before the first boundary cannot be placed and are left out, so a window
/// that never reaches back to a reset week yields an empty series.
pub fn annotate(series: ExportSeries) -> ExportSeries {
    let total = series.len();
    let mut current: Option<MarketYear> = None;
    let mut boundaries = 0usize;
    let mut out: Vec<WeeklyRecord> = Vec::with_capacity(total);

    for mut rec in series {
        if rec.is_market_year_boundary() {
            let year = MarketYear::starting(rec.week_ending.year());
            debug!(week_ending = %rec.week_ending, market_year = %year, "market year boundary");
            current = Some(year);
            boundaries += 1;
        }
        match current {
            Some(year) => {
                rec.market_year = Some(year);
                out.push(rec);
            }
            None => continue,
        }
    }

    let skipped = total - out.len();
    if boundaries == 0 && total > 0 {
        info!(
            records = total,
            "no market year boundary in window; extend the start date back to a reset week"
        );
    } else if skipped > 0 {
        info!(skipped, "dropped records preceding the first market year boundary");
    }

    ExportSeries::from_sorted(out)
}
