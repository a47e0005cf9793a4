// src/record.rs

use crate::market_year::MarketYear;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// One week of export-sales figures for a single commodity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    pub week_ending: NaiveDate,
    pub weekly_exports: i64,
    pub accumulated_exports: i64,
    pub net_sales: i64,
    pub outstanding_sales: i64,
    pub net_sales_next_year: i64,
    pub outstanding_sales_next_year: i64,
    /// Filled in by [`crate::market_year::annotate`].
    pub market_year: Option<MarketYear>,
}

impl WeeklyRecord {
    /// A record is the first week of a market year when the running total
    /// equals the week's own volume.
    pub fn is_market_year_boundary(&self) -> bool {
        self.weekly_exports == self.accumulated_exports
    }
}

/// Closed date interval `[beg, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub beg: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(beg: NaiveDate, end: NaiveDate) -> Self {
        Self { beg, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.beg <= day && day <= self.end
    }
}

/// Weekly records with strictly increasing `week_ending`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportSeries {
    records: Vec<WeeklyRecord>,
}

impl ExportSeries {
    /// Sort by week ending and keep the first record seen for any repeated week.
    pub fn from_records(mut records: Vec<WeeklyRecord>) -> Self {
        // stable sort keeps source order among equal dates
        records.sort_by_key(|r| r.week_ending);
        let before = records.len();
        records.dedup_by_key(|r| r.week_ending);
        if records.len() != before {
            warn!(
                dropped = before - records.len(),
                "duplicate week endings in source; kept first occurrence"
            );
        }
        Self { records }
    }

    /// Caller guarantees the ordering invariant.
    pub(crate) fn from_sorted(records: Vec<WeeklyRecord>) -> Self {
        debug_assert!(records
            .windows(2)
            .all(|w| w[0].week_ending < w[1].week_ending));
        Self { records }
    }

    pub fn records(&self) -> &[WeeklyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeeklyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&WeeklyRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&WeeklyRecord> {
        self.records.last()
    }

    /// Keep only records inside `window`.
    pub fn within(self, window: DateWindow) -> Self {
        let records = self
            .records
            .into_iter()
            .filter(|r| window.contains(r.week_ending))
            .collect();
        Self { records }
    }

    pub fn into_records(self) -> Vec<WeeklyRecord> {
        self.records
    }
}

impl IntoIterator for ExportSeries {
    type Item = WeeklyRecord;
    type IntoIter = std::vec::IntoIter<WeeklyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExportSeries {
    type Item = &'a WeeklyRecord;
    type IntoIter = std::slice::Iter<'a, WeeklyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) fn record(day: &str, weekly: i64, accumulated: i64) -> WeeklyRecord {
    WeeklyRecord {
        week_ending: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        weekly_exports: weekly,
        accumulated_exports: accumulated,
        net_sales: 0,
        outstanding_sales: 0,
        net_sales_next_year: 0,
        outstanding_sales_next_year: 0,
        market_year: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn from_records_sorts_and_dedups() {
        let mut dup = record("2021-01-07", 1, 1);
        dup.net_sales = 99;
        let series = ExportSeries::from_records(vec![
            record("2021-01-21", 3, 6),
            record("2021-01-07", 1, 1),
            record("2021-01-14", 2, 3),
            dup,
        ]);
        let days: Vec<_> = series.iter().map(|r| r.week_ending).collect();
        assert_eq!(days, vec![day("2021-01-07"), day("2021-01-14"), day("2021-01-21")]);
        assert_eq!(series.first().unwrap().net_sales, 0);
    }

    #[test]
    fn window_is_inclusive() {
        let window = DateWindow::new(day("2021-01-07"), day("2021-01-14"));
        let series = ExportSeries::from_records(vec![
            record("2020-12-31", 1, 1),
            record("2021-01-07", 1, 2),
            record("2021-01-14", 1, 3),
            record("2021-01-21", 1, 4),
        ])
        .within(window);
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|r| window.contains(r.week_ending)));
    }

    #[test]
    fn inverted_window_is_empty() {
        let window = DateWindow::new(day("2021-01-21"), day("2021-01-07"));
        assert!(!window.contains(day("2021-01-14")));
        let series = ExportSeries::from_records(vec![
            record("2021-01-07", 1, 1),
            record("2021-01-14", 1, 2),
            record("2021-01-21", 1, 3),
        ])
        .within(window);
        assert!(series.is_empty());
    }

    #[test]
    fn boundary_is_exact_equality() {
        let mut r = record("2021-09-02", 100, 100);
        r.net_sales = -5;
        r.outstanding_sales_next_year = 12345;
        assert!(r.is_market_year_boundary());
        assert!(!record("2021-09-09", 100, 101).is_market_year_boundary());
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(ExportSeries::from_records(vec![record(
            "2021-01-07",
            50,
            50,
        )]))
        .unwrap();
        let first = &json[0];
        assert_eq!(first["weekEnding"], "2021-01-07");
        assert_eq!(first["weeklyExports"], 50);
        assert_eq!(first["netSalesNextYear"], 0);
        assert!(first["marketYear"].is_null());
    }
}
