// src/table/normalize.rs

use crate::error::{ExportSalesError, Result};
use crate::record::{DateWindow, ExportSeries, WeeklyRecord};
use crate::table::cell::{parse_date, parse_int};
use crate::table::raw::{first_table, RawTable};
use tracing::{debug, info};

/// Fixed positions of the header block and data rows in a sales table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLayout {
    /// Rows whose cells are space-joined, column by column, into headers.
    pub header_rows: &'static [usize],
    /// First data row; everything above it is header or separator.
    pub data_start: usize,
    /// Appended to the last two headers (next market year columns).
    pub next_year_suffix: &'static str,
}

pub const EXPORT_SALES_LAYOUT: TableLayout = TableLayout {
    header_rows: &[0, 1],
    data_start: 4,
    next_year_suffix: " NMY",
};

/// Columns read into a [`WeeklyRecord`], with their reconstructed header text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    WeekEnding,
    WeeklyExports,
    AccumulatedExports,
    NetSales,
    OutstandingSales,
    NetSalesNextYear,
    OutstandingSalesNextYear,
}

impl Column {
    const ALL: [Column; 7] = [
        Column::WeekEnding,
        Column::WeeklyExports,
        Column::AccumulatedExports,
        Column::NetSales,
        Column::OutstandingSales,
        Column::NetSalesNextYear,
        Column::OutstandingSalesNextYear,
    ];

    fn header(self) -> &'static str {
        match self {
            Column::WeekEnding => "Week Ending",
            Column::WeeklyExports => "Weekly Exports",
            Column::AccumulatedExports => "Accumulated Exports",
            Column::NetSales => "Net Sales",
            Column::OutstandingSales => "Outstanding Sales",
            Column::NetSalesNextYear => "Net Sales NMY",
            Column::OutstandingSalesNextYear => "Outstanding Sales NMY",
        }
    }
}

/// Cell index of every [`Column`], in `Column::ALL` order.
#[derive(Debug)]
struct ColumnIndex([usize; 7]);

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut idx = [0usize; 7];
        for (slot, col) in idx.iter_mut().zip(Column::ALL) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(col.header()))
                .ok_or_else(|| {
                    ExportSalesError::parse(format!(
                        "missing column {:?} in headers {:?}",
                        col.header(),
                        headers
                    ))
                })?;
        }
        Ok(Self(idx))
    }

    fn cell<'a>(&self, row: &'a [String], col: Column) -> Option<&'a str> {
        row.get(self.0[col as usize]).map(String::as_str)
    }

    fn int(&self, row: &[String], col: Column) -> std::result::Result<i64, String> {
        let raw = self
            .cell(row, col)
            .ok_or_else(|| format!("no cell for {}", col.header()))?;
        parse_int(raw).ok_or_else(|| format!("{} {:?} is not an integer", col.header(), raw))
    }

    fn record(&self, row: &[String]) -> std::result::Result<WeeklyRecord, String> {
        let raw_date = self
            .cell(row, Column::WeekEnding)
            .ok_or_else(|| "no cell for Week Ending".to_string())?;
        let week_ending =
            parse_date(raw_date).ok_or_else(|| format!("Week Ending {:?} is not a date", raw_date))?;
        Ok(WeeklyRecord {
            week_ending,
            weekly_exports: self.int(row, Column::WeeklyExports)?,
            accumulated_exports: self.int(row, Column::AccumulatedExports)?,
            net_sales: self.int(row, Column::NetSales)?,
            outstanding_sales: self.int(row, Column::OutstandingSales)?,
            net_sales_next_year: self.int(row, Column::NetSalesNextYear)?,
            outstanding_sales_next_year: self.int(row, Column::OutstandingSalesNextYear)?,
            market_year: None,
        })
    }
}

/// Output of [`normalize`]: typed records plus what was learned on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub series: ExportSeries,
    /// Data rows that failed to parse and were left out.
    pub dropped_rows: usize,
}

/// Rebuild column headers from the header rows of `layout`.
pub fn reconstruct_headers(raw: &RawTable, layout: &TableLayout) -> Result<Vec<String>> {
    let header_rows = layout
        .header_rows
        .iter()
        .map(|&i| {
            raw.rows
                .get(i)
                .ok_or_else(|| ExportSalesError::parse(format!("missing header row {}", i)))
        })
        .collect::<Result<Vec<_>>>()?;

    let width = header_rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut headers: Vec<String> = (0..width)
        .map(|c| {
            header_rows
                .iter()
                .map(|r| r.get(c).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    if headers.len() < 2 {
        return Err(ExportSalesError::parse(format!(
            "expected at least 2 header columns, found {}",
            headers.len()
        )));
    }
    let n = headers.len();
    for h in &mut headers[n - 2..] {
        h.push_str(layout.next_year_suffix);
    }
    Ok(headers)
}

/// Turn a raw sales table into records whose week ending falls in `window`.
///
/// Data rows with any unparseable or missing cell are dropped, never raised.
pub fn normalize(raw: &RawTable, window: DateWindow) -> Result<NormalizedTable> {
    normalize_with_layout(raw, window, &EXPORT_SALES_LAYOUT)
}

pub fn normalize_with_layout(
    raw: &RawTable,
    window: DateWindow,
    layout: &TableLayout,
) -> Result<NormalizedTable> {
    if raw.len() < layout.data_start {
        return Err(ExportSalesError::parse(format!(
            "table has {} rows, expected at least {}",
            raw.len(),
            layout.data_start
        )));
    }
    let headers = reconstruct_headers(raw, layout)?;
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::with_capacity(raw.len() - layout.data_start);
    let mut dropped_rows = 0usize;
    for (i, row) in raw.rows.iter().enumerate().skip(layout.data_start) {
        match columns.record(row) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                debug!(row = i, %reason, "dropping row");
                dropped_rows += 1;
            }
        }
    }

    let parsed = records.len();
    let series = ExportSeries::from_records(records).within(window);
    info!(
        parsed,
        dropped_rows,
        kept = series.len(),
        beg = %window.beg,
        end = %window.end,
        "normalized export sales table"
    );

    Ok(NormalizedTable {
        headers,
        series,
        dropped_rows,
    })
}

/// [`normalize`] straight from an HTML document.
pub fn normalize_html(html: &str, window: DateWindow) -> Result<NormalizedTable> {
    let raw = first_table(html)?;
    normalize(&raw, window)
}

#[cfg(test)]
pub(crate) const SAMPLE_PAGE: &str = r#"<html><head><title>Export Sales</title></head><body>
<h2>Soybeans</h2>
<table border="1">
  <tr><th>Week</th><th>Weekly</th><th>Accumulated</th><th>Net</th><th>Outstanding</th><th>Net</th><th>Outstanding</th></tr>
  <tr><th>Ending</th><th>Exports</th><th>Exports</th><th>Sales</th><th>Sales</th><th>Sales</th><th>Sales</th></tr>
  <tr><th></th><th colspan="4">Current Market Year</th><th colspan="2">Next Market Year</th></tr>
  <tr><td colspan="7"><hr></td></tr>
  <tr><td>08/26/2021</td><td>120,000</td><td>61,500,000</td><td>50,000</td><td>900,000</td><td>1,500,000</td><td>18,000,000</td></tr>
  <tr><td>09/02/2021</td><td>1,100,000</td><td>1,100,000</td><td>2,000,000</td><td>19,000,000</td><td>0</td><td>0</td></tr>
  <tr><td>09/09/2021</td><td>900,000</td><td>2,000,000</td><td>-150,000</td><td>18,000,000</td><td>0</td><td>0</td></tr>
  <tr><td>09/16/2021</td><td>N/A</td><td>2,950,000</td><td>300,000</td><td>17,500,000</td><td>0</td><td>0</td></tr>
  <tr><td>09/23/2021</td><td>1,000,000</td><td>3,950,000</td><td>250,000</td><td>16,700,000</td><td>10,000</td><td>10,000</td></tr>
  <tr><td colspan="7">Totals may not add due to rounding</td></tr>
</table>
</body></html>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn window(beg: &str, end: &str) -> DateWindow {
        DateWindow::new(day(beg), day(end))
    }

    fn all_time() -> DateWindow {
        window("1900-01-01", "2100-12-31")
    }

    fn rows(rows: &[&[&str]]) -> RawTable {
        RawTable {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    const HEAD_0: &[&str] = &["Week", "Weekly", "Accumulated", "Net", "Outstanding", "Net", "Outstanding"];
    const HEAD_1: &[&str] = &["Ending", "Exports", "Exports", "Sales", "Sales", "Sales", "Sales"];
    const HEAD_2: &[&str] = &["", "MY", "MY", "MY", "MY", "NMY", "NMY"];
    const SEP: &[&str] = &[""];

    #[test]
    fn headers_are_joined_and_suffixed() {
        let raw = first_table(SAMPLE_PAGE).unwrap();
        let headers = reconstruct_headers(&raw, &EXPORT_SALES_LAYOUT).unwrap();
        assert_eq!(
            headers,
            vec![
                "Week Ending",
                "Weekly Exports",
                "Accumulated Exports",
                "Net Sales",
                "Outstanding Sales",
                "Net Sales NMY",
                "Outstanding Sales NMY",
            ]
        );
    }

    #[test]
    fn parses_sample_page() {
        let table = normalize_html(SAMPLE_PAGE, all_time()).unwrap();
        // the N/A row and the footnote row are dropped
        assert_eq!(table.dropped_rows, 2);
        assert_eq!(table.series.len(), 4);

        let r = &table.series.records()[1];
        assert_eq!(r.week_ending, day("2021-09-02"));
        assert_eq!(r.weekly_exports, 1_100_000);
        assert_eq!(r.accumulated_exports, 1_100_000);
        assert_eq!(r.net_sales, 2_000_000);
        assert_eq!(r.outstanding_sales, 19_000_000);
        assert_eq!(r.net_sales_next_year, 0);
        assert_eq!(r.market_year, None);

        let last = table.series.last().unwrap();
        assert_eq!(last.net_sales_next_year, 10_000);
        assert_eq!(last.outstanding_sales_next_year, 10_000);
        assert_eq!(table.series.records()[2].net_sales, -150_000);
    }

    #[test]
    fn window_keeps_only_matching_weeks() {
        let raw = rows(&[
            HEAD_0,
            HEAD_1,
            HEAD_2,
            SEP,
            &["01/07/2021", "50", "50", "1", "2", "3", "4"],
            &["01/14/2021", "30", "80", "1", "2", "3", "4"],
        ]);
        let table = normalize(&raw, window("2021-01-01", "2021-01-10")).unwrap();
        assert_eq!(table.series.len(), 1);
        assert_eq!(table.series.records()[0].week_ending, day("2021-01-07"));
    }

    #[test]
    fn output_is_ordered_and_inside_window() {
        let w = window("2021-01-07", "2021-01-21");
        let raw = rows(&[
            HEAD_0,
            HEAD_1,
            HEAD_2,
            SEP,
            &["01/28/2021", "1", "9", "0", "0", "0", "0"],
            &["01/21/2021", "1", "8", "0", "0", "0", "0"],
            &["01/07/2021", "1", "6", "0", "0", "0", "0"],
            &["01/14/2021", "1", "7", "0", "0", "0", "0"],
            &["12/31/2020", "1", "5", "0", "0", "0", "0"],
        ]);
        let series = normalize(&raw, w).unwrap().series;
        assert_eq!(series.len(), 3);
        assert!(series
            .records()
            .windows(2)
            .all(|p| p[0].week_ending < p[1].week_ending));
        assert!(series.iter().all(|r| w.contains(r.week_ending)));
    }

    #[test]
    fn bad_rows_are_skipped_not_raised() {
        let raw = rows(&[
            HEAD_0,
            HEAD_1,
            HEAD_2,
            SEP,
            &["01/07/2021", "50", "50", "N/A", "2", "3", "4"],
            &["not a date", "50", "50", "1", "2", "3", "4"],
            &["01/14/2021", "30", "80"],
            &["01/21/2021", "30", "110", "1", "2", "3", "4"],
        ]);
        let table = normalize(&raw, all_time()).unwrap();
        assert_eq!(table.dropped_rows, 3);
        assert_eq!(table.series.len(), 1);
        assert_eq!(table.series.records()[0].week_ending, day("2021-01-21"));
    }

    #[test]
    fn header_rows_are_never_data() {
        // rows 2 and 3 look like data but sit inside the header block
        let raw = rows(&[
            HEAD_0,
            HEAD_1,
            &["01/07/2021", "1", "1", "1", "1", "1", "1"],
            &["01/14/2021", "1", "2", "1", "1", "1", "1"],
            &["01/21/2021", "1", "3", "1", "1", "1", "1"],
        ]);
        let series = normalize(&raw, all_time()).unwrap().series;
        assert_eq!(series.len(), 1);
        assert_eq!(series.records()[0].week_ending, day("2021-01-21"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let raw = rows(&[
            &["WEEK", "weekly", "Accumulated", "NET", "outstanding", "Net", "OUTSTANDING"],
            &["ending", "EXPORTS", "exports", "sales", "SALES", "sales", "sales"],
            HEAD_2,
            SEP,
            &["01/07/2021", "50", "50", "1", "2", "3", "4"],
        ]);
        let table = normalize(&raw, all_time()).unwrap();
        assert_eq!(table.headers[0], "WEEK ending");
        assert_eq!(table.headers[6], "OUTSTANDING sales NMY");
        assert_eq!(table.series.len(), 1);
        assert_eq!(table.series.records()[0].outstanding_sales_next_year, 4);
    }

    #[test]
    fn short_table_is_a_parse_error() {
        let raw = rows(&[HEAD_0, HEAD_1, HEAD_2]);
        let err = normalize(&raw, all_time()).unwrap_err();
        assert!(matches!(err, ExportSalesError::Parse { .. }));
    }

    #[test]
    fn unknown_headers_are_a_parse_error() {
        let raw = rows(&[
            &["Date", "Price"],
            &["", ""],
            &["", ""],
            SEP,
            &["01/07/2021", "10"],
        ]);
        let err = normalize(&raw, all_time()).unwrap_err();
        assert!(matches!(err, ExportSalesError::Parse { .. }));
    }

    #[test]
    fn header_only_table_yields_empty_series() {
        let raw = rows(&[HEAD_0, HEAD_1, HEAD_2, SEP]);
        let table = normalize(&raw, all_time()).unwrap();
        assert!(table.series.is_empty());
        assert_eq!(table.dropped_rows, 0);
    }
}
