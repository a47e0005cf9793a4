// src/table/raw.rs

use crate::error::{ExportSalesError, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));

/// Upper bound on `colspan` so a malformed attribute cannot blow up a row.
const MAX_COLSPAN: usize = 64;

/// Cell text of one HTML table, row by row, with no typing applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract the first `<table>` of `html`.
///
/// Cells spanning several columns are repeated once per spanned column so
/// header fragments line up with the data cells beneath them.
pub fn first_table(html: &str) -> Result<RawTable> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| ExportSalesError::parse("document contains no table"))?;

    let rows = table
        .select(&ROW)
        .filter(|tr| belongs_to(tr, &table))
        .map(|tr| {
            let mut cells = Vec::new();
            for td in own_cells(&tr) {
                let span = td
                    .value()
                    .attr("colspan")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, MAX_COLSPAN);
                let text = cell_text(&td);
                cells.extend(std::iter::repeat(text).take(span));
            }
            cells
        })
        .collect();

    Ok(RawTable { rows })
}

/// Direct `td`/`th` children of `tr`; cells of nested tables stay inside
/// the text of the cell that holds them.
fn own_cells<'a>(tr: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
}

/// Skip rows of tables nested inside `table`.
fn belongs_to(tr: &ElementRef<'_>, table: &ElementRef<'_>) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
        .map_or(false, |owner| owner.id() == table.id())
}

/// Text content with runs of whitespace (including `&nbsp;`) collapsed.
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .flat_map(|t| t.split(|c: char| c.is_whitespace() || c == '\u{a0}'))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
