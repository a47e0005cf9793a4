// src/table/mod.rs

pub mod cell;
pub mod normalize;
pub mod raw;

pub use normalize::{normalize, normalize_html, NormalizedTable, TableLayout, EXPORT_SALES_LAYOUT};
pub use raw::{first_table, RawTable};
