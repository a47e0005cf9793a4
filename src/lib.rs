// src/lib.rs

pub mod commodity;
pub mod config;
pub mod error;
pub mod fetch;
pub mod market_year;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod table;

pub use commodity::CommodityCode;
pub use config::Config;
pub use error::ExportSalesError;
pub use market_year::{annotate, MarketYear};
pub use pipeline::{export_sales_from, export_sales_hist};
pub use record::{DateWindow, ExportSeries, WeeklyRecord};
