// src/pipeline.rs

use crate::commodity::CommodityCode;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::Source;
use crate::market_year::annotate;
use crate::record::{DateWindow, ExportSeries};
use crate::table::normalize_html;
use reqwest::Client;
use tracing::instrument;

/// Fetch the page for `code`, normalize it to `window` and tag market years.
///
/// `window` should reach back to at least one market-year reset week,
/// otherwise the result is empty.
#[instrument(skip(client, config), fields(base = %config.base_url))]
pub async fn export_sales_hist(
    client: &Client,
    config: &Config,
    code: &CommodityCode,
    window: DateWindow,
) -> Result<ExportSeries> {
    let url = code.url(&config.base_url)?;
    export_sales_from(client, &Source::Url(url), window).await
}

/// Same pipeline for any [`Source`].
pub async fn export_sales_from(
    client: &Client,
    source: &Source,
    window: DateWindow,
) -> Result<ExportSeries> {
    let html = source.read(client).await?;
    let table = normalize_html(&html, window)?;
    Ok(annotate(table.series))
}
