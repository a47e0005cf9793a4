// src/output.rs

use crate::record::ExportSeries;
use anyhow::{Context, Result};
use std::{io::Write, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(format!("unknown format {:?} (expected json or csv)", other)),
        }
    }
}

/// Write `series` to `out` in `format`.
pub fn write_series<W: Write>(series: &ExportSeries, format: Format, mut out: W) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, series).context("writing JSON")?;
            writeln!(out)?;
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            for rec in series {
                wtr.serialize(rec).context("writing CSV row")?;
            }
            wtr.flush().context("flushing CSV")?;
        }
    }
    Ok(())
}
