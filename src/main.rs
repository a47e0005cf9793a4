// src/main.rs

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use exportsales::{
    commodity::{CommodityCode, KNOWN_COMMODITIES},
    config::Config,
    export_sales_from, export_sales_hist,
    fetch::Source,
    output::{write_series, Format},
    DateWindow,
};
use std::{env, io, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "exportsales",
    about = "Weekly export sales history tagged with market years"
)]
struct Cli {
    /// Commodity page code (h801) or known name (soybeans); optional with --file
    #[arg(required_unless_present_any = ["list", "file"])]
    commodity: Option<String>,

    /// First week ending to keep (YYYY-MM-DD)
    #[arg(long, required_unless_present = "list")]
    beg: Option<NaiveDate>,

    /// Last week ending to keep (YYYY-MM-DD)
    #[arg(long, required_unless_present = "list")]
    end: Option<NaiveDate>,

    /// json or csv
    #[arg(long, default_value = "json")]
    format: Format,

    /// Overrides EXPORT_SALES_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides EXPORT_SALES_TIMEOUT_SECS
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Read a saved page instead of fetching it
    #[arg(long)]
    file: Option<PathBuf>,

    /// Print the known commodity codes and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for known in KNOWN_COMMODITIES {
            println!("{}\t{}", known.code, known.name);
        }
        return Ok(());
    }

    // ─── 2) configure ────────────────────────────────────────────────
    let mut config = Config::from_env().context("reading environment")?;
    if let Some(base) = &cli.base_url {
        config = config.with_base_url(base).context("--base-url")?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs).context("--timeout-secs")?;
    }
    let client = config.http_client()?;

    let (Some(beg), Some(end)) = (cli.beg, cli.end) else {
        bail!("--beg and --end are required");
    };
    if beg > end {
        bail!("--beg {} is after --end {}", beg, end);
    }
    let window = DateWindow::new(beg, end);
    let code = cli
        .commodity
        .as_deref()
        .map(CommodityCode::resolve)
        .transpose()?;
    if let Some(code) = &code {
        if let Some(known) = code.known() {
            info!(code = %code, name = known.name, "commodity");
        }
    }

    // ─── 3) fetch, normalize, annotate ───────────────────────────────
    let (source_label, series) = match (&cli.file, &code) {
        (Some(path), _) => (
            path.display().to_string(),
            export_sales_from(&client, &Source::File(path.clone()), window).await,
        ),
        (None, Some(code)) => (
            code.to_string(),
            export_sales_hist(&client, &config, code, window).await,
        ),
        (None, None) => bail!("either COMMODITY or --file is required"),
    };
    let series = series.with_context(|| format!("loading export sales from {}", source_label))?;

    if series.is_empty() {
        info!("no records; the window may not reach back to a market year reset week");
    } else {
        info!(records = series.len(), "done");
    }

    // ─── 4) write ────────────────────────────────────────────────────
    write_series(&series, cli.format, io::stdout().lock())?;
    Ok(())
}
