// src/fetch.rs

use crate::error::{ExportSalesError, Result};
use reqwest::Client;
use std::{fmt, path::PathBuf};
use tracing::{debug, info};
use url::Url;

/// Where an export-sales page comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Url(Url),
    File(PathBuf),
    /// Page contents already in memory.
    Html(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Html(html) => write!(f, "<inline html, {} bytes>", html.len()),
        }
    }
}

impl Source {
    /// Read the whole document as text.
    pub async fn read(&self, client: &Client) -> Result<String> {
        match self {
            Source::Url(url) => get_text(client, url).await,
            Source::File(path) => {
                debug!(path = %path.display(), "reading page from disk");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| ExportSalesError::unavailable(path.display().to_string(), e))
            }
            Source::Html(html) => Ok(html.clone()),
        }
    }
}

/// GET `url` and return the body; any transport error or non-2xx status
/// means the source is unavailable.
pub async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!(%url, "fetching");
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ExportSalesError::unavailable(url.as_str(), e))?
        .error_for_status()
        .map_err(|e| ExportSalesError::unavailable(url.as_str(), e))?;
    let body = resp
        .text()
        .await
        .map_err(|e| ExportSalesError::unavailable(url.as_str(), e))?;
    info!(%url, bytes = body.len(), "fetched");
    Ok(body)
}
