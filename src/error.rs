// src/error.rs

/// Errors surfaced by the export-sales pipeline.
///
/// Row-level parse failures never show up here: the normalizer drops those
/// rows and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ExportSalesError {
    #[error("source unavailable: {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("unexpected table layout: {reason}")]
    Parse { reason: String },

    #[error("invalid commodity code {code:?}: {reason}")]
    InvalidCommodityCode { code: String, reason: String },

    #[error("invalid config value {key}: {reason}")]
    InvalidConfig { key: String, reason: String },
}

impl ExportSalesError {
    pub(crate) fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportSalesError>;
