// src/commodity.rs

use crate::error::{ExportSalesError, Result};
use std::{fmt, str::FromStr};
use url::Url;

/// Opaque identifier of one export-sales page, e.g. `h801`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommodityCode(String);

/// A commodity whose page code is known ahead of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownCommodity {
    pub code: &'static str,
    pub name: &'static str,
}

pub static KNOWN_COMMODITIES: &[KnownCommodity] = &[
    KnownCommodity { code: "h801", name: "soybeans" },
    KnownCommodity { code: "h401", name: "corn" },
    KnownCommodity { code: "h901", name: "soybean cake and meal" },
    KnownCommodity { code: "h902", name: "soybean oil" },
    KnownCommodity { code: "h107", name: "wheat" },
];

impl CommodityCode {
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ExportSalesError::InvalidCommodityCode {
                code,
                reason: "empty".into(),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExportSalesError::InvalidCommodityCode {
                code,
                reason: "only ASCII letters and digits are allowed".into(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Accept either a page code or the name of a known commodity.
    pub fn resolve(code_or_name: &str) -> Result<Self> {
        let needle = code_or_name.trim();
        if let Some(known) = KNOWN_COMMODITIES
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(needle))
        {
            return Ok(Self(known.code.to_string()));
        }
        Self::new(needle)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<&'static KnownCommodity> {
        KNOWN_COMMODITIES.iter().find(|k| k.code == self.0)
    }

    /// `<base>/<code>.htm`
    pub fn url(&self, base: &Url) -> Result<Url> {
        base.join(&format!("{}.htm", self.0))
            .map_err(|e| ExportSalesError::InvalidCommodityCode {
                code: self.0.clone(),
                reason: format!("cannot join onto {}: {}", base, e),
            })
    }
}

impl FromStr for CommodityCode {
    type Err = ExportSalesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for CommodityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
