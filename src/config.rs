use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::ForexPartner;
use crate::error::{RemitError, Result};
use std::path::Path;

/// Fixed fee charged per order, keyed by who bears the intermediary
/// bank charges. Policy values, injected into the quote engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee when the sender absorbs intermediary charges ("OUR").
    pub our: Decimal,
    /// Fee when the beneficiary absorbs intermediary charges ("BEN").
    pub ben: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            our: Decimal::new(1500, 0),
            ben: Decimal::new(300, 0),
        }
    }
}

/// Tax percentage tables, expressed as fractions of the local amount.
///
/// The actual rates are mandated externally and change with regulation;
/// they are configuration, never code. The defaults are the sample rates
/// the test suite prices against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    #[serde(default)]
    pub fees: FeeSchedule,
    /// Conversion-service tax (GST) as a fraction of the local amount.
    pub gst_rate: Decimal,
    /// Tax collected at source (TCS) as a fraction of the local amount.
    pub tcs_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            // 0.5% GST, 5% TCS
            gst_rate: Decimal::new(5, 3),
            tcs_rate: Decimal::new(5, 2),
        }
    }
}

/// Full desk wiring: pricing policy plus the forex partner whose
/// settlement details appear on generated quote documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub pricing: PricingPolicy,
    #[serde(default)]
    pub partner: ForexPartner,
    /// Base URL for order-scoped document upload links.
    #[serde(default = "default_upload_base")]
    pub upload_base: String,
}

fn default_upload_base() -> String {
    "https://uploads.remitdesk.example/orders".to_string()
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            partner: ForexPartner::default(),
            upload_base: default_upload_base(),
        }
    }
}

impl DeskConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| RemitError::invalid("config", e.to_string()))
    }
}
