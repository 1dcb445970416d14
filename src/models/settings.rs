use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::report::SampleMode;

pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    #[serde(default)]
    pub sample_mode: SampleMode,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// Trailing window used by score development, score changes and staff dilution.
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,
}

impl ReportSettings {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            sample_mode: SampleMode::Full,
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettingsUpdate {
    #[serde(default)]
    pub sample_mode: Option<SampleMode>,
    #[serde(default)]
    pub store_timeout_ms: Option<u64>,
    #[serde(default)]
    pub lookback_months: Option<u32>,
}

fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

fn default_lookback_months() -> u32 {
    DEFAULT_LOOKBACK_MONTHS
}
