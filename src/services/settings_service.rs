use std::sync::RwLock;

use serde_json::json;
use tracing::{info, warn};

use crate::db::migrations::KEY_REPORT_SETTINGS;
use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::{ReportSettings, ReportSettingsUpdate};

const MAX_STORE_TIMEOUT_MS: u64 = 60_000;
const MAX_LOOKBACK_MONTHS: u32 = 120;

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<ReportSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<ReportSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(*settings);
            }
        }

        let settings = self.load_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings);
        }
        Ok(settings)
    }

    pub fn update(&self, input: ReportSettingsUpdate) -> AppResult<ReportSettings> {
        let mut current = self.get()?;

        if let Some(timeout_ms) = input.store_timeout_ms {
            ensure_valid_timeout(timeout_ms)?;
            current.store_timeout_ms = timeout_ms;
        }

        if let Some(months) = input.lookback_months {
            ensure_valid_lookback(months)?;
            current.lookback_months = months;
        }

        if let Some(mode) = input.sample_mode {
            current.sample_mode = mode;
        }

        self.db.with_connection(|conn| {
            SettingsRepository::store_json(conn, KEY_REPORT_SETTINGS, &current)
        })?;
        info!(
            target: "app::settings",
            sample_mode = current.sample_mode.as_str(),
            store_timeout_ms = current.store_timeout_ms,
            lookback_months = current.lookback_months,
            "report settings updated"
        );

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current);
        }
        Ok(current)
    }

    /// A missing or unreadable row yields the defaults rather than an error.
    fn load_from_db(&self) -> AppResult<ReportSettings> {
        let stored = self.db.with_connection(|conn| {
            match SettingsRepository::load_json::<ReportSettings>(conn, KEY_REPORT_SETTINGS) {
                Ok(value) => Ok(value),
                Err(AppError::MalformedRecord { reason, .. }) => {
                    warn!(target: "app::settings", %reason, "falling back to default report settings");
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })?;
        Ok(stored.unwrap_or_default())
    }
}

fn ensure_valid_timeout(timeout_ms: u64) -> AppResult<()> {
    if timeout_ms == 0 || timeout_ms > MAX_STORE_TIMEOUT_MS {
        return Err(AppError::validation_with_details(
            "store timeout must be between 1 and 60000 ms",
            json!({ "field": "storeTimeoutMs", "value": timeout_ms }),
        ));
    }
    Ok(())
}

fn ensure_valid_lookback(months: u32) -> AppResult<()> {
    if months == 0 || months > MAX_LOOKBACK_MONTHS {
        return Err(AppError::validation_with_details(
            "lookback must be between 1 and 120 months",
            json!({ "field": "lookbackMonths", "value": months }),
        ));
    }
    Ok(())
}
