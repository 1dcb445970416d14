use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppSettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for AppSettingRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Key/value store for JSON-encoded application settings.
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn get(conn: &Connection, key: &str) -> AppResult<Option<AppSettingRow>> {
        let row = conn
            .query_row(
                "SELECT key, value, updated_at FROM app_settings WHERE key = ?1",
                [key],
                |row| AppSettingRow::try_from(row),
            )
            .optional()?;
        Ok(row)
    }

    pub fn upsert(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO app_settings (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": key, ":value": value},
        )?;
        Ok(())
    }

    /// Decodes the stored value; an undecodable payload is reported as malformed.
    pub fn load_json<T: DeserializeOwned>(conn: &Connection, key: &str) -> AppResult<Option<T>> {
        match Self::get(conn, key)? {
            Some(row) => serde_json::from_str(&row.value)
                .map(Some)
                .map_err(|err| AppError::malformed(format!("setting `{key}`"), err.to_string())),
            None => Ok(None),
        }
    }

    pub fn store_json<T: Serialize>(conn: &Connection, key: &str, value: &T) -> AppResult<()> {
        let encoded = serde_json::to_string(value)?;
        Self::upsert(conn, key, &encoded)
    }
}
