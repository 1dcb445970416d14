use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;
use crate::models::employee::ActivityRecord;

#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub id: i64,
    pub kind: String,
    pub employee_name: String,
    pub timestamp: String,
}

impl ActivityRow {
    pub fn into_record(self) -> ActivityRecord {
        ActivityRecord {
            id: self.id,
            kind: self.kind,
            employee_name: self.employee_name,
            timestamp: self.timestamp,
        }
    }
}

impl TryFrom<&Row<'_>> for ActivityRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(ActivityRow {
            id: row.get("id")?,
            kind: row.get("type")?,
            employee_name: row.get("employee_name")?,
            timestamp: row.get("timestamp")?,
        })
    }
}

pub struct ActivityRepository;

impl ActivityRepository {
    pub fn insert(
        conn: &Connection,
        kind: &str,
        employee_name: &str,
        timestamp: &str,
    ) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO activities (type, employee_name, timestamp)
                VALUES (:type, :employee_name, :timestamp)
            "#,
            named_params! {
                ":type": kind,
                ":employee_name": employee_name,
                ":timestamp": timestamp,
            },
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent first; equal timestamps fall back to insertion order.
    pub fn list_latest(conn: &Connection, limit: usize) -> AppResult<Vec<ActivityRow>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, type, employee_name, timestamp
                FROM activities
                ORDER BY timestamp DESC, id DESC
                LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map([limit as i64], |row| ActivityRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
