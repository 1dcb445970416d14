use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::evaluation::parse_record_date;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        name,
        job_role,
        division,
        hire_date
    FROM employees
"#;

#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub job_role: String,
    pub division: String,
    pub hire_date: String,
}

impl EmployeeRow {
    pub fn new(name: &str, job_role: &str, division: &str, hire_date: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            job_role: job_role.to_string(),
            division: division.to_string(),
            hire_date: hire_date.to_string(),
        }
    }

    /// An unreadable hire date is kept as `None` instead of failing the whole row.
    pub fn into_record(self) -> Employee {
        let hire_date = parse_record_date(&self.hire_date);
        if hire_date.is_none() {
            warn!(
                target: "app::store",
                employee_id = self.id,
                raw = %self.hire_date,
                "unparseable hire date"
            );
        }
        Employee {
            id: self.id,
            name: self.name,
            job_role: self.job_role,
            division: self.division,
            hire_date,
        }
    }
}

impl TryFrom<&Row<'_>> for EmployeeRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(EmployeeRow {
            id: row.get("id")?,
            name: row.get("name")?,
            job_role: row.get("job_role")?,
            division: row.get("division")?,
            hire_date: row.get("hire_date")?,
        })
    }
}

pub struct EmployeeRepository;

impl EmployeeRepository {
    /// Returns the generated row id.
    pub fn insert(conn: &Connection, row: &EmployeeRow) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO employees (name, job_role, division, hire_date)
                VALUES (:name, :job_role, :division, :hire_date)
            "#,
            named_params! {
                ":name": &row.name,
                ":job_role": &row.job_role,
                ":division": &row.division,
                ":hire_date": &row.hire_date,
            },
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM employees WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<EmployeeRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| EmployeeRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<EmployeeRow>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", BASE_SELECT))?;
        let rows = stmt
            .query_map([], |row| EmployeeRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(conn: &Connection) -> AppResult<i64> {
        let total = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(total)
    }
}
