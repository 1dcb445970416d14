use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::evaluation::{parse_record_date, Evaluation, RawScores};

const BASE_SELECT: &str = r#"
    SELECT
        id,
        employee_id,
        employee_name,
        work_location,
        job_role,
        specific_task,
        scores,
        comment,
        total_score,
        date
    FROM evaluations
"#;

/// Storage shape of an evaluation; `scores` is the JSON-encoded sub-score object.
#[derive(Debug, Clone)]
pub struct EvaluationRow {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub work_location: String,
    pub job_role: String,
    pub specific_task: String,
    pub scores: String,
    pub comment: Option<String>,
    pub total_score: i64,
    pub date: String,
}

impl EvaluationRow {
    pub fn from_record(record: &Evaluation) -> AppResult<Self> {
        Ok(Self {
            id: record.id,
            employee_id: record.employee_id,
            employee_name: record.employee_name.clone(),
            work_location: record.work_location.clone(),
            job_role: record.job_role.clone(),
            specific_task: record.specific_task.clone(),
            scores: record.scores.to_json_string()?,
            comment: if record.comment.is_empty() {
                None
            } else {
                Some(record.comment.clone())
            },
            total_score: record.total_score,
            date: record.date.format("%Y-%m-%d").to_string(),
        })
    }

    pub fn into_record(self) -> AppResult<Evaluation> {
        let label = format!("evaluation {}", self.id);
        let scores = RawScores::Encoded(self.scores)
            .normalize()
            .map_err(|reason| AppError::malformed(label.clone(), reason))?;
        let date = parse_record_date(&self.date).ok_or_else(|| {
            AppError::malformed(label.clone(), format!("unreadable date `{}`", self.date))
        })?;

        Ok(Evaluation {
            id: self.id,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            work_location: self.work_location,
            job_role: self.job_role,
            specific_task: self.specific_task,
            scores,
            comment: self.comment.unwrap_or_default(),
            total_score: self.total_score,
            date,
        })
    }
}

impl TryFrom<&Row<'_>> for EvaluationRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(EvaluationRow {
            id: row.get("id")?,
            employee_id: row.get("employee_id")?,
            employee_name: row.get("employee_name")?,
            work_location: row.get("work_location")?,
            job_role: row.get("job_role")?,
            specific_task: row.get("specific_task")?,
            scores: row.get("scores")?,
            comment: row.get("comment")?,
            total_score: row.get("total_score")?,
            date: row.get("date")?,
        })
    }
}

pub struct EvaluationRepository;

impl EvaluationRepository {
    /// Returns the generated row id; `row.id` is ignored.
    pub fn insert(conn: &Connection, row: &EvaluationRow) -> AppResult<i64> {
        conn.execute(
            r#"
                INSERT INTO evaluations (
                    employee_id,
                    employee_name,
                    work_location,
                    job_role,
                    specific_task,
                    scores,
                    comment,
                    total_score,
                    date
                ) VALUES (
                    :employee_id,
                    :employee_name,
                    :work_location,
                    :job_role,
                    :specific_task,
                    :scores,
                    :comment,
                    :total_score,
                    :date
                )
            "#,
            named_params! {
                ":employee_id": row.employee_id,
                ":employee_name": &row.employee_name,
                ":work_location": &row.work_location,
                ":job_role": &row.job_role,
                ":specific_task": &row.specific_task,
                ":scores": &row.scores,
                ":comment": &row.comment,
                ":total_score": row.total_score,
                ":date": &row.date,
            },
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<EvaluationRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| EvaluationRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    /// Newest first.
    pub fn list_for_employee(conn: &Connection, employee_id: i64) -> AppResult<Vec<EvaluationRow>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE employee_id = ?1 ORDER BY date DESC, id DESC",
            BASE_SELECT
        ))?;
        let rows = stmt
            .query_map([employee_id], |row| EvaluationRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_for_employee(conn: &Connection, employee_id: i64) -> AppResult<i64> {
        let total = conn.query_row(
            "SELECT COUNT(*) FROM evaluations WHERE employee_id = ?1",
            [employee_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
