use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::Connection;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::db::repositories::activity_repository::ActivityRepository;
use crate::db::repositories::employee_repository::{EmployeeRepository, EmployeeRow};
use crate::db::repositories::evaluation_repository::{EvaluationRepository, EvaluationRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::employee::{
    ActivityRecord, Employee, EmployeeCreateInput, EmployeeSummary, ACTIVITY_EMPLOYEE_ADDED,
    ACTIVITY_EMPLOYEE_REMOVED, ACTIVITY_EVALUATION_ADDED, ACTIVITY_EVALUATION_IMPORTED,
};
use crate::models::evaluation::{
    parse_record_date, CategoryScores, Evaluation, EvaluationCreateInput, EvaluationDocument,
};

pub const DEFAULT_ACTIVITY_LIMIT: usize = 2;

/// Write side for employees, their evaluations and the activity log.
#[derive(Clone)]
pub struct EmployeeService {
    db: DbPool,
}

impl EmployeeService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_employee(&self, input: EmployeeCreateInput) -> AppResult<Employee> {
        let name = required("name", &input.name)?;
        let job_role = required("jobRole", &input.job_role)?;
        let division = required("division", &input.division)?;
        let hire_date = parse_record_date(&input.hire_date).ok_or_else(|| {
            AppError::validation_with_details(
                "hire date must be an ISO date",
                json!({ "field": "hireDate", "value": input.hire_date }),
            )
        })?;

        let row = EmployeeRow::new(name, job_role, division, &format_date(hire_date));
        let id = self.db.with_transaction(|tx| {
            let id = EmployeeRepository::insert(tx, &row)?;
            log_activity(tx, ACTIVITY_EMPLOYEE_ADDED, name)?;
            Ok(id)
        })?;
        info!(target: "app::employees", employee_id = id, "employee created");

        Ok(Employee {
            id,
            name: name.to_string(),
            job_role: job_role.to_string(),
            division: division.to_string(),
            hire_date: Some(hire_date),
        })
    }

    pub fn get_employee(&self, id: i64) -> AppResult<Employee> {
        let row = self
            .db
            .with_connection(|conn| EmployeeRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        Ok(row.into_record())
    }

    pub fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let rows = self.db.with_connection(EmployeeRepository::list_all)?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    /// Every employee with their stored evaluation count, read on one connection.
    pub fn list_employee_summaries(&self) -> AppResult<Vec<EmployeeSummary>> {
        self.db.with_connection(|conn| {
            EmployeeRepository::list_all(conn)?
                .into_iter()
                .map(|row| {
                    let evaluation_count = EvaluationRepository::count_for_employee(conn, row.id)?;
                    Ok(EmployeeSummary {
                        employee: row.into_record(),
                        evaluation_count,
                    })
                })
                .collect()
        })
    }

    /// Removes the employee and, through the foreign key, their evaluations.
    pub fn delete_employee(&self, id: i64) -> AppResult<()> {
        let employee = self.get_employee(id)?;
        self.db.with_transaction(|tx| {
            EmployeeRepository::delete(tx, id)?;
            log_activity(tx, ACTIVITY_EMPLOYEE_REMOVED, &employee.name)
        })?;
        info!(target: "app::employees", employee_id = id, "employee deleted");
        Ok(())
    }

    pub fn total_employees(&self) -> AppResult<i64> {
        self.db.with_connection(EmployeeRepository::count)
    }

    pub fn record_evaluation(&self, input: EvaluationCreateInput) -> AppResult<Evaluation> {
        let employee = self.get_employee(input.employee_id)?;
        ensure_scores_in_range(&input.scores)?;
        let date = resolve_date(input.date.as_deref())?;
        let total_score = input.scores.total();

        let evaluation = Evaluation {
            id: 0,
            employee_id: employee.id,
            employee_name: employee.name,
            work_location: input.work_location,
            job_role: input.job_role,
            specific_task: input.specific_task,
            scores: input.scores,
            comment: input.comment,
            total_score,
            date,
        };
        self.store_evaluation(evaluation, ACTIVITY_EVALUATION_ADDED)
    }

    /// Stores `document` for `employee_id`, whatever employee it was exported from.
    pub fn import_evaluation(
        &self,
        employee_id: i64,
        document: EvaluationDocument,
    ) -> AppResult<Evaluation> {
        let employee = self.get_employee(employee_id)?;
        let scores = document.normalized_scores().map_err(|reason| {
            AppError::validation_with_details(
                "evaluation scores could not be read",
                json!({ "field": "scores", "reason": reason }),
            )
        })?;
        ensure_scores_in_range(&scores)?;
        let date = resolve_date(document.date.as_deref())?;

        let computed = scores.total();
        let total_score = match document.total_score {
            Some(total) if total != computed => {
                warn!(
                    target: "app::employees",
                    employee_id,
                    stored = total,
                    computed,
                    "imported total differs from its sub-scores"
                );
                total
            }
            Some(total) => total,
            None => computed,
        };

        let evaluation = Evaluation {
            id: 0,
            employee_id: employee.id,
            employee_name: employee.name,
            work_location: document.work_location,
            job_role: document.job_role,
            specific_task: document.specific_task,
            scores,
            comment: document.comment,
            total_score,
            date,
        };
        self.store_evaluation(evaluation, ACTIVITY_EVALUATION_IMPORTED)
    }

    pub fn get_evaluation(&self, id: i64) -> AppResult<Evaluation> {
        let row = self
            .db
            .with_connection(|conn| EvaluationRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        row.into_record()
    }

    /// Newest first. Unreadable stored evaluations are skipped.
    pub fn list_evaluations(&self, employee_id: i64) -> AppResult<Vec<Evaluation>> {
        self.get_employee(employee_id)?;
        let rows = self
            .db
            .with_connection(|conn| EvaluationRepository::list_for_employee(conn, employee_id))?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_record().ok())
            .collect())
    }

    pub fn export_evaluation(&self, id: i64) -> AppResult<EvaluationDocument> {
        let evaluation = self.get_evaluation(id)?;
        Ok(EvaluationDocument::from_evaluation(&evaluation)?)
    }

    pub fn latest_activities(&self, limit: usize) -> AppResult<Vec<ActivityRecord>> {
        let rows = self
            .db
            .with_connection(|conn| ActivityRepository::list_latest(conn, limit))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    fn store_evaluation(&self, mut evaluation: Evaluation, activity: &str) -> AppResult<Evaluation> {
        let row = EvaluationRow::from_record(&evaluation)?;
        let id = self.db.with_transaction(|tx| {
            let id = EvaluationRepository::insert(tx, &row)?;
            log_activity(tx, activity, &row.employee_name)?;
            Ok(id)
        })?;
        evaluation.id = id;
        info!(
            target: "app::employees",
            evaluation_id = id,
            employee_id = evaluation.employee_id,
            total_score = evaluation.total_score,
            activity,
            "evaluation stored"
        );
        Ok(evaluation)
    }
}

fn log_activity(conn: &Connection, kind: &str, employee_name: &str) -> AppResult<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    ActivityRepository::insert(conn, kind, employee_name, &timestamp)?;
    debug!(target: "app::employees", kind, employee_name, "activity logged");
    Ok(())
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation_with_details(
            format!("{field} must not be empty"),
            json!({ "field": field }),
        ));
    }
    Ok(trimmed)
}

fn ensure_scores_in_range(scores: &CategoryScores) -> AppResult<()> {
    if let Some((category, points)) = scores.out_of_range() {
        return Err(AppError::validation_with_details(
            format!(
                "{} must be between 0 and {} points",
                category.label(),
                category.max_points()
            ),
            json!({ "field": category.key(), "value": points, "max": category.max_points() }),
        ));
    }
    Ok(())
}

/// A missing date means today.
fn resolve_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_record_date(value).ok_or_else(|| {
            AppError::validation_with_details(
                "evaluation date must be RFC 3339 or YYYY-MM-DD",
                json!({ "field": "date", "value": value }),
            )
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
