use async_trait::async_trait;
use tokio::task;
use tracing::{debug, warn};

use crate::db::repositories::employee_repository::EmployeeRepository;
use crate::db::repositories::evaluation_repository::EvaluationRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::employee::Employee;
use crate::models::evaluation::Evaluation;

/// Read side the reports are computed from.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    /// Evaluations of one employee, newest first. Unreadable records are left out.
    async fn list_evaluations_for_employee(&self, employee_id: i64) -> AppResult<Vec<Evaluation>>;
}

#[derive(Clone, Debug)]
pub struct SqliteEvaluationStore {
    db: DbPool,
}

impl SqliteEvaluationStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EvaluationStore for SqliteEvaluationStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let db = self.db.clone();
        let rows = task::spawn_blocking(move || db.with_connection(EmployeeRepository::list_all))
            .await??;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    async fn list_evaluations_for_employee(&self, employee_id: i64) -> AppResult<Vec<Evaluation>> {
        let db = self.db.clone();
        let rows = task::spawn_blocking(move || {
            db.with_connection(|conn| EvaluationRepository::list_for_employee(conn, employee_id))
        })
        .await??;

        let total = rows.len();
        let mut evaluations = Vec::with_capacity(total);
        for row in rows {
            let id = row.id;
            match row.into_record() {
                Ok(evaluation) => evaluations.push(evaluation),
                Err(err) => warn!(
                    target: "app::store",
                    employee_id,
                    evaluation_id = id,
                    error = %err,
                    "skipping unreadable evaluation"
                ),
            }
        }
        debug!(
            target: "app::store",
            employee_id,
            loaded = evaluations.len(),
            skipped = total - evaluations.len(),
            "evaluations loaded"
        );
        Ok(evaluations)
    }
}
