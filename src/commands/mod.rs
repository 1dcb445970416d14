pub mod database;
pub mod employees;
pub mod reports;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::task;
use tracing::{error, warn};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::employee_service::EmployeeService;
use crate::services::evaluation_store::SqliteEvaluationStore;
use crate::services::export_service::ExportService;
use crate::services::report_service::ReportService;
use crate::services::settings_service::SettingsService;

pub type SqliteReportService = ReportService<SqliteEvaluationStore>;

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    employee_service: Arc<EmployeeService>,
    settings_service: Arc<SettingsService>,
    report_service: Arc<SqliteReportService>,
    export_service: Arc<ExportService>,
}

impl AppState {
    /// Reports are written to a `reports` directory beside the database.
    pub fn new(db_pool: DbPool) -> AppResult<Self> {
        let export_service = ExportService::beside_database(db_pool.path())?;
        Self::with_export_service(db_pool, export_service)
    }

    pub fn with_export_service(db_pool: DbPool, export_service: ExportService) -> AppResult<Self> {
        let employee_service = Arc::new(EmployeeService::new(db_pool.clone()));
        let settings_service = Arc::new(SettingsService::new(db_pool.clone()));
        let report_settings = settings_service.get()?;
        let report_service = Arc::new(ReportService::new(
            SqliteEvaluationStore::new(db_pool.clone()),
            report_settings,
        ));

        Ok(Self {
            db_pool,
            employee_service,
            settings_service,
            report_service,
            export_service: Arc::new(export_service),
        })
    }

    pub fn employees(&self) -> Arc<EmployeeService> {
        Arc::clone(&self.employee_service)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn reports(&self) -> Arc<SqliteReportService> {
        Arc::clone(&self.report_service)
    }

    pub fn exports(&self) -> Arc<ExportService> {
        Arc::clone(&self.export_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " {details}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CommandError {}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => CommandError::new("NOT_FOUND", "requested record does not exist", None),
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::MalformedRecord { record, reason } => {
                warn!(target: "app::command", %record, %reason, "malformed record in command");
                CommandError::new(
                    "MALFORMED_RECORD",
                    format!("{record} could not be read"),
                    Some(serde_json::json!({ "reason": reason })),
                )
            }
            AppError::StoreTimeout { operation, timeout } => {
                warn!(target: "app::command", operation, "store timeout in command");
                CommandError::new(
                    "STORE_TIMEOUT",
                    format!("{operation} did not finish in time"),
                    Some(serde_json::json!({ "timeoutMs": timeout.as_millis() as u64 })),
                )
            }
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("IO_ERROR", format!("file system access failed: {error}"), None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    work: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    task::spawn_blocking(work)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("background task failed: {err}"), None))?
        .map_err(CommandError::from)
}
