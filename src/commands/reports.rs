use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::models::employee::ActivityRecord;
use crate::models::report::{DashboardReport, ReportExportFormat, ReportExportResult};
use crate::models::settings::{ReportSettings, ReportSettingsUpdate};
use crate::services::employee_service::DEFAULT_ACTIVITY_LIMIT;

use super::{run_blocking, AppState, CommandError, CommandResult};

/// A single report that can be requested on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    AverageScore,
    ScoreDevelopment,
    TopPerformers,
    ImprovementPotential,
    StrengthsAndWeaknesses,
    ScoreChanges,
    WordCloud,
    EvaluationTrends,
    StaffDilution,
    CompletionRate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub report: DashboardReport,
    pub total_employees: i64,
    pub recent_activities: Vec<ActivityRecord>,
}

/// Serialized `ReportOutcome` of the requested report.
pub async fn reports_fetch(state: &AppState, kind: ReportKind) -> CommandResult<JsonValue> {
    let reports = state.reports();
    let value = match kind {
        ReportKind::AverageScore => serde_json::to_value(reports.average_score().await),
        ReportKind::ScoreDevelopment => serde_json::to_value(reports.score_development().await),
        ReportKind::TopPerformers => serde_json::to_value(reports.top_performers().await),
        ReportKind::ImprovementPotential => {
            serde_json::to_value(reports.improvement_potential().await)
        }
        ReportKind::StrengthsAndWeaknesses => {
            serde_json::to_value(reports.strengths_and_weaknesses().await)
        }
        ReportKind::ScoreChanges => serde_json::to_value(reports.score_changes().await),
        ReportKind::WordCloud => serde_json::to_value(reports.word_cloud().await),
        ReportKind::EvaluationTrends => serde_json::to_value(reports.evaluation_trends().await),
        ReportKind::StaffDilution => {
            let app_state = state.clone();
            let employees = run_blocking(move || app_state.employees().list_employees()).await?;
            serde_json::to_value(reports.staff_dilution(&employees))
        }
        ReportKind::CompletionRate => serde_json::to_value(reports.completion_rate().await),
    };
    value.map_err(|err| CommandError::from(AppError::from(err)))
}

pub async fn reports_dashboard(state: &AppState) -> CommandResult<DashboardOverview> {
    let report = state.reports().dashboard().await;

    let app_state = state.clone();
    let (total_employees, recent_activities) = run_blocking(move || {
        let employees = app_state.employees();
        Ok((
            employees.total_employees()?,
            employees.latest_activities(DEFAULT_ACTIVITY_LIMIT)?,
        ))
    })
    .await?;

    Ok(DashboardOverview {
        report,
        total_employees,
        recent_activities,
    })
}

pub async fn reports_export(
    state: &AppState,
    format: Option<ReportExportFormat>,
) -> CommandResult<ReportExportResult> {
    let report = state.reports().dashboard().await;
    let app_state = state.clone();
    let format = format.unwrap_or_default();
    run_blocking(move || app_state.exports().export_report(&report, format)).await
}

pub async fn settings_get(state: &AppState) -> CommandResult<ReportSettings> {
    let app_state = state.clone();
    run_blocking(move || app_state.settings().get()).await
}

/// Persists the update and applies it to subsequent report runs.
pub async fn settings_update(
    state: &AppState,
    update: ReportSettingsUpdate,
) -> CommandResult<ReportSettings> {
    let app_state = state.clone();
    let settings = run_blocking(move || app_state.settings().update(update)).await?;
    state.reports().apply_settings(settings);
    Ok(settings)
}
