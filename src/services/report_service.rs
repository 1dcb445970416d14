use std::future::Future;
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error};

use crate::error::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::report::{
    CategoryAverage, DashboardReport, EmployeeTrend, MonthlyTrend, PerformerScore, ReportOutcome,
    SampleInfo, SampleMode, ScoreDevelopment, WordFrequency,
};
use crate::models::settings::ReportSettings;
use crate::services::calculations::{self, EmployeeEvaluations};
use crate::services::evaluation_store::EvaluationStore;
use crate::services::report_fallbacks as fallback;

/// Computes the evaluation reports from a store, serving fixed fallbacks
/// whenever the data cannot be read.
pub struct ReportService<S> {
    store: S,
    settings: RwLock<ReportSettings>,
    today: Option<NaiveDate>,
}

impl<S: EvaluationStore> ReportService<S> {
    pub fn new(store: S, settings: ReportSettings) -> Self {
        Self {
            store,
            settings: RwLock::new(settings),
            today: None,
        }
    }

    /// Pins the reference date used for trailing windows.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn settings(&self) -> ReportSettings {
        match self.settings.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn apply_settings(&self, settings: ReportSettings) {
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
        debug!(target: "app::reports", ?settings, "report settings applied");
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn window_start(&self) -> NaiveDate {
        calculations::window_start(self.today(), self.settings().lookback_months)
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let timeout = self.settings().store_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::store_timeout(operation, timeout)),
        }
    }

    async fn employees(&self) -> AppResult<Vec<Employee>> {
        self.bounded("list_employees", self.store.list_employees())
            .await
    }

    async fn evaluations_for(&self, employees: Vec<Employee>) -> AppResult<Vec<EmployeeEvaluations>> {
        let mut dataset = Vec::with_capacity(employees.len());
        for employee in employees {
            let evaluations = self
                .bounded(
                    "list_evaluations_for_employee",
                    self.store.list_evaluations_for_employee(employee.id),
                )
                .await?;
            dataset.push(EmployeeEvaluations::new(employee, evaluations));
        }
        Ok(dataset)
    }

    async fn dataset(&self) -> AppResult<Vec<EmployeeEvaluations>> {
        let employees = self.employees().await?;
        self.evaluations_for(employees).await
    }

    pub async fn average_score(&self) -> ReportOutcome<f64> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::average_score(&data));
        settle("average_score", result, || fallback::AVERAGE_SCORE)
    }

    pub async fn score_development(&self) -> ReportOutcome<ScoreDevelopment> {
        let mode = self.settings().sample_mode;
        let since = self.window_start();
        let result = self.sampled_development(mode, since).await;

        settle("score_development", result, || ScoreDevelopment {
            points: fallback::placeholder_development(),
            sample: SampleInfo {
                mode,
                sampled_employees: 0,
                total_employees: 0,
            },
            is_placeholder: true,
        })
    }

    async fn sampled_development(
        &self,
        mode: SampleMode,
        since: NaiveDate,
    ) -> AppResult<ScoreDevelopment> {
        let employees = self.employees().await?;
        let total_employees = employees.len();
        let sampled = calculations::sample_employees(&employees, mode);
        let sample = SampleInfo {
            mode,
            sampled_employees: sampled.len(),
            total_employees,
        };
        let data = self.evaluations_for(sampled).await?;
        let points = calculations::score_development(&data, since);
        if points.is_empty() {
            return Ok(ScoreDevelopment {
                points: fallback::placeholder_development(),
                sample,
                is_placeholder: true,
            });
        }
        Ok(ScoreDevelopment {
            points,
            sample,
            is_placeholder: false,
        })
    }

    pub async fn top_performers(&self) -> ReportOutcome<Vec<PerformerScore>> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::top_performers(&data));
        settle("top_performers", result, fallback::top_performers)
    }

    pub async fn improvement_potential(&self) -> ReportOutcome<Vec<CategoryAverage>> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::improvement_potential(&data));
        settle("improvement_potential", result, fallback::improvement_potential)
    }

    pub async fn strengths_and_weaknesses(&self) -> ReportOutcome<Vec<CategoryAverage>> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::strengths_and_weaknesses(&data));
        settle(
            "strengths_and_weaknesses",
            result,
            fallback::strengths_and_weaknesses,
        )
    }

    pub async fn score_changes(&self) -> ReportOutcome<Vec<EmployeeTrend>> {
        let since = self.window_start();
        let result = self
            .dataset()
            .await
            .map(|data| calculations::score_changes(&data, since));
        settle("score_changes", result, fallback::score_changes)
    }

    pub async fn word_cloud(&self) -> ReportOutcome<Vec<WordFrequency>> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::word_cloud(&data));
        settle("word_cloud", result, fallback::word_cloud)
    }

    pub async fn evaluation_trends(&self) -> ReportOutcome<Vec<MonthlyTrend>> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::evaluation_trends(&data));
        settle("evaluation_trends", result, fallback::evaluation_trends)
    }

    /// Works on the caller's employees; never touches the store.
    pub fn staff_dilution(&self, employees: &[Employee]) -> ReportOutcome<f64> {
        ReportOutcome::fresh(calculations::staff_dilution(employees, self.window_start()))
    }

    pub async fn completion_rate(&self) -> ReportOutcome<f64> {
        let result = self
            .dataset()
            .await
            .map(|data| calculations::completion_rate(&data));
        settle("completion_rate", result, || fallback::COMPLETION_RATE)
    }

    async fn current_staff_dilution(&self) -> ReportOutcome<f64> {
        match self.employees().await {
            Ok(employees) => self.staff_dilution(&employees),
            Err(err) => {
                log_fallback("staff_dilution", &err);
                ReportOutcome::fallback(fallback::STAFF_DILUTION)
            }
        }
    }

    /// Every report at once; each entry carries its own degraded flag.
    pub async fn dashboard(&self) -> DashboardReport {
        let (
            average_score,
            score_development,
            top_performers,
            improvement_potential,
            strengths_and_weaknesses,
            score_changes,
            word_cloud,
            evaluation_trends,
            staff_dilution,
            completion_rate,
        ) = tokio::join!(
            self.average_score(),
            self.score_development(),
            self.top_performers(),
            self.improvement_potential(),
            self.strengths_and_weaknesses(),
            self.score_changes(),
            self.word_cloud(),
            self.evaluation_trends(),
            self.current_staff_dilution(),
            self.completion_rate(),
        );

        let report = DashboardReport {
            average_score,
            score_development,
            top_performers,
            improvement_potential,
            strengths_and_weaknesses,
            score_changes,
            word_cloud,
            evaluation_trends,
            staff_dilution,
            completion_rate,
            generated_at: Utc::now().to_rfc3339(),
        };
        debug!(
            target: "app::reports",
            degraded = report.is_degraded(),
            "dashboard assembled"
        );
        report
    }
}

fn settle<T>(
    operation: &'static str,
    result: AppResult<T>,
    fallback: impl FnOnce() -> T,
) -> ReportOutcome<T> {
    match result {
        Ok(value) => {
            debug!(target: "app::reports", operation, "report computed");
            ReportOutcome::fresh(value)
        }
        Err(err) => {
            log_fallback(operation, &err);
            ReportOutcome::fallback(fallback())
        }
    }
}

fn log_fallback(operation: &'static str, err: &AppError) {
    error!(
        target: "app::reports",
        operation,
        error = %err,
        "report data unavailable, serving fallback"
    );
}
