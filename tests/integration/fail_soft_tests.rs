use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use evalboard_lib::error::{AppError, AppResult};
use evalboard_lib::models::category::Category;
use evalboard_lib::models::employee::Employee;
use evalboard_lib::models::evaluation::Evaluation;
use evalboard_lib::models::settings::ReportSettings;
use evalboard_lib::services::evaluation_store::EvaluationStore;
use evalboard_lib::services::report_fallbacks;
use evalboard_lib::services::report_service::ReportService;

struct FailingStore;

#[async_trait]
impl EvaluationStore for FailingStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Err(AppError::database("store offline"))
    }

    async fn list_evaluations_for_employee(&self, _employee_id: i64) -> AppResult<Vec<Evaluation>> {
        Err(AppError::database("store offline"))
    }
}

/// Lists employees fine but cannot read any evaluation.
struct BrokenEvaluationsStore;

#[async_trait]
impl EvaluationStore for BrokenEvaluationsStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(vec![Employee {
            id: 7,
            name: "Lena".to_string(),
            job_role: "Planner".to_string(),
            division: "Logistics".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        }])
    }

    async fn list_evaluations_for_employee(&self, employee_id: i64) -> AppResult<Vec<Evaluation>> {
        Err(AppError::malformed(
            format!("evaluations of {employee_id}"),
            "unreadable",
        ))
    }
}

struct SlowStore;

#[async_trait]
impl EvaluationStore for SlowStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn list_evaluations_for_employee(&self, _employee_id: i64) -> AppResult<Vec<Evaluation>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
}

struct EmptyStore;

#[async_trait]
impl EvaluationStore for EmptyStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(Vec::new())
    }

    async fn list_evaluations_for_employee(&self, _employee_id: i64) -> AppResult<Vec<Evaluation>> {
        Ok(Vec::new())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("date")
}

#[tokio::test]
async fn failing_store_serves_every_fallback() {
    let reports = ReportService::new(FailingStore, ReportSettings::default()).with_today(today());

    let average = reports.average_score().await;
    assert!(average.degraded);
    assert_eq!(average.value, report_fallbacks::AVERAGE_SCORE);

    let development = reports.score_development().await;
    assert!(development.degraded);
    assert!(development.value.is_placeholder);
    assert_eq!(
        development.value.points,
        report_fallbacks::placeholder_development()
    );

    let top = reports.top_performers().await;
    assert!(top.degraded);
    assert_eq!(top.value, report_fallbacks::top_performers());

    let weakest = reports.improvement_potential().await;
    assert!(weakest.degraded);
    assert_eq!(weakest.value.len(), 5);
    assert_eq!(weakest.value[0].category, Category::Documentation);

    let strengths = reports.strengths_and_weaknesses().await;
    assert!(strengths.degraded);
    assert_eq!(strengths.value.len(), 9);
    assert_eq!(strengths.value[0].category, Category::Competence);

    let changes = reports.score_changes().await;
    assert!(changes.degraded);
    assert!(changes.value.is_empty());

    let cloud = reports.word_cloud().await;
    assert!(cloud.degraded);
    assert_eq!(cloud.value, report_fallbacks::word_cloud());

    let trends = reports.evaluation_trends().await;
    assert!(trends.degraded);
    assert!(trends.value.is_empty());

    let completion = reports.completion_rate().await;
    assert!(completion.degraded);
    assert_eq!(completion.value, report_fallbacks::COMPLETION_RATE);
}

#[tokio::test]
async fn dashboard_marks_each_fallback_independently() {
    let reports =
        ReportService::new(BrokenEvaluationsStore, ReportSettings::default()).with_today(today());
    let dashboard = reports.dashboard().await;

    assert!(dashboard.is_degraded());
    assert!(dashboard.average_score.degraded);
    assert!(dashboard.score_development.degraded);
    assert!(dashboard.completion_rate.degraded);
    assert!(dashboard.word_cloud.degraded);

    assert!(!dashboard.staff_dilution.degraded);
    assert_eq!(dashboard.staff_dilution.value, 100.0);
}

#[tokio::test]
async fn dashboard_staff_dilution_falls_back_when_employees_are_unavailable() {
    let reports = ReportService::new(FailingStore, ReportSettings::default()).with_today(today());
    let dashboard = reports.dashboard().await;

    assert!(dashboard.staff_dilution.degraded);
    assert_eq!(dashboard.staff_dilution.value, report_fallbacks::STAFF_DILUTION);
    assert!(!dashboard.generated_at.is_empty());
}

#[tokio::test]
async fn staff_dilution_on_supplied_employees_never_degrades() {
    let reports = ReportService::new(FailingStore, ReportSettings::default()).with_today(today());
    let outcome = reports.staff_dilution(&[]);
    assert!(!outcome.degraded);
    assert_eq!(outcome.value, 0.0);
}

#[tokio::test]
async fn slow_store_is_cut_off_by_the_timeout() {
    let settings = ReportSettings {
        store_timeout_ms: 20,
        ..ReportSettings::default()
    };
    let reports = ReportService::new(SlowStore, settings).with_today(today());

    let started = std::time::Instant::now();
    let average = reports.average_score().await;
    assert!(average.degraded);
    assert_eq!(average.value, report_fallbacks::AVERAGE_SCORE);
    assert!(started.elapsed() < Duration::from_secs(4));

    let development = reports.score_development().await;
    assert!(development.degraded);
    assert!(development.value.is_placeholder);
}

#[tokio::test]
async fn empty_store_is_not_a_failure() {
    let reports = ReportService::new(EmptyStore, ReportSettings::default()).with_today(today());

    let average = reports.average_score().await;
    assert!(!average.degraded);
    assert_eq!(average.value, 0.0);

    let completion = reports.completion_rate().await;
    assert!(!completion.degraded);
    assert_eq!(completion.value, 0.0);

    let development = reports.score_development().await;
    assert!(!development.degraded);
    assert!(development.value.is_placeholder);

    let top = reports.top_performers().await;
    assert!(!top.degraded);
    assert!(top.value.is_empty());

    let strengths = reports.strengths_and_weaknesses().await;
    assert!(!strengths.degraded);
    assert_eq!(strengths.value.len(), 9);
    assert!(strengths.value.iter().all(|entry| entry.average_score == 0.0));
}
