use chrono::{Months, NaiveDate, Utc};
use evalboard_lib::commands::{database, employees, reports, AppState};
use evalboard_lib::db::DbPool;
use evalboard_lib::models::category::Category;
use evalboard_lib::models::employee::{EmployeeCreateInput, ACTIVITY_EVALUATION_ADDED};
use evalboard_lib::models::evaluation::{CategoryScores, EvaluationCreateInput};
use evalboard_lib::models::report::ReportExportFormat;
use evalboard_lib::models::settings::{ReportSettings, ReportSettingsUpdate};
use evalboard_lib::services::employee_service::EmployeeService;
use evalboard_lib::services::evaluation_store::SqliteEvaluationStore;
use evalboard_lib::services::export_service::ExportService;
use evalboard_lib::services::report_service::ReportService;
use tempfile::tempdir;

/// Spreads `total` over the catalog, filling each category to its maximum in turn.
fn scores_totalling(total: i64) -> CategoryScores {
    let mut remaining = total;
    let mut scores = CategoryScores::new();
    for category in Category::ALL {
        let points = remaining.min(category.max_points());
        scores.insert(category, points);
        remaining -= points;
    }
    scores
}

fn employee(name: &str, hire_date: &str) -> EmployeeCreateInput {
    EmployeeCreateInput {
        name: name.to_string(),
        job_role: "Electrician".to_string(),
        division: "Maintenance".to_string(),
        hire_date: hire_date.to_string(),
    }
}

fn evaluation(employee_id: i64, total: i64, date: &str, comment: &str) -> EvaluationCreateInput {
    EvaluationCreateInput {
        employee_id,
        work_location: "Plant 2".to_string(),
        job_role: "Electrician".to_string(),
        specific_task: "Switchgear inspection".to_string(),
        scores: scores_totalling(total),
        comment: comment.to_string(),
        date: Some(date.to_string()),
    }
}

#[tokio::test]
async fn sqlite_backed_reports_follow_recorded_evaluations() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("reports.sqlite")).expect("db pool");
    let service = EmployeeService::new(pool.clone());

    let anna = service
        .create_employee(employee("Anna", "2025-01-01"))
        .expect("create anna");
    let ben = service
        .create_employee(employee("Ben", "2019-03-01"))
        .expect("create ben");
    service
        .create_employee(employee("Cleo", "2024-08-01"))
        .expect("create cleo");
    service
        .create_employee(employee("Dirk", "2016-11-20"))
        .expect("create dirk");

    for (total, date) in [(60, "2025-01-10"), (70, "2025-03-10"), (80, "2025-05-10")] {
        service
            .record_evaluation(evaluation(anna.id, total, date, "careful and reliable"))
            .expect("record anna");
    }
    for (total, date) in [(90, "2025-02-10"), (70, "2025-04-10")] {
        service
            .record_evaluation(evaluation(ben.id, total, date, "reliable under pressure"))
            .expect("record ben");
    }

    pool.with_connection(|conn| {
        conn.execute(
            "INSERT INTO evaluations (employee_id, employee_name, work_location, job_role, specific_task, scores, comment, total_score, date)
             VALUES (?1, 'Anna', 'Plant 2', 'Electrician', '', '{broken', NULL, 10, '2025-05-20')",
            [anna.id],
        )?;
        Ok(())
    })
    .expect("insert malformed row");

    let reports = ReportService::new(SqliteEvaluationStore::new(pool.clone()), ReportSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2025, 6, 15).expect("date"));
    let dashboard = reports.dashboard().await;

    assert!(!dashboard.is_degraded());
    assert_eq!(dashboard.average_score.value, 74.0);
    assert_eq!(dashboard.completion_rate.value, 50.0);
    assert_eq!(dashboard.staff_dilution.value, 50.0);

    let top: Vec<&str> = dashboard
        .top_performers
        .value
        .iter()
        .map(|performer| performer.name.as_str())
        .collect();
    assert_eq!(top, vec!["Ben", "Anna"]);

    let changes: Vec<(&str, f64)> = dashboard
        .score_changes
        .value
        .iter()
        .map(|entry| (entry.name.as_str(), entry.trend))
        .collect();
    assert_eq!(
        changes,
        vec![("Anna", 10.0), ("Ben", -20.0), ("Ben", -20.0), ("Anna", 10.0)]
    );

    let development = &dashboard.score_development.value;
    assert!(!development.is_placeholder);
    let months: Vec<&str> = development
        .points
        .iter()
        .map(|point| point.date.as_str())
        .collect();
    assert_eq!(
        months,
        vec!["2025-01", "2025-02", "2025-03", "2025-04", "2025-05"]
    );
    assert_eq!(development.points[0].average_score, 60.0);

    assert_eq!(dashboard.evaluation_trends.value.len(), 5);
    assert!(dashboard
        .evaluation_trends
        .value
        .iter()
        .all(|month| month.total_evaluations == 1));

    let reliable = dashboard
        .word_cloud
        .value
        .iter()
        .find(|entry| entry.word == "reliable")
        .expect("reliable counted");
    assert_eq!(reliable.count, 5);
    assert_eq!(dashboard.word_cloud.value[0].word, "reliable");
}

#[tokio::test]
async fn dashboard_command_reports_totals_and_latest_activity() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("dashboard.sqlite")).expect("db pool");
    let exports = ExportService::new(dir.path().join("out")).expect("export service");
    let state = AppState::with_export_service(pool, exports).expect("app state");

    let today = Utc::now().date_naive();
    let last_month = today
        .checked_sub_months(Months::new(1))
        .expect("last month")
        .format("%Y-%m-%d")
        .to_string();
    let this_month = today.format("%Y-%m-%d").to_string();

    let ida = employees::employees_create(&state, employee("Ida", "2012-05-01"))
        .await
        .expect("create ida");
    let jon = employees::employees_create(&state, employee("Jon", "2013-05-01"))
        .await
        .expect("create jon");
    employees::evaluations_record(&state, evaluation(ida.id, 82, &last_month, "precise"))
        .await
        .expect("record ida");
    employees::evaluations_record(&state, evaluation(jon.id, 64, &this_month, "punctual"))
        .await
        .expect("record jon");

    assert_eq!(state.db().path(), dir.path().join("dashboard.sqlite"));

    let overview = reports::reports_dashboard(&state)
        .await
        .expect("dashboard");
    assert_eq!(overview.total_employees, 2);
    assert_eq!(overview.recent_activities.len(), 2);
    assert_eq!(overview.recent_activities[0].employee_name, "Jon");
    assert_eq!(overview.recent_activities[0].kind, ACTIVITY_EVALUATION_ADDED);
    assert!(!overview.report.is_degraded());
    assert_eq!(overview.report.average_score.value, 73.0);
    assert_eq!(overview.report.completion_rate.value, 100.0);
    assert_eq!(overview.report.staff_dilution.value, 0.0);

    let fetched = reports::reports_fetch(&state, reports::ReportKind::CompletionRate)
        .await
        .expect("fetch completion");
    assert_eq!(fetched["value"], 100.0);
    assert_eq!(fetched["degraded"], false);
}

#[tokio::test]
async fn exported_reports_land_in_the_reports_directory() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("export.sqlite")).expect("db pool");
    let out = dir.path().join("bundles");
    let exports = ExportService::new(&out).expect("export service");
    let state = AppState::with_export_service(pool, exports).expect("app state");

    let markdown = reports::reports_export(&state, Some(ReportExportFormat::Markdown))
        .await
        .expect("markdown export");
    let path = std::path::PathBuf::from(&markdown.file_path);
    assert!(path.starts_with(&out));
    assert_eq!(state.exports().reports_dir(), out.as_path());
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("md"));
    let content = std::fs::read_to_string(&path).expect("read markdown");
    assert!(content.starts_with("# Employee Evaluation Report"));
    assert!(!markdown.is_degraded);

    let json = reports::reports_export(&state, None)
        .await
        .expect("json export");
    assert_eq!(json.format, ReportExportFormat::Json);
    let raw = std::fs::read_to_string(&json.file_path).expect("read json");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(parsed["completionRate"]["value"], 0.0);
    assert_eq!(parsed["scoreDevelopment"]["value"]["isPlaceholder"], true);
}

#[tokio::test]
async fn settings_update_applies_to_the_next_report() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("settings.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");

    let old = Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(6))
        .expect("six months ago")
        .format("%Y-%m-%d")
        .to_string();
    let kim = employees::employees_create(&state, employee("Kim", "2010-01-01"))
        .await
        .expect("create kim");
    employees::evaluations_record(&state, evaluation(kim.id, 77, &old, ""))
        .await
        .expect("record kim");

    assert!(!state.reports().score_development().await.value.is_placeholder);

    let updated = reports::settings_update(
        &state,
        ReportSettingsUpdate {
            lookback_months: Some(1),
            ..ReportSettingsUpdate::default()
        },
    )
    .await
    .expect("update settings");
    assert_eq!(updated.lookback_months, 1);
    assert_eq!(state.reports().settings().lookback_months, 1);

    let development = state.reports().score_development().await;
    assert!(development.value.is_placeholder);
    assert!(!development.degraded);

    let persisted = reports::settings_get(&state).await.expect("settings");
    assert_eq!(persisted, updated);
}

#[tokio::test]
async fn employee_listing_and_migration_history_are_exposed() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("listing.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");

    let lars = employees::employees_create(&state, employee("Lars", "2015-02-01"))
        .await
        .expect("create lars");
    employees::employees_create(&state, employee("Mia", "2016-02-01"))
        .await
        .expect("create mia");
    employees::evaluations_record(&state, evaluation(lars.id, 55, "2025-03-01", ""))
        .await
        .expect("record lars");

    let listed = employees::employees_list(&state).await.expect("list");
    let counts: Vec<(&str, i64)> = listed
        .iter()
        .map(|summary| (summary.employee.name.as_str(), summary.evaluation_count))
        .collect();
    assert_eq!(counts, vec![("Lars", 1), ("Mia", 0)]);

    let json = serde_json::to_value(&listed[0]).expect("serialize summary");
    assert_eq!(json["name"], "Lars");
    assert_eq!(json["evaluationCount"], 1);

    let history = database::database_migrations(&state)
        .await
        .expect("migration history");
    let versions: Vec<i32> = history.iter().map(|entry| entry.version).collect();
    assert_eq!(versions, vec![1, 2]);
}
