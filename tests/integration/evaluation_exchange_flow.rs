use chrono::Utc;
use evalboard_lib::commands::{employees, AppState};
use evalboard_lib::db::DbPool;
use evalboard_lib::models::category::Category;
use evalboard_lib::models::employee::{EmployeeCreateInput, ACTIVITY_EVALUATION_IMPORTED};
use evalboard_lib::models::evaluation::{CategoryScores, EvaluationCreateInput};
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, AppState) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("exchange.sqlite")).expect("db pool");
    let state = AppState::new(pool).expect("app state");
    (dir, state)
}

async fn hire(state: &AppState, name: &str) -> i64 {
    employees::employees_create(
        state,
        EmployeeCreateInput {
            name: name.to_string(),
            job_role: "Carpenter".to_string(),
            division: "Workshop".to_string(),
            hire_date: "2021-09-01".to_string(),
        },
    )
    .await
    .expect("create employee")
    .id
}

#[tokio::test]
async fn exported_evaluation_imports_for_another_employee() {
    let (dir, state) = setup();
    let source = hire(&state, "Mara").await;
    let target = hire(&state, "Nils").await;

    let scores = CategoryScores::new()
        .with(Category::Competence, 9)
        .with(Category::Teamwork, 14)
        .with(Category::Compliance, 12)
        .with(Category::Documentation, 6);
    let recorded = employees::evaluations_record(
        &state,
        EvaluationCreateInput {
            employee_id: source,
            work_location: "Hall B".to_string(),
            job_role: "Carpenter".to_string(),
            specific_task: "Roof trusses".to_string(),
            scores: scores.clone(),
            comment: "Clean joints, tidy site".to_string(),
            date: Some("2025-04-02".to_string()),
        },
    )
    .await
    .expect("record evaluation");
    assert_eq!(recorded.total_score, 41);

    let file = dir.path().join("handover").join("evaluation.json");
    let document = employees::evaluations_export(&state, recorded.id, file.clone())
        .await
        .expect("export evaluation");
    assert_eq!(document.employee_id, Some(source));
    assert!(file.exists());

    let imported = employees::evaluations_import(&state, target, file)
        .await
        .expect("import evaluation");
    assert_ne!(imported.id, recorded.id);
    assert_eq!(imported.employee_id, target);
    assert_eq!(imported.employee_name, "Nils");
    assert_eq!(imported.scores, scores);
    assert_eq!(imported.total_score, 41);
    assert_eq!(imported.comment, "Clean joints, tidy site");
    assert_eq!(imported.specific_task, "Roof trusses");
    assert_eq!(imported.date, recorded.date);

    let listed = employees::evaluations_list(&state, target)
        .await
        .expect("list evaluations");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], imported);

    let latest = state
        .employees()
        .latest_activities(1)
        .expect("latest activity");
    assert_eq!(latest[0].kind, ACTIVITY_EVALUATION_IMPORTED);
    assert_eq!(latest[0].employee_name, "Nils");
}

#[tokio::test]
async fn legacy_document_without_total_or_date_is_completed_on_import() {
    let (dir, state) = setup();
    let employee_id = hire(&state, "Olga").await;

    let file = dir.path().join("legacy.json");
    std::fs::write(
        &file,
        r#"{
            "workLocation": "Yard",
            "scores": "{\"fachlicheKompetenz\": 7, \"zusammenarbeit\": \"13\", \"vorschriften\": 11, \"punctuality\": 3}",
            "comment": "steady"
        }"#,
    )
    .expect("write legacy file");

    let imported = employees::evaluations_import(&state, employee_id, file)
        .await
        .expect("import legacy");
    assert_eq!(imported.scores.iter().count(), 3);
    assert_eq!(imported.scores.get(Category::Competence), Some(7));
    assert_eq!(imported.scores.get(Category::Teamwork), Some(13));
    assert_eq!(imported.scores.get(Category::Compliance), Some(11));
    assert_eq!(imported.total_score, 31);
    assert_eq!(imported.date, Utc::now().date_naive());
    assert_eq!(imported.work_location, "Yard");
}

#[tokio::test]
async fn stored_total_is_kept_when_it_disagrees_with_sub_scores() {
    let (dir, state) = setup();
    let employee_id = hire(&state, "Piet").await;

    let file = dir.path().join("mismatch.json");
    std::fs::write(
        &file,
        r#"{"scores": {"competence": 5, "teamwork": 5}, "totalScore": 12, "date": "2025-02-03T08:00:00.000Z"}"#,
    )
    .expect("write file");

    let imported = employees::evaluations_import(&state, employee_id, file)
        .await
        .expect("import");
    assert_eq!(imported.total_score, 12);
    assert_eq!(imported.date.to_string(), "2025-02-03");
}

#[tokio::test]
async fn over_maximum_scores_are_rejected_on_import() {
    let (dir, state) = setup();
    let employee_id = hire(&state, "Rosa").await;

    let file = dir.path().join("too_high.json");
    std::fs::write(&file, r#"{"scores": {"documentation": 12}}"#).expect("write file");

    let err = employees::evaluations_import(&state, employee_id, file)
        .await
        .expect_err("over-max score");
    assert_eq!(err.code, "VALIDATION_ERROR");

    let listed = employees::evaluations_list(&state, employee_id)
        .await
        .expect("list");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn unreadable_files_and_unknown_employees_are_reported() {
    let (dir, state) = setup();
    let employee_id = hire(&state, "Sven").await;

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json at all").expect("write file");
    let err = employees::evaluations_import(&state, employee_id, garbage)
        .await
        .expect_err("garbage file");
    assert_eq!(err.code, "VALIDATION_ERROR");

    let bad_scores = dir.path().join("bad_scores.json");
    std::fs::write(&bad_scores, r#"{"scores": {"teamwork": "plenty"}}"#).expect("write file");
    let err = employees::evaluations_import(&state, employee_id, bad_scores)
        .await
        .expect_err("non-numeric score");
    assert_eq!(err.code, "VALIDATION_ERROR");

    let valid = dir.path().join("valid.json");
    std::fs::write(&valid, r#"{"scores": {"teamwork": 10}}"#).expect("write file");
    let err = employees::evaluations_import(&state, 9_999, valid)
        .await
        .expect_err("unknown employee");
    assert_eq!(err.code, "NOT_FOUND");

    let err = employees::evaluations_export(&state, 4_242, dir.path().join("none.json"))
        .await
        .expect_err("unknown evaluation");
    assert_eq!(err.code, "NOT_FOUND");
}
