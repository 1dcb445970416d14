use std::path::PathBuf;

use crate::models::employee::{Employee, EmployeeCreateInput, EmployeeSummary};
use crate::models::evaluation::{Evaluation, EvaluationCreateInput, EvaluationDocument};

use super::{run_blocking, AppState, CommandResult};

pub async fn employees_create(
    state: &AppState,
    input: EmployeeCreateInput,
) -> CommandResult<Employee> {
    let app_state = state.clone();
    run_blocking(move || app_state.employees().create_employee(input)).await
}

pub async fn employees_list(state: &AppState) -> CommandResult<Vec<EmployeeSummary>> {
    let app_state = state.clone();
    run_blocking(move || app_state.employees().list_employee_summaries()).await
}

pub async fn employees_delete(state: &AppState, id: i64) -> CommandResult<()> {
    let app_state = state.clone();
    run_blocking(move || app_state.employees().delete_employee(id)).await
}

pub async fn evaluations_record(
    state: &AppState,
    input: EvaluationCreateInput,
) -> CommandResult<Evaluation> {
    let app_state = state.clone();
    run_blocking(move || app_state.employees().record_evaluation(input)).await
}

pub async fn evaluations_list(state: &AppState, employee_id: i64) -> CommandResult<Vec<Evaluation>> {
    let app_state = state.clone();
    run_blocking(move || app_state.employees().list_evaluations(employee_id)).await
}

/// Reads an evaluation file and stores it for `employee_id`.
pub async fn evaluations_import(
    state: &AppState,
    employee_id: i64,
    path: PathBuf,
) -> CommandResult<Evaluation> {
    let app_state = state.clone();
    run_blocking(move || {
        let document = app_state.exports().read_evaluation_document(&path)?;
        app_state.employees().import_evaluation(employee_id, document)
    })
    .await
}

pub async fn evaluations_export(
    state: &AppState,
    evaluation_id: i64,
    path: PathBuf,
) -> CommandResult<EvaluationDocument> {
    let app_state = state.clone();
    run_blocking(move || {
        let document = app_state.employees().export_evaluation(evaluation_id)?;
        app_state.exports().write_evaluation_document(&path, &document)?;
        Ok(document)
    })
    .await
}
