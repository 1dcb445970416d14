use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub job_role: String,
    pub division: String,
    /// `None` when the stored value could not be parsed.
    pub hire_date: Option<NaiveDate>,
}

/// Employee listing row with the number of stored evaluations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    #[serde(flatten)]
    pub employee: Employee,
    pub evaluation_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreateInput {
    pub name: String,
    pub job_role: String,
    pub division: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub employee_name: String,
    pub timestamp: String,
}

pub const ACTIVITY_EMPLOYEE_ADDED: &str = "employee_added";
pub const ACTIVITY_EMPLOYEE_REMOVED: &str = "employee_removed";
pub const ACTIVITY_EVALUATION_ADDED: &str = "evaluation_added";
pub const ACTIVITY_EVALUATION_IMPORTED: &str = "evaluation_imported";
