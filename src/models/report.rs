use serde::{Deserialize, Serialize};

use super::category::Category;

/// Value of one aggregate plus whether it is a static fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> ReportOutcome<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyScore {
    /// `YYYY-MM`
    pub date: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "seed")]
pub enum SampleMode {
    Full,
    Random,
    Seeded(u64),
}

impl Default for SampleMode {
    fn default() -> Self {
        SampleMode::Full
    }
}

impl SampleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleMode::Full => "full",
            SampleMode::Random => "random",
            SampleMode::Seeded(_) => "seeded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleInfo {
    pub mode: SampleMode,
    pub sampled_employees: usize,
    pub total_employees: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDevelopment {
    pub points: Vec<MonthlyScore>,
    pub sample: SampleInfo,
    /// Set when the sample had no evaluations and `points` is the stock series.
    pub is_placeholder: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformerScore {
    pub name: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    pub category: Category,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub date: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTrend {
    pub name: String,
    pub changes: Vec<ScorePoint>,
    pub trend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub date: String,
    pub average_score: f64,
    pub total_evaluations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub average_score: ReportOutcome<f64>,
    pub score_development: ReportOutcome<ScoreDevelopment>,
    pub top_performers: ReportOutcome<Vec<PerformerScore>>,
    pub improvement_potential: ReportOutcome<Vec<CategoryAverage>>,
    pub strengths_and_weaknesses: ReportOutcome<Vec<CategoryAverage>>,
    pub score_changes: ReportOutcome<Vec<EmployeeTrend>>,
    pub word_cloud: ReportOutcome<Vec<WordFrequency>>,
    pub evaluation_trends: ReportOutcome<Vec<MonthlyTrend>>,
    pub staff_dilution: ReportOutcome<f64>,
    pub completion_rate: ReportOutcome<f64>,
    pub generated_at: String,
}

impl DashboardReport {
    pub fn is_degraded(&self) -> bool {
        self.average_score.degraded
            || self.score_development.degraded
            || self.top_performers.degraded
            || self.improvement_potential.degraded
            || self.strengths_and_weaknesses.degraded
            || self.score_changes.degraded
            || self.word_cloud.degraded
            || self.evaluation_trends.degraded
            || self.staff_dilution.degraded
            || self.completion_rate.degraded
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportExportFormat {
    Markdown,
    Json,
}

impl ReportExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportExportFormat::Markdown => "md",
            ReportExportFormat::Json => "json",
        }
    }
}

impl Default for ReportExportFormat {
    fn default() -> Self {
        ReportExportFormat::Json
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExportResult {
    pub file_path: String,
    pub format: ReportExportFormat,
    pub generated_at: String,
    pub is_degraded: bool,
}
