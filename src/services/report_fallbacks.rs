//! Static values served when report data cannot be read.

use crate::models::category::Category;
use crate::models::report::{
    CategoryAverage, EmployeeTrend, MonthlyScore, MonthlyTrend, PerformerScore, WordFrequency,
};

pub const AVERAGE_SCORE: f64 = 75.0;
pub const STAFF_DILUTION: f64 = 0.0;
pub const COMPLETION_RATE: f64 = 0.0;

/// Sample category averages, strongest first.
const CATEGORY_SAMPLE: [(Category, f64); 9] = [
    (Category::Competence, 85.0),
    (Category::Reliability, 82.0),
    (Category::Teamwork, 80.0),
    (Category::Compliance, 79.0),
    (Category::ExecutionQuality, 78.0),
    (Category::Autonomy, 75.0),
    (Category::ConflictManagement, 72.0),
    (Category::Communication, 70.0),
    (Category::Documentation, 65.0),
];

pub fn placeholder_development() -> Vec<MonthlyScore> {
    [("2024-01", 70.0), ("2024-02", 75.0), ("2024-03", 80.0)]
        .into_iter()
        .map(|(date, average_score)| MonthlyScore {
            date: date.to_string(),
            average_score,
        })
        .collect()
}

pub fn top_performers() -> Vec<PerformerScore> {
    vec![
        PerformerScore {
            name: "Sample Employee 1".to_string(),
            average_score: 90.0,
        },
        PerformerScore {
            name: "Sample Employee 2".to_string(),
            average_score: 85.0,
        },
    ]
}

pub fn improvement_potential() -> Vec<CategoryAverage> {
    let mut ascending = strengths_and_weaknesses();
    ascending.reverse();
    ascending.truncate(5);
    ascending
}

pub fn strengths_and_weaknesses() -> Vec<CategoryAverage> {
    CATEGORY_SAMPLE
        .iter()
        .map(|(category, average_score)| CategoryAverage {
            category: *category,
            average_score: *average_score,
        })
        .collect()
}

pub fn score_changes() -> Vec<EmployeeTrend> {
    Vec::new()
}

pub fn word_cloud() -> Vec<WordFrequency> {
    vec![
        WordFrequency {
            word: "reliable".to_string(),
            count: 15,
        },
        WordFrequency {
            word: "competent".to_string(),
            count: 12,
        },
    ]
}

pub fn evaluation_trends() -> Vec<MonthlyTrend> {
    Vec::new()
}
