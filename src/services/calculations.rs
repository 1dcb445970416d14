//! Pure aggregation over an employee/evaluation snapshot.
//!
//! Nothing here touches storage; `ReportService` pulls the data and decides
//! what to do when it cannot.

use std::collections::{BTreeMap, HashMap};

use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::category::Category;
use crate::models::employee::Employee;
use crate::models::evaluation::Evaluation;
use crate::models::report::{
    CategoryAverage, EmployeeTrend, MonthlyScore, MonthlyTrend, PerformerScore, SampleMode,
    ScorePoint, WordFrequency,
};
use crate::services::trend::sequence_slope;

pub const TOP_PERFORMER_LIMIT: usize = 5;
pub const IMPROVEMENT_LIMIT: usize = 5;
pub const SCORE_CHANGE_LIMIT: usize = 3;
pub const WORD_CLOUD_LIMIT: usize = 20;
const MIN_WORD_CHARS: usize = 4;

/// One employee together with the evaluations the store returned for them.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeEvaluations {
    pub employee: Employee,
    pub evaluations: Vec<Evaluation>,
}

impl EmployeeEvaluations {
    pub fn new(employee: Employee, evaluations: Vec<Evaluation>) -> Self {
        Self {
            employee,
            evaluations,
        }
    }
}

/// First day still inside a trailing window of `lookback_months`.
pub fn window_start(today: NaiveDate, lookback_months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(lookback_months))
        .unwrap_or(NaiveDate::MIN)
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn all_evaluations(data: &[EmployeeEvaluations]) -> impl Iterator<Item = &Evaluation> {
    data.iter().flat_map(|entry| entry.evaluations.iter())
}

pub fn average_score(data: &[EmployeeEvaluations]) -> f64 {
    let (sum, count) = all_evaluations(data).fold((0.0, 0usize), |(sum, count), evaluation| {
        (sum + evaluation.total_score as f64, count + 1)
    });
    mean(sum, count)
}

/// Monthly mean of totals since `since`, rounded to one decimal, oldest month first.
pub fn score_development(data: &[EmployeeEvaluations], since: NaiveDate) -> Vec<MonthlyScore> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for evaluation in all_evaluations(data).filter(|evaluation| evaluation.date >= since) {
        let bucket = months.entry(month_key(evaluation.date)).or_default();
        bucket.0 += evaluation.total_score as f64;
        bucket.1 += 1;
    }

    months
        .into_iter()
        .map(|(date, (sum, count))| MonthlyScore {
            date,
            average_score: round_one_decimal(mean(sum, count)),
        })
        .collect()
}

pub fn top_performers(data: &[EmployeeEvaluations]) -> Vec<PerformerScore> {
    let mut performers: Vec<PerformerScore> = data
        .iter()
        .filter(|entry| !entry.evaluations.is_empty())
        .map(|entry| {
            let sum: f64 = entry
                .evaluations
                .iter()
                .map(|evaluation| evaluation.total_score as f64)
                .sum();
            PerformerScore {
                name: entry.employee.name.clone(),
                average_score: mean(sum, entry.evaluations.len()),
            }
        })
        .collect();

    performers.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    performers.truncate(TOP_PERFORMER_LIMIT);
    performers
}

/// Mean sub-score per category in catalog order; unobserved categories average 0.
pub fn category_averages(data: &[EmployeeEvaluations]) -> Vec<CategoryAverage> {
    let mut totals: HashMap<Category, (f64, usize)> = HashMap::new();
    for evaluation in all_evaluations(data) {
        for (category, points) in evaluation.scores.iter() {
            let bucket = totals.entry(category).or_default();
            bucket.0 += points as f64;
            bucket.1 += 1;
        }
    }

    Category::ALL
        .iter()
        .map(|category| {
            let (sum, count) = totals.get(category).copied().unwrap_or_default();
            CategoryAverage {
                category: *category,
                average_score: mean(sum, count),
            }
        })
        .collect()
}

fn ascending_categories(data: &[EmployeeEvaluations]) -> Vec<CategoryAverage> {
    let mut averages = category_averages(data);
    averages.sort_by(|a, b| a.average_score.total_cmp(&b.average_score));
    averages
}

pub fn improvement_potential(data: &[EmployeeEvaluations]) -> Vec<CategoryAverage> {
    let mut ascending = ascending_categories(data);
    ascending.truncate(IMPROVEMENT_LIMIT);
    ascending
}

/// All categories, strongest first; the exact reverse of the ascending order.
pub fn strengths_and_weaknesses(data: &[EmployeeEvaluations]) -> Vec<CategoryAverage> {
    let mut ordered = ascending_categories(data);
    ordered.reverse();
    ordered
}

/// Employees with at least two evaluations since `since`, ranked by slope.
///
/// Yields the three steepest risers followed by the three steepest decliners
/// (steepest decline first). With fewer than six employees the two blocks
/// overlap and an employee can be listed in both.
pub fn score_changes(data: &[EmployeeEvaluations], since: NaiveDate) -> Vec<EmployeeTrend> {
    let mut trends: Vec<EmployeeTrend> = data
        .iter()
        .filter_map(|entry| {
            let mut recent: Vec<&Evaluation> = entry
                .evaluations
                .iter()
                .filter(|evaluation| evaluation.date >= since)
                .collect();
            if recent.len() < 2 {
                return None;
            }
            recent.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

            let totals: Vec<f64> = recent
                .iter()
                .map(|evaluation| evaluation.total_score as f64)
                .collect();
            Some(EmployeeTrend {
                name: entry.employee.name.clone(),
                changes: recent
                    .iter()
                    .map(|evaluation| ScorePoint {
                        date: evaluation.date.format("%Y-%m-%d").to_string(),
                        score: evaluation.total_score,
                    })
                    .collect(),
                trend: sequence_slope(&totals),
            })
        })
        .collect();

    trends.sort_by(|a, b| b.trend.total_cmp(&a.trend));

    let block = trends.len().min(SCORE_CHANGE_LIMIT);
    let bottom: Vec<EmployeeTrend> = trends[trends.len() - block..]
        .iter()
        .rev()
        .cloned()
        .collect();
    trends.truncate(block);
    trends.extend(bottom);
    trends
}

/// Word frequencies over all comments; ties keep first-seen order.
pub fn word_cloud(data: &[EmployeeEvaluations]) -> Vec<WordFrequency> {
    let mut words: Vec<WordFrequency> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for evaluation in all_evaluations(data) {
        let comment = evaluation.comment.to_lowercase();
        for token in comment.split_whitespace() {
            if token.chars().count() < MIN_WORD_CHARS {
                continue;
            }
            match positions.get(token) {
                Some(index) => words[*index].count += 1,
                None => {
                    positions.insert(token.to_string(), words.len());
                    words.push(WordFrequency {
                        word: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    words.sort_by(|a, b| b.count.cmp(&a.count));
    words.truncate(WORD_CLOUD_LIMIT);
    words
}

pub fn evaluation_trends(data: &[EmployeeEvaluations]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for evaluation in all_evaluations(data) {
        let bucket = months.entry(month_key(evaluation.date)).or_default();
        bucket.0 += evaluation.total_score as f64;
        bucket.1 += 1;
    }

    months
        .into_iter()
        .map(|(date, (sum, count))| MonthlyTrend {
            date,
            average_score: mean(sum, count),
            total_evaluations: count,
        })
        .collect()
}

/// Share of `employees` hired on or after `since`, in percent.
pub fn staff_dilution(employees: &[Employee], since: NaiveDate) -> f64 {
    let recent = employees
        .iter()
        .filter(|employee| matches!(employee.hire_date, Some(hired) if hired >= since))
        .count();
    percentage(recent, employees.len())
}

pub fn completion_rate(data: &[EmployeeEvaluations]) -> f64 {
    let evaluated = data
        .iter()
        .filter(|entry| !entry.evaluations.is_empty())
        .count();
    percentage(evaluated, data.len())
}

/// Picks the employees a score-development run looks at.
///
/// `Random` and `Seeded` take half of the population, rounded up.
pub fn sample_employees(employees: &[Employee], mode: SampleMode) -> Vec<Employee> {
    match mode {
        SampleMode::Full => employees.to_vec(),
        SampleMode::Random => half_sample(employees, &mut rand::thread_rng()),
        SampleMode::Seeded(seed) => half_sample(employees, &mut StdRng::seed_from_u64(seed)),
    }
}

fn half_sample<R: Rng + ?Sized>(employees: &[Employee], rng: &mut R) -> Vec<Employee> {
    let size = (employees.len() + 1) / 2;
    let mut pool = employees.to_vec();
    pool.shuffle(rng);
    pool.truncate(size);
    pool
}
