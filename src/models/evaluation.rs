use std::collections::BTreeMap;
use std::convert::TryFrom;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::category::Category;

/// Canonical in-memory sub-scores: category to integer points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawScores")]
pub struct CategoryScores(BTreeMap<Category, i64>);

impl CategoryScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, points: i64) -> Self {
        self.0.insert(category, points);
        self
    }

    pub fn insert(&mut self, category: Category, points: i64) {
        self.0.insert(category, points);
    }

    pub fn get(&self, category: Category) -> Option<i64> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, i64)> + '_ {
        self.0.iter().map(|(category, points)| (*category, *points))
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }

    /// Returns the first category whose points fall outside `0..=max_points`.
    pub fn out_of_range(&self) -> Option<(Category, i64)> {
        self.iter()
            .find(|(category, points)| *points < 0 || *points > category.max_points())
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn from_object(map: &JsonMap<String, JsonValue>) -> Result<Self, String> {
        let mut scores = CategoryScores::new();
        for (key, value) in map {
            let Some(category) = Category::from_key(key) else {
                continue;
            };
            let points = score_value(value)
                .ok_or_else(|| format!("score for `{key}` is not an integer: {value}"))?;
            scores.insert(category, points);
        }
        Ok(scores)
    }
}

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

fn score_value(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|raw| raw.is_finite() && raw.fract() == 0.0)
                .map(|raw| raw as i64)
        }),
        JsonValue::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Scores as they arrive from storage or an imported file: either a JSON
/// encoded string or an already structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScores {
    Structured(JsonMap<String, JsonValue>),
    Encoded(String),
}

impl RawScores {
    pub fn normalize(&self) -> Result<CategoryScores, String> {
        match self {
            RawScores::Structured(map) => CategoryScores::from_object(map),
            RawScores::Encoded(text) => match serde_json::from_str::<JsonValue>(text) {
                Ok(JsonValue::Object(map)) => CategoryScores::from_object(&map),
                Ok(JsonValue::Null) => Ok(CategoryScores::new()),
                Ok(other) => Err(format!("scores must be an object, got {other}")),
                Err(err) => Err(format!("scores are not valid json: {err}")),
            },
        }
    }
}

impl TryFrom<RawScores> for CategoryScores {
    type Error = String;

    fn try_from(raw: RawScores) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub work_location: String,
    pub job_role: String,
    pub specific_task: String,
    pub scores: CategoryScores,
    pub comment: String,
    /// Stored total; aggregations trust it instead of re-summing `scores`.
    pub total_score: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCreateInput {
    pub employee_id: i64,
    #[serde(default)]
    pub work_location: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub specific_task: String,
    pub scores: CategoryScores,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// Exchange format for a single evaluation file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub work_location: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub specific_task: String,
    #[serde(default)]
    pub scores: Option<RawScores>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EvaluationDocument {
    pub fn from_evaluation(evaluation: &Evaluation) -> serde_json::Result<Self> {
        let scores = match serde_json::to_value(&evaluation.scores)? {
            JsonValue::Object(map) => map,
            _ => JsonMap::new(),
        };
        Ok(Self {
            employee_id: Some(evaluation.employee_id),
            employee_name: Some(evaluation.employee_name.clone()),
            work_location: evaluation.work_location.clone(),
            job_role: evaluation.job_role.clone(),
            specific_task: evaluation.specific_task.clone(),
            scores: Some(RawScores::Structured(scores)),
            comment: evaluation.comment.clone(),
            total_score: Some(evaluation.total_score),
            date: Some(evaluation.date.to_string()),
        })
    }

    pub fn normalized_scores(&self) -> Result<CategoryScores, String> {
        match &self.scores {
            Some(raw) => raw.normalize(),
            None => Ok(CategoryScores::new()),
        }
    }
}

/// Accepts RFC 3339 timestamps, naive ISO timestamps and plain dates.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
