use std::fmt;

use serde::{Deserialize, Serialize};

/// The nine fixed evaluation dimensions. Maxima add up to 100 points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Competence,
    Reliability,
    ExecutionQuality,
    Documentation,
    Teamwork,
    Communication,
    ConflictManagement,
    Autonomy,
    Compliance,
}

impl Category {
    /// Catalog order. Aggregations that need a stable tie order use this.
    pub const ALL: [Category; 9] = [
        Category::Competence,
        Category::Reliability,
        Category::ExecutionQuality,
        Category::Documentation,
        Category::Teamwork,
        Category::Communication,
        Category::ConflictManagement,
        Category::Autonomy,
        Category::Compliance,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Competence => "competence",
            Category::Reliability => "reliability",
            Category::ExecutionQuality => "executionQuality",
            Category::Documentation => "documentation",
            Category::Teamwork => "teamwork",
            Category::Communication => "communication",
            Category::ConflictManagement => "conflictManagement",
            Category::Autonomy => "autonomy",
            Category::Compliance => "compliance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Competence => "Professional competence",
            Category::Reliability => "Reliability",
            Category::ExecutionQuality => "Quality of execution",
            Category::Documentation => "Documentation and reporting",
            Category::Teamwork => "Teamwork",
            Category::Communication => "Communication skills",
            Category::ConflictManagement => "Conflict management",
            Category::Autonomy => "Autonomy and problem solving",
            Category::Compliance => "Compliance with rules and policies",
        }
    }

    pub fn max_points(self) -> i64 {
        match self {
            Category::Teamwork | Category::Compliance => 15,
            _ => 10,
        }
    }

    /// Resolves a stored score key, including the keys older releases wrote.
    pub fn from_key(key: &str) -> Option<Category> {
        let category = match key {
            "competence" | "fachlicheKompetenz" => Category::Competence,
            "reliability" | "zuverlaessigkeit" => Category::Reliability,
            "executionQuality" | "qualitaetAusfuehrung" => Category::ExecutionQuality,
            "documentation" | "dokumentation" => Category::Documentation,
            "teamwork" | "zusammenarbeit" => Category::Teamwork,
            "communication" | "kommunikation" => Category::Communication,
            "conflictManagement" | "konfliktmanagement" => Category::ConflictManagement,
            "autonomy" | "selbststaendigkeit" => Category::Autonomy,
            "compliance" | "vorschriften" => Category::Compliance,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
