use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::evaluation::EvaluationDocument;
use crate::models::report::{
    CategoryAverage, DashboardReport, ReportExportFormat, ReportExportResult, ReportOutcome,
};

const REPORT_PREFIX: &str = "evaluation-report";

/// Writes report bundles and moves single evaluations in and out of JSON files.
pub struct ExportService {
    reports_dir: PathBuf,
}

impl ExportService {
    pub fn new(reports_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let reports_dir = reports_dir.into();
        fs::create_dir_all(&reports_dir)?;
        Ok(Self { reports_dir })
    }

    /// Places reports in a `reports` directory next to the database file.
    pub fn beside_database(db_path: &Path) -> AppResult<Self> {
        Self::new(default_reports_dir(db_path))
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn export_report(
        &self,
        report: &DashboardReport,
        format: ReportExportFormat,
    ) -> AppResult<ReportExportResult> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let filename = format!("{REPORT_PREFIX}-{}.{}", timestamp, format.file_extension());
        let path = self.reports_dir.join(filename);

        match format {
            ReportExportFormat::Markdown => fs::write(&path, render_markdown_report(report))?,
            ReportExportFormat::Json => fs::write(&path, serde_json::to_string_pretty(report)?)?,
        }
        info!(
            target: "app::export",
            path = %path.display(),
            format = format.file_extension(),
            degraded = report.is_degraded(),
            "report exported"
        );

        Ok(ReportExportResult {
            file_path: path.to_string_lossy().to_string(),
            format,
            generated_at: report.generated_at.clone(),
            is_degraded: report.is_degraded(),
        })
    }

    pub fn write_evaluation_document(
        &self,
        path: &Path,
        document: &EvaluationDocument,
    ) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(document)?)?;
        debug!(target: "app::export", path = %path.display(), "evaluation document written");
        Ok(())
    }

    pub fn read_evaluation_document(&self, path: &Path) -> AppResult<EvaluationDocument> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| {
            AppError::validation(format!(
                "{} is not an evaluation document: {err}",
                path.display()
            ))
        })
    }
}

fn default_reports_dir(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join("reports"))
        .unwrap_or_else(|| PathBuf::from("reports"))
}

fn marker<T>(outcome: &ReportOutcome<T>) -> &'static str {
    if outcome.degraded {
        " (sample data)"
    } else {
        ""
    }
}

fn push_categories(content: &mut String, entries: &[CategoryAverage]) {
    for entry in entries {
        content.push_str(&format!(
            "- {}: {:.1}\n",
            entry.category.label(),
            entry.average_score
        ));
    }
}

fn render_markdown_report(report: &DashboardReport) -> String {
    let mut content = String::new();
    content.push_str("# Employee Evaluation Report\n\n");
    content.push_str(&format!("Generated: {}\n\n", report.generated_at));

    content.push_str("## Overview\n");
    content.push_str(&format!(
        "- Average score: {:.1}{}\n- Completion rate: {:.1}%{}\n- Staff dilution: {:.1}%{}\n\n",
        report.average_score.value,
        marker(&report.average_score),
        report.completion_rate.value,
        marker(&report.completion_rate),
        report.staff_dilution.value,
        marker(&report.staff_dilution),
    ));

    let development = &report.score_development;
    content.push_str(&format!("## Score development{}\n", marker(development)));
    content.push_str(&format!(
        "Sample: {} of {} employees ({})\n\n",
        development.value.sample.sampled_employees,
        development.value.sample.total_employees,
        development.value.sample.mode.as_str()
    ));
    for point in &development.value.points {
        content.push_str(&format!("- {}: {:.1}\n", point.date, point.average_score));
    }
    content.push('\n');

    content.push_str(&format!(
        "## Top performers{}\n",
        marker(&report.top_performers)
    ));
    for (rank, performer) in report.top_performers.value.iter().enumerate() {
        content.push_str(&format!(
            "{}. {} ({:.1})\n",
            rank + 1,
            performer.name,
            performer.average_score
        ));
    }
    content.push('\n');

    content.push_str(&format!(
        "## Strengths and weaknesses{}\n",
        marker(&report.strengths_and_weaknesses)
    ));
    push_categories(&mut content, &report.strengths_and_weaknesses.value);
    content.push('\n');

    content.push_str(&format!(
        "## Improvement potential{}\n",
        marker(&report.improvement_potential)
    ));
    push_categories(&mut content, &report.improvement_potential.value);
    content.push('\n');

    content.push_str(&format!(
        "## Score changes{}\n",
        marker(&report.score_changes)
    ));
    for trend in &report.score_changes.value {
        content.push_str(&format!(
            "- {}: {:+.2} per evaluation over {} evaluations\n",
            trend.name,
            trend.trend,
            trend.changes.len()
        ));
    }
    content.push('\n');

    content.push_str(&format!(
        "## Monthly evaluations{}\n",
        marker(&report.evaluation_trends)
    ));
    for month in &report.evaluation_trends.value {
        content.push_str(&format!(
            "- {}: {} evaluations, average {:.1}\n",
            month.date, month.total_evaluations, month.average_score
        ));
    }
    content.push('\n');

    content.push_str(&format!("## Frequent words{}\n", marker(&report.word_cloud)));
    let words: Vec<String> = report
        .word_cloud
        .value
        .iter()
        .map(|entry| format!("{} ({})", entry.word, entry.count))
        .collect();
    content.push_str(&words.join(", "));
    content.push('\n');

    content
}
