//! Command-line front end for the evaluation store and reports.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::error;

use evalboard_lib::commands::reports::ReportKind;
use evalboard_lib::commands::{database, employees, reports, AppState, CommandError};
use evalboard_lib::db::DbPool;
use evalboard_lib::models::employee::EmployeeCreateInput;
use evalboard_lib::models::evaluation::{EvaluationCreateInput, RawScores};
use evalboard_lib::models::report::{ReportExportFormat, SampleMode};
use evalboard_lib::models::settings::ReportSettingsUpdate;
use evalboard_lib::utils::logger::init_logging;

#[derive(Parser)]
#[command(name = "evalboard")]
#[command(about = "Record employee evaluations and compute reports", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "EVALBOARD_DB", default_value = "evalboard.sqlite")]
    db: PathBuf,

    /// Directory for the rolling log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an employee
    AddEmployee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        job_role: String,
        #[arg(long)]
        division: String,
        /// Hire date, YYYY-MM-DD
        #[arg(long)]
        hire_date: String,
    },
    /// List all employees
    ListEmployees,
    /// Record an evaluation; scores are a JSON object keyed by category
    RecordEvaluation {
        #[arg(long)]
        employee_id: i64,
        #[arg(long)]
        scores: String,
        #[arg(long, default_value = "")]
        work_location: String,
        #[arg(long, default_value = "")]
        job_role: String,
        #[arg(long, default_value = "")]
        specific_task: String,
        #[arg(long, default_value = "")]
        comment: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Import an evaluation file for an employee
    ImportEvaluation {
        #[arg(long)]
        employee_id: i64,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write one evaluation to a JSON file
    ExportEvaluation {
        #[arg(long)]
        evaluation_id: i64,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print a single report
    Report {
        #[arg(value_enum)]
        kind: ReportArg,
    },
    /// Print every report together with the latest activity
    Dashboard,
    /// Write the full report bundle to the reports directory
    ExportReport {
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
    },
    /// List the applied schema migrations
    Migrations,
    /// Show or change report settings
    Settings {
        #[arg(long, value_enum)]
        sample_mode: Option<SampleArg>,
        /// Seed for `--sample-mode seeded`
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        store_timeout_ms: Option<u64>,
        #[arg(long)]
        lookback_months: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    AverageScore,
    ScoreDevelopment,
    TopPerformers,
    ImprovementPotential,
    StrengthsAndWeaknesses,
    ScoreChanges,
    WordCloud,
    EvaluationTrends,
    StaffDilution,
    CompletionRate,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::AverageScore => ReportKind::AverageScore,
            ReportArg::ScoreDevelopment => ReportKind::ScoreDevelopment,
            ReportArg::TopPerformers => ReportKind::TopPerformers,
            ReportArg::ImprovementPotential => ReportKind::ImprovementPotential,
            ReportArg::StrengthsAndWeaknesses => ReportKind::StrengthsAndWeaknesses,
            ReportArg::ScoreChanges => ReportKind::ScoreChanges,
            ReportArg::WordCloud => ReportKind::WordCloud,
            ReportArg::EvaluationTrends => ReportKind::EvaluationTrends,
            ReportArg::StaffDilution => ReportKind::StaffDilution,
            ReportArg::CompletionRate => ReportKind::CompletionRate,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
}

impl From<FormatArg> for ReportExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ReportExportFormat::Json,
            FormatArg::Markdown => ReportExportFormat::Markdown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleArg {
    Full,
    Random,
    Seeded,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_dir) {
        eprintln!("failed to initialize logging: {err}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "app::cli", code = %err.code, message = %err.message, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let pool = DbPool::new(cli.db.clone())?;
    let state = AppState::new(pool)?;

    match cli.command {
        Commands::AddEmployee {
            name,
            job_role,
            division,
            hire_date,
        } => {
            let input = EmployeeCreateInput {
                name,
                job_role,
                division,
                hire_date,
            };
            print_json(&employees::employees_create(&state, input).await?)
        }
        Commands::ListEmployees => print_json(&employees::employees_list(&state).await?),
        Commands::RecordEvaluation {
            employee_id,
            scores,
            work_location,
            job_role,
            specific_task,
            comment,
            date,
        } => {
            let scores = RawScores::Encoded(scores).normalize().map_err(|reason| {
                CommandError::new("VALIDATION_ERROR", format!("invalid scores: {reason}"), None)
            })?;
            let input = EvaluationCreateInput {
                employee_id,
                work_location,
                job_role,
                specific_task,
                scores,
                comment,
                date,
            };
            print_json(&employees::evaluations_record(&state, input).await?)
        }
        Commands::ImportEvaluation { employee_id, file } => {
            print_json(&employees::evaluations_import(&state, employee_id, file).await?)
        }
        Commands::ExportEvaluation {
            evaluation_id,
            file,
        } => print_json(&employees::evaluations_export(&state, evaluation_id, file).await?),
        Commands::Report { kind } => {
            print_json(&reports::reports_fetch(&state, kind.into()).await?)
        }
        Commands::Dashboard => print_json(&reports::reports_dashboard(&state).await?),
        Commands::Migrations => print_json(&database::database_migrations(&state).await?),
        Commands::ExportReport { format } => {
            print_json(&reports::reports_export(&state, Some(format.into())).await?)
        }
        Commands::Settings {
            sample_mode,
            seed,
            store_timeout_ms,
            lookback_months,
        } => {
            let sample_mode = match (sample_mode, seed) {
                (Some(SampleArg::Full), _) => Some(SampleMode::Full),
                (Some(SampleArg::Random), _) => Some(SampleMode::Random),
                (Some(SampleArg::Seeded), seed) => Some(SampleMode::Seeded(seed.unwrap_or_default())),
                (None, Some(seed)) => Some(SampleMode::Seeded(seed)),
                (None, None) => None,
            };
            let update = ReportSettingsUpdate {
                sample_mode,
                store_timeout_ms,
                lookback_months,
            };
            let settings = if update.sample_mode.is_none()
                && update.store_timeout_ms.is_none()
                && update.lookback_months.is_none()
            {
                reports::settings_get(&state).await?
            } else {
                reports::settings_update(&state, update).await?
            };
            print_json(&settings)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CommandError::new("UNKNOWN", format!("failed to render output: {err}"), None))?;
    println!("{rendered}");
    Ok(())
}
