// ledger-pdf: Generate paginated PDF reports from ledger exports

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use ledger_pdf::layout::Page;
use ledger_pdf::report::{
    CategoryBreakdownReport, Expense, ExpenseReport, Income, IncomeReport, YearlySummaryReport,
};
use ledger_pdf::{
    PdfPageWriter, RecordingWriter, RenderedReport, ReportDefinition, ReportDriver, ReportError,
    ReportPeriod,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Failed to read input file: {0}")]
    InputError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Failed to write dry-run plan: {0}")]
    PlanError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate paginated PDF reports from ledger exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LEDGER_PDF_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expense ledger, one row per expense (A4 landscape)
    Expense {
        /// Expense records (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Only include this item type
        #[arg(long)]
        item_type: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Income ledger, one row per income entry (A4 portrait)
    Income {
        /// Income records (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Only include this income type
        #[arg(long)]
        item_type: Option<String>,

        #[command(flatten)]
        period: PeriodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Month-by-month income, expense and balance for one year
    Yearly {
        /// Expense records (JSON array)
        #[arg(long)]
        expenses: PathBuf,

        /// Income records (JSON array)
        #[arg(long)]
        incomes: PathBuf,

        #[arg(long)]
        year: i32,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Expenses grouped by item type, largest first
    Categories {
        /// Expense records (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        period: PeriodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// First day of the period (YYYY-MM-DD), needs --end-date
    #[arg(long)]
    start_date: Option<String>,

    /// Last day of the period (YYYY-MM-DD), inclusive
    #[arg(long)]
    end_date: Option<String>,

    /// Month (1-12), needs --year
    #[arg(long)]
    month: Option<u32>,

    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Text at the left of every page footer
    #[arg(long, default_value = "Household Ledger")]
    caption: String,

    /// Currency code shown in amount headers
    #[arg(long, env = "LEDGER_PDF_CURRENCY", default_value = "BDT")]
    currency: String,

    /// Output filename (defaults to {report}-{date}.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the page plan as JSON instead of writing a PDF
    #[arg(long)]
    dry_run: bool,
}

/// Page plan printed by `--dry-run`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan<'a> {
    report: String,
    reference: &'a str,
    page_count: usize,
    pages: &'a [Page],
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("ledger_pdf={}", cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let reference = generate_short_id();

    match cli.command {
        Command::Expense {
            input,
            item_type,
            period,
            output,
        } => {
            let mut report = ExpenseReport::new(period.resolve()?).currency(&output.currency);
            if let Some(item_type) = item_type {
                report = report.item_type(item_type);
            }
            let records: Vec<Expense> = load_records(&input)?;
            generate(&report, records, "expense", &output, &reference)
        }
        Command::Income {
            input,
            item_type,
            period,
            output,
        } => {
            let mut report = IncomeReport::new(period.resolve()?).currency(&output.currency);
            if let Some(item_type) = item_type {
                report = report.income_type(item_type);
            }
            let records: Vec<Income> = load_records(&input)?;
            generate(&report, records, "income", &output, &reference)
        }
        Command::Yearly {
            expenses,
            incomes,
            year,
            output,
        } => {
            let report = YearlySummaryReport::new(year).currency(&output.currency);
            let expenses: Vec<Expense> = load_records(&expenses)?;
            let incomes: Vec<Income> = load_records(&incomes)?;
            let months = report.aggregate(&expenses, &incomes);
            generate(&report, months, "yearly", &output, &reference)
        }
        Command::Categories {
            input,
            period,
            output,
        } => {
            let report =
                CategoryBreakdownReport::new(period.resolve()?).currency(&output.currency);
            let expenses: Vec<Expense> = load_records(&input)?;
            let groups = report.aggregate(&expenses);
            generate(&report, groups, "categories", &output, &reference)
        }
    }
}

fn generate<R: ReportDefinition>(
    report: &R,
    records: Vec<R::Record>,
    kind: &str,
    output: &OutputArgs,
    reference: &str,
) -> Result<(), AppError> {
    let generated_at = Local::now().naive_local();

    if output.dry_run {
        let rendered = ReportDriver::new(RecordingWriter::new())
            .caption(&output.caption)
            .generated_at(generated_at)
            .reference(reference)
            .render(report, records)?;
        let plan = Plan {
            report: report.title(),
            reference,
            page_count: rendered.page_count,
            pages: &rendered.pages,
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let writer = PdfPageWriter::new(&report.title())?;
    let rendered = ReportDriver::new(writer)
        .caption(&output.caption)
        .generated_at(generated_at)
        .reference(reference)
        .render(report, records)?;

    let output_file = output
        .output
        .clone()
        .unwrap_or_else(|| format!("{}-{}.pdf", kind, Local::now().format("%Y-%m-%d")));
    std::fs::write(&output_file, &rendered.bytes)?;
    info!(file = %output_file, bytes = rendered.bytes.len(), "wrote report");

    println!("✓ Generated: {}", output_file);
    println!("  Report: {}", report.title());
    println!("  Rows: {}", row_count(&rendered));
    println!("  Pages: {}", rendered.page_count);
    println!("  Ref: {}", reference);

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

impl PeriodArgs {
    fn resolve(&self) -> Result<ReportPeriod, AppError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        Ok(ReportPeriod::from_parts(start, end, self.month, self.year)?)
    }
}

fn parse_date(date_str: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(None),
    }
}

fn generate_short_id() -> String {
    let uuid = Uuid::new_v4();
    let hex = format!("{:x}", uuid);
    hex[..8].to_uppercase()
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::InputError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::InputError(format!("Invalid JSON in {}: {}", path.display(), e)))
}

fn row_count(rendered: &RenderedReport) -> usize {
    rendered
        .pages
        .iter()
        .map(|page| page.row_indices().len())
        .sum()
}
