//! Batch command - extract payment lines from many invoices at once.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use vestra_core::models::config::VestraConfig;
use vestra_core::models::invoice::ParsedInvoice;

use super::extract::{format_invoice, format_totals, load_invoice, OutputFormat};
use super::load_config;

const SUMMARY_HEADER: [&str; 6] = [
    "filename",
    "status",
    "lines",
    "totals",
    "processing_time_ms",
    "error",
];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching `.pdf` and `.txt` invoices
    #[arg(required = true)]
    input: String,

    /// Directory for per-invoice outputs and the summary
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each invoice
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Keep going when an invoice cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

enum Outcome {
    Parsed(ParsedInvoice),
    Failed(String),
}

/// What happened to one input file.
struct FileReport {
    path: PathBuf,
    outcome: Outcome,
    elapsed_ms: u64,
}

impl FileReport {
    fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    fn summary_row(&self) -> [String; 6] {
        let (status, lines, totals, error) = match &self.outcome {
            Outcome::Parsed(invoice) => (
                "success",
                invoice.len().to_string(),
                format_totals(invoice),
                String::new(),
            ),
            Outcome::Failed(message) => ("error", String::new(), String::new(), message.clone()),
        };

        [
            self.file_name().to_string(),
            status.to_string(),
            lines,
            totals,
            self.elapsed_ms.to_string(),
            error,
        ]
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let inputs = collect_inputs(&args.input)?;

    eprintln!(
        "{} Found {} invoices to process",
        style("ℹ").blue(),
        inputs.len()
    );

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let reports = process_all(inputs, &config, args.continue_on_error)?;

    if let Some(dir) = &args.output_dir {
        write_outputs(&reports, dir, args.format)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or(Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &reports)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&reports, start);
    Ok(())
}

/// Expand the glob, keeping only `.pdf` and `.txt` files.
fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let inputs: Vec<PathBuf> = glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf") || e.eq_ignore_ascii_case("txt"))
        })
        .collect();

    if inputs.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }
    Ok(inputs)
}

/// Extract every input in order. Without `continue_on_error` the first
/// failure aborts the batch.
fn process_all(
    inputs: Vec<PathBuf>,
    config: &VestraConfig,
    continue_on_error: bool,
) -> anyhow::Result<Vec<FileReport>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} invoices")?
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(inputs.len());
    for path in inputs {
        let file_start = Instant::now();
        let outcome = match load_invoice(&path, config) {
            Ok(invoice) => Outcome::Parsed(invoice),
            Err(e) if continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                Outcome::Failed(e.to_string())
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        };

        reports.push(FileReport {
            path,
            outcome,
            elapsed_ms: file_start.elapsed().as_millis() as u64,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(reports)
}

/// Write `<stem>.<ext>` for every parsed invoice.
fn write_outputs(reports: &[FileReport], dir: &Path, format: OutputFormat) -> anyhow::Result<()> {
    for report in reports {
        let Outcome::Parsed(invoice) = &report.outcome else {
            continue;
        };
        let stem = report
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let output_path = dir.join(format!("{}.{}", stem, format.extension()));

        fs::write(&output_path, format_invoice(invoice, format, false)?)?;
        debug!("Wrote {}", output_path.display());
    }
    Ok(())
}

fn write_summary(path: &Path, reports: &[FileReport]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(SUMMARY_HEADER)?;
    for report in reports {
        wtr.write_record(report.summary_row())?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_report(reports: &[FileReport], start: Instant) {
    let failures: Vec<(&FileReport, &str)> = reports
        .iter()
        .filter_map(|report| match &report.outcome {
            Outcome::Failed(message) => Some((report, message.as_str())),
            Outcome::Parsed(_) => None,
        })
        .collect();
    let lines: usize = reports
        .iter()
        .map(|report| match &report.outcome {
            Outcome::Parsed(invoice) => invoice.len(),
            Outcome::Failed(_) => 0,
        })
        .sum();

    eprintln!();
    eprintln!(
        "{} Processed {} invoices in {:?}: {} payment lines",
        style("✓").green(),
        reports.len(),
        start.elapsed(),
        lines
    );
    eprintln!(
        "   {} parsed, {} failed",
        style(reports.len() - failures.len()).green(),
        style(failures.len()).red()
    );

    if !failures.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed invoices:").red());
        for (report, message) in failures {
            eprintln!("  - {}: {}", report.path.display(), message);
        }
    }
}
