//! Extract command - payment lines from a single invoice file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use vestra_core::invoice::{InvoiceLineExtractor, LineExtractor};
use vestra_core::models::config::VestraConfig;
use vestra_core::models::invoice::ParsedInvoice;

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text, `-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print per-currency totals after the output
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (`{ "lines": [...] }`)
    Json,
    /// CSV output, one row per line
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let invoice = if args.input.as_os_str() == "-" {
        pb.set_message("Reading stdin...");
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        extractor_for(&config).extract(&text)
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        info!("Processing file: {}", args.input.display());
        pb.set_message("Extracting payment lines...");
        load_invoice(&args.input, &config)?
    };

    pb.finish_and_clear();

    let output = format_invoice(&invoice, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.summary {
        print_summary(&invoice);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Build the line extractor from configuration.
pub fn extractor_for(config: &VestraConfig) -> InvoiceLineExtractor {
    InvoiceLineExtractor::from_config(&config.extraction)
}

/// Read an invoice file and extract its payment lines.
///
/// `.pdf` files go through the PDF text decoder; anything else is read as
/// UTF-8 text.
pub fn load_invoice(path: &Path, config: &VestraConfig) -> anyhow::Result<ParsedInvoice> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let extractor = extractor_for(config);

    let invoice = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            extractor.extract_from_pdf(&data, &config.pdf)?
        }
        _ => {
            let text = fs::read_to_string(path)?;
            extractor.extract(&text)
        }
    };

    debug!("{}: {} lines", path.display(), invoice.len());
    Ok(invoice)
}

pub fn format_invoice(
    invoice: &ParsedInvoice,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Json => Ok(serde_json::to_string(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["chain", "address", "amount", "currency", "description"])?;

    for line in &invoice.lines {
        wtr.write_record([
            line.chain.map(|c| c.label()).unwrap_or_default(),
            line.address.as_str(),
            line.amount.as_str(),
            line.currency.as_str(),
            line.description.as_deref().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &ParsedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Payment lines: {}\n", invoice.len()));

    for (i, line) in invoice.lines.iter().enumerate() {
        let recipient = if line.has_address() {
            line.address.as_str()
        } else {
            "(no address)"
        };
        output.push_str(&format!(
            "  {}. {}: {} {}",
            i + 1,
            recipient,
            line.amount,
            line.currency
        ));
        if let Some(chain) = line.chain {
            output.push_str(&format!(" on {}", chain));
        }
        if let Some(description) = &line.description {
            output.push_str(&format!(" ({})", description));
        }
        output.push('\n');
    }

    let totals = invoice.totals_by_currency();
    if !totals.is_empty() {
        output.push_str("\nTotals:\n");
        for (currency, total) in &totals {
            output.push_str(&format!("  {} {}\n", total, currency));
        }
    }

    output
}

/// Format per-currency totals as `"1000 USDC; 12.5 EUR"`.
pub fn format_totals(invoice: &ParsedInvoice) -> String {
    invoice
        .totals_by_currency()
        .iter()
        .map(|(currency, total)| format!("{} {}", total, currency))
        .collect::<Vec<_>>()
        .join("; ")
}

fn print_summary(invoice: &ParsedInvoice) {
    eprintln!();
    eprintln!(
        "{} {} payment lines extracted",
        style("ℹ").blue(),
        invoice.len()
    );
    if !invoice.is_empty() {
        eprintln!("{} Totals: {}", style("ℹ").blue(), format_totals(invoice));
    }

    let incomplete = invoice.incomplete_lines().count();
    if incomplete > 0 {
        eprintln!(
            "{} {} lines need review (missing address or amount)",
            style("!").yellow(),
            incomplete
        );
    }
}
