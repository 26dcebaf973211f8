//! Process command - extract fields from a single local PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use szamla_core::ExtractedRecord;
use szamla_pipeline::PipelineConfig;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = PipelineConfig::load(config_path.map(Path::new))?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting invoice data...");

    let data = fs::read(&args.input)?;
    let extractor = config.extractor();
    let record = extractor.extract_from_pdf(&data)?;

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "document_type",
        "invoice_number",
        "vendor_name",
        "vendor_tax_id",
        "issue_date",
        "due_date",
        "amount",
        "buyer_name",
        "comment",
        "file_url",
    ])?;

    wtr.write_record(&[
        record.document_type.label().to_string(),
        record.invoice_number.clone().unwrap_or_default(),
        record.vendor_name.clone().unwrap_or_default(),
        record.vendor_tax_id.clone().unwrap_or_default(),
        record.issue_date.clone().unwrap_or_default(),
        record.due_date.clone().unwrap_or_default(),
        record.amount.map(|a| a.to_string()).unwrap_or_default(),
        record.buyer_name.clone().unwrap_or_default(),
        record.comment.clone().unwrap_or_default(),
        record.file_url.clone().unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.document_type.label()));
    if let Some(number) = &record.invoice_number {
        output.push_str(&format!("Number:   {}\n", number));
    }
    if let Some(vendor) = &record.vendor_name {
        output.push_str(&format!("Vendor:   {}\n", vendor));
    }
    if let Some(tax_id) = &record.vendor_tax_id {
        output.push_str(&format!("Tax id:   {}\n", tax_id));
    }
    if let Some(issued) = &record.issue_date {
        output.push_str(&format!("Issued:   {}\n", issued));
    }
    if let Some(due) = &record.due_date {
        output.push_str(&format!("Due:      {}\n", due));
    }
    if let Some(amount) = record.amount {
        output.push_str(&format!("Amount:   {} Ft\n", amount));
    }
    if let Some(buyer) = &record.buyer_name {
        output.push_str(&format!("Buyer:    {}\n", buyer));
    }
    if let Some(comment) = &record.comment {
        output.push_str(&format!("Comment:  {}\n", comment));
    }

    output
}
