//! Extract command, pull structured fields out of a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use autodoc_core::InvoiceFields;

use super::build_pipeline;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show the overall extraction confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(config_path);
    let fields = pipeline.process(&args.input)?;

    let output = format_fields(&fields, args.format)?;

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

    if args.show_confidence {
        match fields.confidence_overall {
            Some(score) => println!(
                "{} Extraction confidence: {}%",
                style("ℹ").blue(),
                score
            ),
            None => println!(
                "{} No structured data found, confidence not computed",
                style("ℹ").blue()
            ),
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_fields(fields: &InvoiceFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn push_line(output: &mut String, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        output.push_str(&format!("{:<14} {}\n", label, v));
    }
}

fn format_text(fields: &InvoiceFields) -> String {
    let mut output = String::new();

    push_line(&mut output, "Customer:", &fields.customer_name);
    push_line(&mut output, "Phone:", &fields.customer_phone);
    push_line(&mut output, "Email:", &fields.customer_email);
    push_line(&mut output, "Plate:", &fields.plate_number);
    push_line(&mut output, "Service:", &fields.service_description);
    push_line(&mut output, "Reference:", &fields.reference);
    push_line(&mut output, "Date:", &fields.date);
    push_line(&mut output, "Amount:", &fields.amount);

    if let Some(service) = &fields.matched_service {
        output.push_str(&format!("{:<14} {}", "Matched:", service));
        if let Some(minutes) = fields.estimated_minutes {
            output.push_str(&format!(" ({} min)", minutes));
        }
        output.push('\n');
    }

    if !fields.items.is_empty() {
        output.push_str("\nLine items:\n");
        for item in &fields.items {
            let value = item
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "  {}. {} ({})\n",
                item.line_no, item.description, value
            ));
        }
    }

    if let Some(score) = fields.confidence_overall {
        output.push_str(&format!("\nConfidence: {}%\n", score));
    }

    output
}
