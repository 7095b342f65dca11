//! Batch command, run extraction over many document files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use tracing::{debug, error};

use super::{build_pipeline, extract};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: extract::OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text" | "md" | "csv")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = build_pipeline(config_path);
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for path in &files {
        match pipeline.process(path) {
            Ok(fields) => {
                let output = extract::format_fields(&fields, args.format)?;
                match &args.output_dir {
                    Some(dir) => {
                        let stem = path
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .unwrap_or("document");
                        let ext = match args.format {
                            extract::OutputFormat::Json => "json",
                            extract::OutputFormat::Text => "txt",
                        };
                        let out_path = dir.join(format!("{stem}.{ext}"));
                        fs::write(&out_path, &output)?;
                        debug!("wrote {}", out_path.display());
                    }
                    None => {
                        println!("{}", style(path.display()).bold());
                        println!("{}", output);
                    }
                }
                succeeded += 1;
            }
            Err(e) => {
                error!("failed to process {}: {e}", path.display());
                failed += 1;
                if !args.continue_on_error {
                    anyhow::bail!("processing stopped at {}: {e}", path.display());
                }
            }
        }
    }

    println!(
        "{} Processed {} files ({} failed) in {:?}",
        style("✓").green(),
        succeeded,
        failed,
        start.elapsed()
    );

    Ok(())
}
