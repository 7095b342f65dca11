//! Config command, manage extraction patterns and service templates.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use autodoc_core::{builtin_patterns, builtin_templates, ConfigStore, JsonConfigStore};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the active patterns and templates
    Show,

    /// Initialize a config file seeded with the built-in rules
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autodoc")
        .join("config.json")
}

fn show_config() -> anyhow::Result<()> {
    let config_path = default_config_path();

    let (patterns, templates) = if config_path.exists() {
        let store = JsonConfigStore::new(&config_path);
        (store.load_patterns()?, store.load_templates()?)
    } else {
        println!(
            "{} No config file found, showing built-in defaults.",
            style("ℹ").blue()
        );
        (builtin_patterns(), builtin_templates())
    };

    let doc = serde_json::json!({
        "patterns": patterns,
        "templates": templates,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    JsonConfigStore::write(&output_path, &builtin_patterns(), &builtin_templates())?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'autodoc config init' to create a configuration file.");
    }

    Ok(())
}
