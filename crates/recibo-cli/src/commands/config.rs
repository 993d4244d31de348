//! Config command - inspect or create the validator's settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use recibo_core::ReciboConfig;

use super::{default_config_path, load_config};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective thresholds and policies as JSON
    Show,

    /// Write a settings file holding the defaults
    Init(InitArgs),

    /// Print where the settings file is read from
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write here instead of the settings location
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace a file that is already there
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show(&file, config_path),
        ConfigCommand::Init(init_args) => init(init_args, &file),
        ConfigCommand::Path => path(&file),
    }
}

fn show(file: &Path, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = if file.exists() {
        load_config(config_path)?
    } else {
        eprintln!(
            "{} No settings at {}, using defaults.",
            style("ℹ").blue(),
            file.display()
        );
        ReciboConfig::default()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init(args: InitArgs, file: &Path) -> anyhow::Result<()> {
    let target = args.output.unwrap_or_else(|| file.to_path_buf());

    if target.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Pass --force to replace it.",
            target.display()
        );
    }

    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    ReciboConfig::default().save(&target)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        target.display()
    );
    Ok(())
}

fn path(file: &Path) -> anyhow::Result<()> {
    let status = if file.exists() {
        style("present").green()
    } else {
        style("missing, run 'recibo config init'").yellow()
    };
    println!("{} ({})", file.display(), status);
    Ok(())
}
