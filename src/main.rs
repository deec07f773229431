use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use listing_cleaner::config::Config;
use listing_cleaner::{logging, Cleaner};

#[derive(Parser)]
#[command(name = "listing-cleaner")]
#[command(about = "Normalize company job-listing CSV exports")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./cleaner.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every cleaning stage and write the cleaned dataset
    Clean {
        /// Raw listings CSV
        #[arg(long)]
        input: PathBuf,
        /// Output CSV (overrides output.path from the config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write each stage's output table to this directory
        #[arg(long)]
        intermediate_dir: Option<PathBuf>,
        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Run a single stage, file to file
    Stage {
        /// Stage name, see `stages`
        name: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// List the available stages
    Stages,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logging::init_logging(&config.logging);

    match cli.command {
        Commands::Clean {
            input,
            output,
            intermediate_dir,
            report,
        } => {
            if let Some(output) = output {
                config.output.path = output;
            }
            if intermediate_dir.is_some() {
                config.output.intermediate_dir = intermediate_dir;
            }

            let cleaner = Cleaner::new(config)?;
            let output = cleaner.config().output.path.clone();
            let result = match cleaner.run(&input, &output) {
                Ok(result) => result,
                Err(e) => {
                    error!("Cleaning run failed: {}", e);
                    return Err(e).with_context(|| format!("Failed to clean {}", input.display()));
                }
            };

            println!("Cleaned {} rows into {}", result.rows, result.output.display());
            for stage in &result.stages {
                println!(
                    "   {:<13} {:>6} cells changed  ({:.3}s)",
                    stage.stage, stage.cells_changed, stage.duration_secs
                );
            }

            if let Some(report_path) = report {
                result
                    .write_json(&report_path)
                    .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
                info!("Wrote run report to {}", report_path.display());
            }
        }
        Commands::Stage {
            name,
            input,
            output,
        } => {
            let cleaner = Cleaner::new(config)?;
            let report = cleaner
                .run_stage(&name, &input, &output)
                .with_context(|| format!("Stage '{}' failed", name))?;
            println!(
                "Stage {} changed {} cells across {} rows, wrote {}",
                report.stage,
                report.cells_changed,
                report.rows,
                output.display()
            );
        }
        Commands::Stages => {
            let cleaner = Cleaner::new(config)?;
            let registry = cleaner.registry();
            for name in registry.list_stages() {
                let stage = registry.get(&name)?;
                let produced = stage.produced_columns();
                if produced.is_empty() {
                    println!("{:<13} requires [{}]", name, stage.required_columns().join(", "));
                } else {
                    println!(
                        "{:<13} requires [{}] produces [{}]",
                        name,
                        stage.required_columns().join(", "),
                        produced.join(", ")
                    );
                }
            }
        }
    }

    Ok(())
}
