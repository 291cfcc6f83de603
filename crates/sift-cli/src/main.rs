//! Sift CLI - Command-line interface for the Sift redundancy detection engine.

use clap::Parser;
use sift_cli::commands;
use sift_cli::{logging, App, Cli, Command, Formatter, SiftConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> sift_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then environment and flag overrides
    let mut config = SiftConfig::load(cli.config.as_deref())?;
    config.apply_env_overrides()?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }
    config.validate()?;

    logging::init(&config.logging)?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Ingest(args) => {
            let app = App::open(&config)?;
            commands::execute_ingest(args, &app, &formatter).await?;
        }
        Command::Batch(args) => {
            let app = App::open(&config)?;
            commands::execute_batch(args, &app, &formatter).await?;
        }
        Command::Demo(args) => {
            let app = if args.persist {
                App::open(&config)?
            } else {
                App::in_memory(&config)?
            };
            commands::execute_demo(&app, &formatter).await?;
        }
        Command::List(args) => {
            let app = App::open(&config)?;
            commands::execute_list(args, &app, &formatter).await?;
        }
        Command::Logs(args) => {
            let app = App::open(&config)?;
            commands::execute_logs(args, &app, &formatter).await?;
        }
        Command::Stats => {
            let app = App::open(&config)?;
            commands::execute_stats(&app, &formatter).await?;
        }
    }

    Ok(())
}
