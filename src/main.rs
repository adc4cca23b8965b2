//! Inquestor CLI entry point.

use anyhow::Result;
use clap::Parser;
use inquestor::cli::commands::{self, Completion, View};
use inquestor::cli::{Cli, Commands};
use inquestor::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("inquestor={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    let completion = match &cli.command {
        Commands::Research {
            query,
            save,
            no_save,
            raw,
            json,
        } => {
            let save = match (*save, *no_save) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::run_research(query.clone(), save, View::from_flags(*raw, *json), settings)
                .await?
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
            Completion::Done
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
            Completion::Done
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path.as_deref(), settings)?;
            Completion::Done
        }
    };

    if completion.exits_immediately() {
        std::process::exit(completion.exit_code());
    }

    Ok(())
}
