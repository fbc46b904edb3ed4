use anyhow::Result;
use clap::Parser;
use log::info;
use once_cell::sync::OnceCell;

use assess_cli::api::AssessmentApi;
use assess_cli::cli::app::{Cli, Commands};
use assess_cli::cli::commands::{document, settings, study, wizard};
use assess_cli::config::Config;

// Global Config instance
static CONFIG: OnceCell<Config> = OnceCell::new();

/// Get a reference to the global Config
fn global_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("assess-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting assess-cli");

    // Initialize global Config once
    let config = Config::load().await?;
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Failed to initialize global Config"))?;
    let config = global_config();

    let api = AssessmentApi::new(config.api_base_url().await?);

    match cli.command {
        Commands::Study(cmd) => study::handle_study_command(&api, cmd).await,
        Commands::Document(cmd) => document::handle_document_command(&api, cmd).await,
        Commands::Wizard { document_id } => {
            wizard::handle_wizard_command(&api, config, &document_id).await
        }
        Commands::Settings(cmd) => settings::handle_settings_command(config, cmd).await,
    }
}
