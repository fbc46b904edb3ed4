use crate::cli::app::{SettingsCommands, SettingsSubcommands};
use crate::config::{API_BASE_URL_KEY, Config};
use anyhow::Result;
use colored::Colorize;

pub async fn handle_settings_command(config: &Config, cmd: SettingsCommands) -> Result<()> {
    match cmd.command {
        SettingsSubcommands::Show => {
            println!("{} = {}", API_BASE_URL_KEY.cyan(), config.api_base_url().await?);
            for (key, value) in config.list_settings().await? {
                if key != API_BASE_URL_KEY {
                    println!("{} = {}", key.cyan(), value);
                }
            }
        }
        SettingsSubcommands::Set { key, value } => {
            config.set_setting(&key, &value).await?;
            println!("{} {} = {}", "✓ Set".green(), key.cyan(), value);
        }
    }
    Ok(())
}
