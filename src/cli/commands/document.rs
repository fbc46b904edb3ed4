use crate::api::AssessmentApi;
use crate::cli::app::{DocumentCommands, DocumentSubcommands};
use crate::cli::ui::with_spinner;
use crate::wizard::{self, DocumentRoster, RenameOutcome};
use crate::wizard::rename::{EMPTY_NAME_MESSAGE, NOT_FOUND_MESSAGE};
use anyhow::{Context as _, Result};
use colored::Colorize;
use std::sync::Arc;

pub async fn handle_document_command(api: &AssessmentApi, cmd: DocumentCommands) -> Result<()> {
    match cmd.command {
        DocumentSubcommands::New { study_id, name } => {
            let create = wizard::get_or_create_document(Arc::new(api.clone()), &study_id, name);
            match with_spinner("Creating document...", create).await {
                Ok(document_id) => {
                    println!("{} {}", "✓ Document created:".green(), document_id.cyan());
                    println!(
                        "Run {} to start answering",
                        format!("assess-cli wizard {}", document_id).cyan()
                    );
                }
                Err(err) => {
                    log::error!("Failed to create document for {}: {:#}", study_id, err);
                    eprintln!("{} {:#}", "Failed to create document:".red(), err);
                    eprintln!("{}", "Ensure the API is running.".yellow());
                }
            }
        }

        DocumentSubcommands::List { study_id } => {
            let documents =
                with_spinner("Loading documents...", api.list_documents(&study_id)).await?;

            if documents.is_empty() {
                println!("{}", "No documents for this study yet".yellow());
                return Ok(());
            }

            super::study::print_documents(&DocumentRoster::new(documents));
        }

        DocumentSubcommands::Export {
            document_id,
            output,
        } => {
            let Some(document) =
                with_spinner("Loading document...", api.get_document(&document_id)).await?
            else {
                println!("{}", NOT_FOUND_MESSAGE.red());
                return Ok(());
            };

            let json = serde_json::to_string_pretty(&document)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write export to {:?}", path))?;
                    println!("{} {:?}", "✓ Exported to".green(), path);
                }
                None => println!("{}", json),
            }
        }

        DocumentSubcommands::Rename { document_id, name } => {
            let rename = wizard::rename_document(api, &document_id, &name);
            match with_spinner("Renaming document...", rename).await {
                Ok(RenameOutcome::Renamed(updated)) => {
                    println!("{} {}", "✓ Renamed to".green(), updated.name.bold());
                }
                Ok(RenameOutcome::EmptyName) => {
                    println!("{}", EMPTY_NAME_MESSAGE.yellow());
                }
                Ok(RenameOutcome::NotFound) => {
                    println!("{}", NOT_FOUND_MESSAGE.red());
                }
                Err(err) => {
                    log::error!("Failed to rename document {}: {:#}", document_id, err);
                    eprintln!("{} {:#}", "Failed to rename document:".red(), err);
                    eprintln!("{}", "Ensure the API is running.".yellow());
                }
            }
        }
    }
    Ok(())
}
