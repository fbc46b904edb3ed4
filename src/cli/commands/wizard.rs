//! Interactive questionnaire wizard.

use crate::api::{AssessmentApi, SyncGateway};
use crate::cli::ui::with_spinner;
use crate::config::Config;
use crate::wizard::{Advance, DraftStore, SaveExit, WizardSession};
use anyhow::Result;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

const NEXT: &str = "Next question";
const FINISH: &str = "Finish document";
const PREVIOUS: &str = "Previous question";
const SAVE_EXIT: &str = "Save & exit";

pub async fn handle_wizard_command(
    api: &AssessmentApi,
    config: &Config,
    document_id: &str,
) -> Result<()> {
    let loaded = with_spinner(
        "Loading document...",
        WizardSession::load(api, config, document_id),
    )
    .await;

    let mut session = match loaded {
        Ok(Some(session)) => session,
        Ok(None) => {
            println!(
                "{}",
                "Document not found. It may have been deleted — go back to the study and pick another."
                    .red()
            );
            return Ok(());
        }
        Err(err) => {
            log::error!("Failed to load document {}: {:#}", document_id, err);
            eprintln!("{} {:#}", "Failed to load document:".red(), err);
            eprintln!("{}", "Ensure the API is running.".yellow());
            return Ok(());
        }
    };

    if session.total_questions() == 0 {
        println!("{}", "This document's question pool has no questions".yellow());
        return Ok(());
    }

    loop {
        print_header(&session);

        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Answer")
            .with_initial_text(session.current_answer().to_string())
            .allow_empty(true)
            .interact_text()?;
        session.update_answer(answer).await;

        let mut choices = vec![if session.on_last_question() { FINISH } else { NEXT }];
        if session.current_question() > 0 {
            choices.push(PREVIOUS);
        }
        choices.push(SAVE_EXIT);

        let picked = Select::with_theme(&ColorfulTheme::default())
            .items(&choices)
            .default(0)
            .interact()?;

        match choices[picked] {
            NEXT => {
                session.next().await?;
            }
            PREVIOUS => session.previous(),
            FINISH => {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("Save answers and mark the document complete?")
                    .default(true)
                    .interact()?;
                if !confirmed {
                    continue;
                }

                match with_spinner("Completing document...", session.next()).await {
                    Ok(Advance::Completed(document)) => {
                        println!("{}", format!("✓ {} completed", document.name).green());
                        break;
                    }
                    Ok(Advance::NotFound) => {
                        println!("{}", "Document not found. It may have been deleted.".red());
                        break;
                    }
                    Ok(Advance::Moved) => {}
                    Err(err) => {
                        log::error!("Failed to complete document {}: {:#}", document_id, err);
                        eprintln!("{} {:#}", "Failed to complete document:".red(), err);
                        eprintln!("{}", "Ensure the API is running, then finish again.".yellow());
                    }
                }
            }
            SAVE_EXIT => {
                match with_spinner("Saving progress...", session.save_and_exit()).await {
                    Ok(SaveExit::Saved(_)) => {
                        println!("{}", "✓ Progress saved".green());
                        println!("Back to study: {}", session.study().name.bold());
                        break;
                    }
                    Ok(SaveExit::NotFound) => {
                        println!("{}", "Document not found. It may have been deleted.".red());
                        break;
                    }
                    Err(err) => {
                        log::error!("Failed to save document {}: {:#}", document_id, err);
                        eprintln!("{} {:#}", "Failed to save document:".red(), err);
                        eprintln!("{}", "Ensure the API is running, then save again.".yellow());
                    }
                }
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_header<G: SyncGateway, D: DraftStore>(session: &WizardSession<'_, G, D>) {
    println!("\n{}", session.document().name.bold());
    println!(
        "{}",
        format!(
            "Question {} of {} — {:.0}%",
            session.current_question() + 1,
            session.total_questions(),
            session.progress()
        )
        .dimmed()
    );

    if let Some(question) = session.question() {
        println!("\n{}", question.text.bold());
        println!(
            "{}",
            format!(
                "Domain: {}   Risk type: {}   Reference: {}",
                question.domain, question.risk_type, question.iso_reference
            )
            .dimmed()
        );
    }
}
