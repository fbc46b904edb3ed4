use crate::api::AssessmentApi;
use crate::cli::app::{StudyCommands, StudySubcommands};
use crate::cli::ui::with_spinner;
use crate::wizard::DocumentRoster;
use anyhow::Result;
use colored::Colorize;

pub async fn handle_study_command(api: &AssessmentApi, cmd: StudyCommands) -> Result<()> {
    match cmd.command {
        StudySubcommands::List => {
            let studies = with_spinner("Loading studies...", api.list_studies()).await?;

            if studies.is_empty() {
                println!("{}", "No studies found".yellow());
                return Ok(());
            }

            for study in studies {
                println!(
                    "{}  {} ({}, {})",
                    study.id.cyan(),
                    study.name.bold(),
                    study.phase,
                    study.therapeutic_area
                );
            }
        }

        StudySubcommands::Show { study_id } => {
            let Some(study) = with_spinner("Loading study...", api.get_study(&study_id)).await?
            else {
                println!("{}", "Study not found. Check the id and try again.".red());
                return Ok(());
            };

            println!("{}", study.name.bold());
            println!("Phase:            {}", study.phase);
            println!("Therapeutic area: {}", study.therapeutic_area);
            println!("Study question:   {}", study.study_question);

            let documents =
                with_spinner("Loading documents...", api.list_documents(&study_id)).await?;
            print_documents(&DocumentRoster::new(documents));
        }
    }
    Ok(())
}

pub(super) fn print_documents(roster: &DocumentRoster) {
    let in_progress = roster.in_progress();
    let completed = roster.completed();

    println!("\n{} ({})", "In progress".bold(), in_progress.len());
    for document in &in_progress {
        println!(
            "  {}  {} — {}% ({}/{} answered)",
            document.id.cyan(),
            document.name,
            document.progress,
            document.answered_questions,
            document.total_questions
        );
    }

    println!("{} ({})", "Completed".bold(), completed.len());
    for document in &completed {
        println!("  {}  {}", document.id.cyan(), document.name.green());
    }
}
