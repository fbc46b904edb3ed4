use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "assess-cli")]
#[command(about = "A CLI client for the study assessment platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse studies
    Study(StudyCommands),
    /// Manage a study's assessment documents
    Document(DocumentCommands),
    /// Walk a document's questionnaire interactively
    Wizard {
        /// Document to open
        document_id: String,
    },
    /// Local settings management
    Settings(SettingsCommands),
}

#[derive(Args)]
pub struct StudyCommands {
    #[command(subcommand)]
    pub command: StudySubcommands,
}

#[derive(Subcommand)]
pub enum StudySubcommands {
    /// List all studies
    List,
    /// Show a study and its documents
    Show {
        /// Study to show
        study_id: String,
    },
}

#[derive(Args)]
pub struct DocumentCommands {
    #[command(subcommand)]
    pub command: DocumentSubcommands,
}

#[derive(Subcommand)]
pub enum DocumentSubcommands {
    /// Create a new document for a study
    New {
        /// Study the document belongs to
        study_id: String,
        /// Document name (defaults to a timestamped name)
        #[arg(long)]
        name: Option<String>,
    },
    /// List a study's documents
    List {
        /// Study whose documents to list
        study_id: String,
    },
    /// Rename a document
    Rename {
        /// Document to rename
        document_id: String,
        /// New name
        name: String,
    },
    /// Export a document with its answers as JSON
    Export {
        /// Document to export
        document_id: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show all settings
    Show,
    /// Set a setting value
    Set {
        /// Setting key, e.g. "api.base-url"
        key: String,
        /// New value
        value: String,
    },
}
