//! Document renaming: the shared operation plus the study page's roster.

use crate::api::SyncGateway;
use crate::api::models::{Assessment, AssessmentStatus};
use anyhow::Result;
use std::collections::HashMap;

pub const EMPTY_NAME_MESSAGE: &str = "Document name cannot be empty.";
pub const NOT_FOUND_MESSAGE: &str = "Document not found.";

#[derive(Debug)]
pub enum RenameOutcome {
    Renamed(Assessment),
    NotFound,
    /// Local validation failure; the gateway was never called
    EmptyName,
}

/// Trim and validate the candidate name, then rename through the gateway.
pub async fn rename_document<G: SyncGateway + ?Sized>(
    gateway: &G,
    assessment_id: &str,
    candidate: &str,
) -> Result<RenameOutcome> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Ok(RenameOutcome::EmptyName);
    }

    match gateway.rename(assessment_id, trimmed).await? {
        Some(updated) => {
            log::info!("Document renamed: {} -> {}", assessment_id, updated.name);
            Ok(RenameOutcome::Renamed(updated))
        }
        None => Ok(RenameOutcome::NotFound),
    }
}

/// A study's documents as the study page sees them: renamed names overlaid
/// on the fetched list, per-document rename errors, and the
/// completed / in-progress partition.
pub struct DocumentRoster {
    documents: Vec<Assessment>,
    renamed_names: HashMap<String, String>,
    rename_errors: HashMap<String, String>,
    renaming_id: Option<String>,
}

impl DocumentRoster {
    pub fn new(documents: Vec<Assessment>) -> Self {
        Self {
            documents,
            renamed_names: HashMap::new(),
            rename_errors: HashMap::new(),
            renaming_id: None,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn with_current_name(&self, document: &Assessment) -> Assessment {
        let mut document = document.clone();
        if let Some(name) = self.renamed_names.get(&document.id) {
            document.name = name.clone();
        }
        document
    }

    pub fn completed(&self) -> Vec<Assessment> {
        self.documents
            .iter()
            .filter(|document| document.status == AssessmentStatus::Completed)
            .map(|document| self.with_current_name(document))
            .collect()
    }

    pub fn in_progress(&self) -> Vec<Assessment> {
        self.documents
            .iter()
            .filter(|document| document.status == AssessmentStatus::InProgress)
            .map(|document| self.with_current_name(document))
            .collect()
    }

    pub fn rename_error(&self, document_id: &str) -> Option<&str> {
        self.rename_errors.get(document_id).map(String::as_str)
    }

    pub fn is_renaming(&self, document_id: &str) -> bool {
        self.renaming_id.as_deref() == Some(document_id)
    }

    /// Rename one of the study's documents. Returns whether the rename
    /// stuck; failures land in [`DocumentRoster::rename_error`] rather
    /// than propagating to the caller.
    pub async fn rename<G: SyncGateway + ?Sized>(
        &mut self,
        gateway: &G,
        document_id: &str,
        candidate: &str,
    ) -> bool {
        self.renaming_id = Some(document_id.to_string());
        self.rename_errors.remove(document_id);

        let renamed = match rename_document(gateway, document_id, candidate).await {
            Ok(RenameOutcome::Renamed(updated)) => {
                self.renamed_names
                    .insert(document_id.to_string(), updated.name);
                true
            }
            Ok(RenameOutcome::EmptyName) => {
                self.rename_errors
                    .insert(document_id.to_string(), EMPTY_NAME_MESSAGE.to_string());
                false
            }
            Ok(RenameOutcome::NotFound) => {
                self.rename_errors
                    .insert(document_id.to_string(), NOT_FOUND_MESSAGE.to_string());
                false
            }
            Err(err) => {
                log::error!("Failed to rename document {}: {:#}", document_id, err);
                self.rename_errors
                    .insert(document_id.to_string(), format!("{err:#}"));
                false
            }
        };

        self.renaming_id = None;
        renamed
    }
}
