//! Interactive wizard session for one assessment document.
//!
//! One session per open wizard; remote calls flip the busy flags but never
//! block answer edits, which stay purely local.

use super::answers::{self, AnswerBuffer};
use super::draft::DraftStore;
use super::progress::wizard_progress;
use super::rename::{self, RenameOutcome};
use crate::api::SyncGateway;
use crate::api::models::{Assessment, AssessmentContext, AssessmentStatus, Question, Study};
use anyhow::Result;

/// Result of [`WizardSession::next`]
#[derive(Debug)]
pub enum Advance {
    /// Moved to the following question; no remote traffic
    Moved,
    /// Was on the last question: answers persisted and the document marked
    /// complete, in that order
    Completed(Assessment),
    /// The document disappeared server-side mid-session
    NotFound,
}

/// Result of [`WizardSession::save_and_exit`]
#[derive(Debug)]
pub enum SaveExit {
    Saved(Assessment),
    NotFound,
}

pub struct WizardSession<'a, G: SyncGateway, D: DraftStore> {
    gateway: &'a G,
    drafts: &'a D,
    context: AssessmentContext,
    current_question: usize,
    answers: AnswerBuffer,
    is_saving: bool,
    is_renaming: bool,
}

impl<'a, G: SyncGateway, D: DraftStore> WizardSession<'a, G, D> {
    /// Fetch the document context and open a session on it.
    ///
    /// In-progress documents resume at the `answered_questions` ordinal
    /// (clamped into the sequence), so the session starts appending at the
    /// first unanswered position. The draft buffer is loaded from the
    /// store; a load failure just starts the session with an empty buffer.
    pub async fn load(
        gateway: &'a G,
        drafts: &'a D,
        assessment_id: &str,
    ) -> Result<Option<WizardSession<'a, G, D>>> {
        let Some(context) = gateway.fetch_context(assessment_id).await? else {
            return Ok(None);
        };

        let answers = match drafts.load(assessment_id).await {
            Ok(buffer) => buffer,
            Err(err) => {
                log::warn!("Failed to load draft buffer for {}: {:#}", assessment_id, err);
                AnswerBuffer::new()
            }
        };

        let total = context.questions().len();
        let current_question = if context.assessment.status == AssessmentStatus::InProgress {
            context
                .assessment
                .answered_questions
                .min(total.saturating_sub(1))
        } else {
            0
        };

        Ok(Some(Self {
            gateway,
            drafts,
            context,
            current_question,
            answers,
            is_saving: false,
            is_renaming: false,
        }))
    }

    pub fn document(&self) -> &Assessment {
        &self.context.assessment
    }

    pub fn study(&self) -> &Study {
        &self.context.study
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn total_questions(&self) -> usize {
        self.context.questions().len()
    }

    /// Navigation-position progress for the wizard header
    pub fn progress(&self) -> f64 {
        wizard_progress(self.current_question, self.total_questions())
    }

    /// The question on screen, if the sequence is non-empty
    pub fn question(&self) -> Option<&Question> {
        self.context.questions().get(self.current_question)
    }

    /// The buffered answer for the question on screen
    pub fn current_answer(&self) -> &str {
        self.answers
            .get(&self.current_question)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn on_last_question(&self) -> bool {
        let total = self.total_questions();
        total > 0 && self.current_question == total - 1
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn is_renaming(&self) -> bool {
        self.is_renaming
    }

    /// Record the answer for the question on screen.
    ///
    /// Purely local: the buffer is mutated and written through to the
    /// draft store. A store failure is logged and swallowed — the
    /// in-memory buffer remains authoritative for the session.
    pub async fn update_answer(&mut self, value: impl Into<String>) {
        self.answers.insert(self.current_question, value.into());
        if let Err(err) = self
            .drafts
            .save(&self.context.assessment.id, &self.answers)
            .await
        {
            log::warn!(
                "Failed to persist draft buffer for {}: {:#}",
                self.context.assessment.id,
                err
            );
        }
    }

    /// Step back one question, floored at the first. No remote call.
    pub fn previous(&mut self) {
        if self.current_question > 0 {
            self.current_question -= 1;
        }
    }

    /// Advance one question, or on the last question run the completion
    /// transition: persist the identity-keyed answers, then mark the
    /// document complete. The caller navigates away only on
    /// [`Advance::Completed`]; if the completion call fails the document
    /// stays in-progress with the answers already saved, so retrying is
    /// idempotent and cheap.
    pub async fn next(&mut self) -> Result<Advance> {
        if self.current_question + 1 < self.total_questions() {
            self.current_question += 1;
            return Ok(Advance::Moved);
        }

        self.is_saving = true;
        let result = self.complete().await;
        self.is_saving = false;
        result
    }

    async fn complete(&mut self) -> Result<Advance> {
        let id = self.context.assessment.id.clone();
        let map = answers::answers_by_question_id(&self.answers, self.context.questions());

        let Some(updated) = self.gateway.persist_answers(&id, map).await? else {
            return Ok(Advance::NotFound);
        };
        self.context.assessment = updated;

        let Some(completed) = self.gateway.mark_complete(&id).await? else {
            return Ok(Advance::NotFound);
        };
        self.context.assessment = completed.clone();

        log::info!("Document completed: {}", id);
        Ok(Advance::Completed(completed))
    }

    /// Persist the current answers without completing. The caller is
    /// expected to leave the wizard afterwards — this is save-and-exit,
    /// not save-in-place.
    pub async fn save_and_exit(&mut self) -> Result<SaveExit> {
        let id = self.context.assessment.id.clone();
        let map = answers::answers_by_question_id(&self.answers, self.context.questions());

        self.is_saving = true;
        let result = self.gateway.persist_answers(&id, map).await;
        self.is_saving = false;

        let Some(updated) = result? else {
            return Ok(SaveExit::NotFound);
        };
        self.context.assessment = updated.clone();

        log::info!("Document progress saved: {}", id);
        Ok(SaveExit::Saved(updated))
    }

    /// Rename the document. Independent of navigation state; an empty
    /// candidate fails locally without touching the gateway.
    pub async fn rename(&mut self, candidate: &str) -> Result<RenameOutcome> {
        self.is_renaming = true;
        let result =
            rename::rename_document(self.gateway, &self.context.assessment.id, candidate).await;
        self.is_renaming = false;

        if let Ok(RenameOutcome::Renamed(updated)) = &result {
            self.context.assessment.name = updated.name.clone();
        }
        result
    }
}
