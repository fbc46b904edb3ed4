//! Questionnaire wizard engine
//!
//! Walks a user through an assessment document's question sequence:
//! position-indexed answer buffering with local persistence, progress
//! calculation, deduplicated document creation, and the save / complete /
//! rename transitions against the backend.

pub mod answers;
pub mod create;
pub mod draft;
pub mod progress;
pub mod rename;
pub mod session;

pub use answers::{AnswerBuffer, answers_by_question_id};
pub use create::{CreateGuard, create_guard, get_or_create_document};
pub use draft::DraftStore;
pub use progress::wizard_progress;
pub use rename::{DocumentRoster, RenameOutcome, rename_document};
pub use session::{Advance, SaveExit, WizardSession};
