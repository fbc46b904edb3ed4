//! Data models for the assessment platform API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A study (project) that assessment documents belong to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: String,
    pub name: String,
    pub phase: String,
    pub therapeutic_area: String,
    pub study_question: String,
    pub pool_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The ordered, named set of questions a document is bound to at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPool {
    pub id: String,
    pub name: String,
    pub source: String,
    pub question_count: usize,
    pub questions: Vec<Question>,
}

/// A single question. Owned by a pool; documents reference it by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub domain: String,
    pub risk_type: String,
    pub iso_reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

/// One run of answering a pool's question sequence for a study.
///
/// `answered_questions` and `progress` are derived from `answers` — the
/// client recomputes them on every sync rather than trusting stale server
/// state beyond display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub study_id: String,
    pub name: String,
    pub progress: u32,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub status: AssessmentStatus,
    pub answers: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new assessment document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCreate {
    pub study_id: String,
    pub name: String,
    pub progress: u32,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub status: AssessmentStatus,
    pub answers: HashMap<String, String>,
}

/// Partial update for an assessment document; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_questions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssessmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<HashMap<String, String>>,
}

/// Everything the wizard needs for one document: the document itself, its
/// study, and the bound question pool
#[derive(Debug, Clone)]
pub struct AssessmentContext {
    pub assessment: Assessment,
    pub study: Study,
    pub pool: QuestionPool,
}

impl AssessmentContext {
    /// The question sequence the wizard walks
    pub fn questions(&self) -> &[Question] {
        &self.pool.questions
    }
}
