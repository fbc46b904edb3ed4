//! Durable local store for draft answer buffers.

use super::answers::AnswerBuffer;
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;

/// Key-value store for draft answer buffers, namespaced by assessment id.
///
/// The session swallows and logs store failures — the in-memory buffer
/// stays authoritative for the rest of the session — so implementations
/// only need best-effort durability. The trait exists so tests can
/// substitute an in-memory map or a deliberately failing store.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Stored buffer for an assessment; empty buffer if none stored
    async fn load(&self, assessment_id: &str) -> Result<AnswerBuffer>;

    /// Replace the stored buffer. Last write wins per assessment id.
    async fn save(&self, assessment_id: &str, buffer: &AnswerBuffer) -> Result<()>;

    /// Drop the stored buffer
    async fn clear(&self, assessment_id: &str) -> Result<()>;
}

#[async_trait]
impl DraftStore for Config {
    async fn load(&self, assessment_id: &str) -> Result<AnswerBuffer> {
        self.load_draft(assessment_id).await
    }

    async fn save(&self, assessment_id: &str, buffer: &AnswerBuffer) -> Result<()> {
        self.save_draft(assessment_id, buffer).await
    }

    async fn clear(&self, assessment_id: &str) -> Result<()> {
        self.clear_draft(assessment_id).await
    }
}
