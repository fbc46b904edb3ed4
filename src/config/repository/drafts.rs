//! Repository for draft answer buffers.
//!
//! One row per buffered answer, keyed by (assessment id, ordinal position).
//! A save replaces the whole buffer for that assessment inside a
//! transaction, so the store is last-write-wins per assessment id and
//! buffers for different assessments never interfere.

use crate::wizard::answers::AnswerBuffer;
use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Replace the stored buffer for an assessment
pub async fn save(pool: &SqlitePool, assessment_id: &str, buffer: &AnswerBuffer) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin draft transaction")?;

    sqlx::query("DELETE FROM drafts WHERE assessment_id = ?")
        .bind(assessment_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to clear draft rows for '{}'", assessment_id))?;

    for (position, value) in buffer {
        sqlx::query("INSERT INTO drafts (assessment_id, position, value) VALUES (?, ?, ?)")
            .bind(assessment_id)
            .bind(*position as i64)
            .bind(value)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to save draft answer at position {} for '{}'",
                    position, assessment_id
                )
            })?;
    }

    tx.commit()
        .await
        .with_context(|| format!("Failed to commit draft buffer for '{}'", assessment_id))?;

    log::debug!("Saved draft buffer for assessment: {}", assessment_id);
    Ok(())
}

/// Stored buffer for an assessment; empty if nothing was ever saved
pub async fn load(pool: &SqlitePool, assessment_id: &str) -> Result<AnswerBuffer> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT position, value FROM drafts WHERE assessment_id = ? ORDER BY position")
            .bind(assessment_id)
            .fetch_all(pool)
            .await
            .with_context(|| format!("Failed to load draft buffer for '{}'", assessment_id))?;

    Ok(rows
        .into_iter()
        .map(|(position, value)| (position as usize, value))
        .collect())
}

/// Drop the stored buffer for an assessment
pub async fn clear(pool: &SqlitePool, assessment_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM drafts WHERE assessment_id = ?")
        .bind(assessment_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to clear draft buffer for '{}'", assessment_id))?;

    if result.rows_affected() > 0 {
        log::debug!("Cleared draft buffer for assessment: {}", assessment_id);
    }

    Ok(())
}
