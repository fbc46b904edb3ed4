use super::constants::{self, collections};
use super::models::{
    Assessment, AssessmentContext, AssessmentCreate, AssessmentPatch, AssessmentStatus,
    QuestionPool, Study,
};
use anyhow::{Context as _, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// The remote operations the wizard engine is written against.
///
/// `Ok(None)` means the record does not exist server-side, distinct from a
/// transport failure. Implemented by [`AssessmentApi`] for the real backend
/// and by test doubles in the engine's tests.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Fetch a document together with its study and bound question pool
    async fn fetch_context(&self, assessment_id: &str) -> Result<Option<AssessmentContext>>;

    /// Create a document for a study. Not idempotent at the transport
    /// level; callers go through the creation guard.
    async fn create_document(&self, study_id: &str, name: Option<String>) -> Result<Assessment>;

    /// Sync the identity-keyed answers, recomputing the derived counts
    async fn persist_answers(
        &self,
        assessment_id: &str,
        answers: HashMap<String, String>,
    ) -> Result<Option<Assessment>>;

    /// Transition the document to completed
    async fn mark_complete(&self, assessment_id: &str) -> Result<Option<Assessment>>;

    /// Change the document's display name
    async fn rename(&self, assessment_id: &str, new_name: &str) -> Result<Option<Assessment>>;
}

/// HTTP client for the assessment platform with connection pooling
#[derive(Clone)]
pub struct AssessmentApi {
    base_url: String,
    http_client: reqwest::Client,
}

impl AssessmentApi {
    pub fn new(base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("assess-cli/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url,
            http_client,
        }
    }

    /// GET a single record; 404 maps to `Ok(None)`
    async fn get_record<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("Request to {} failed with status {}", url, response.status());
        }

        let record = response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))?;
        Ok(Some(record))
    }

    /// GET a collection; any non-success status is an error
    async fn get_collection<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            bail!("Request to {} failed with status {}", url, response.status());
        }

        response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    /// PUT a partial update to a document; 404 maps to `Ok(None)`
    async fn put_document(&self, id: &str, patch: &AssessmentPatch) -> Result<Option<Assessment>> {
        let url = constants::record_endpoint(&self.base_url, collections::ASSESSMENTS, id);
        let response = self
            .http_client
            .put(&url)
            .json(patch)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("Request to {} failed with status {}", url, response.status());
        }

        let updated = response
            .json::<Assessment>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))?;
        Ok(Some(updated))
    }

    pub async fn list_studies(&self) -> Result<Vec<Study>> {
        let url = constants::collection_endpoint(&self.base_url, collections::STUDIES);
        self.get_collection(&url).await
    }

    pub async fn get_study(&self, study_id: &str) -> Result<Option<Study>> {
        let url = constants::record_endpoint(&self.base_url, collections::STUDIES, study_id);
        self.get_record(&url).await
    }

    pub async fn get_question_pool(&self, pool_id: &str) -> Result<Option<QuestionPool>> {
        let url = constants::record_endpoint(&self.base_url, collections::QUESTION_POOLS, pool_id);
        self.get_record(&url).await
    }

    pub async fn get_document(&self, assessment_id: &str) -> Result<Option<Assessment>> {
        let url = constants::record_endpoint(&self.base_url, collections::ASSESSMENTS, assessment_id);
        self.get_record(&url).await
    }

    pub async fn list_documents(&self, study_id: &str) -> Result<Vec<Assessment>> {
        let url = format!(
            "{}?studyId={}",
            constants::collection_endpoint(&self.base_url, collections::ASSESSMENTS),
            study_id
        );
        self.get_collection(&url).await
    }
}

#[async_trait]
impl SyncGateway for AssessmentApi {
    async fn fetch_context(&self, assessment_id: &str) -> Result<Option<AssessmentContext>> {
        let Some(assessment) = self.get_document(assessment_id).await? else {
            return Ok(None);
        };
        let Some(study) = self.get_study(&assessment.study_id).await? else {
            return Ok(None);
        };
        let Some(pool) = self.get_question_pool(&study.pool_id).await? else {
            return Ok(None);
        };
        Ok(Some(AssessmentContext {
            assessment,
            study,
            pool,
        }))
    }

    async fn create_document(&self, study_id: &str, name: Option<String>) -> Result<Assessment> {
        let study = self
            .get_study(study_id)
            .await?
            .ok_or_else(|| anyhow!("Study '{}' not found", study_id))?;
        let total_questions = self
            .get_question_pool(&study.pool_id)
            .await?
            .map(|pool| pool.question_count)
            .unwrap_or(0);

        let payload = AssessmentCreate {
            study_id: study_id.to_string(),
            name: name
                .unwrap_or_else(|| format!("Assessment {}", Utc::now().timestamp_millis())),
            progress: 0,
            total_questions,
            answered_questions: 0,
            status: AssessmentStatus::InProgress,
            answers: HashMap::new(),
        };

        let url = constants::collection_endpoint(&self.base_url, collections::ASSESSMENTS);
        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            bail!("Request to {} failed with status {}", url, response.status());
        }

        response
            .json::<Assessment>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    async fn persist_answers(
        &self,
        assessment_id: &str,
        answers: HashMap<String, String>,
    ) -> Result<Option<Assessment>> {
        let Some(current) = self.get_document(assessment_id).await? else {
            return Ok(None);
        };

        // Merge over the stored map: answers for question ids no longer in
        // the current sequence survive template edits.
        let mut merged = current.answers;
        merged.extend(answers);

        let answered_questions = merged.len();
        let progress = if current.total_questions == 0 {
            0
        } else {
            ((answered_questions as f64 / current.total_questions as f64) * 100.0).round() as u32
        };

        let patch = AssessmentPatch {
            answers: Some(merged),
            answered_questions: Some(answered_questions),
            progress: Some(progress),
            ..Default::default()
        };
        self.put_document(assessment_id, &patch).await
    }

    async fn mark_complete(&self, assessment_id: &str) -> Result<Option<Assessment>> {
        let patch = AssessmentPatch {
            status: Some(AssessmentStatus::Completed),
            progress: Some(100),
            ..Default::default()
        };
        self.put_document(assessment_id, &patch).await
    }

    async fn rename(&self, assessment_id: &str, new_name: &str) -> Result<Option<Assessment>> {
        let patch = AssessmentPatch {
            name: Some(new_name.to_string()),
            ..Default::default()
        };
        self.put_document(assessment_id, &patch).await
    }
}
