//! End-to-end wizard engine tests against a scripted gateway.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assess_cli::api::SyncGateway;
use assess_cli::api::models::{
    Assessment, AssessmentContext, AssessmentStatus, Question, QuestionPool, Study,
};
use assess_cli::config::Config;
use assess_cli::wizard::{
    self, Advance, AnswerBuffer, DraftStore, RenameOutcome, SaveExit, WizardSession,
};

fn question(ordinal: usize) -> Question {
    Question {
        id: format!("q-{}", ordinal),
        text: format!("Question {}", ordinal),
        domain: "Safety".to_string(),
        risk_type: "Operational".to_string(),
        iso_reference: "ISO 14971".to_string(),
    }
}

fn study() -> Study {
    Study {
        id: "study-1".to_string(),
        name: "Phase II oncology study".to_string(),
        phase: "Phase II".to_string(),
        therapeutic_area: "Oncology".to_string(),
        study_question: "Is the dose tolerable?".to_string(),
        pool_id: "pool-1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn context(total: usize, answered: usize, status: AssessmentStatus) -> AssessmentContext {
    let questions: Vec<Question> = (0..total).map(question).collect();
    AssessmentContext {
        assessment: Assessment {
            id: "doc-1".to_string(),
            study_id: "study-1".to_string(),
            name: "Risk assessment".to_string(),
            progress: 0,
            total_questions: total,
            answered_questions: answered,
            status,
            answers: HashMap::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        study: study(),
        pool: QuestionPool {
            id: "pool-1".to_string(),
            name: "Oncology pool".to_string(),
            source: "import".to_string(),
            question_count: total,
            questions,
        },
    }
}

/// Scripted gateway that records the order of remote calls
#[derive(Default)]
struct MockGateway {
    context: Mutex<Option<AssessmentContext>>,
    calls: Mutex<Vec<&'static str>>,
    fail_complete: AtomicBool,
    vanished: AtomicBool,
    creates: AtomicUsize,
}

impl MockGateway {
    fn with_context(context: AssessmentContext) -> Self {
        Self {
            context: Mutex::new(Some(context)),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn stored(&self) -> Assessment {
        self.context.lock().unwrap().as_ref().unwrap().assessment.clone()
    }
}

#[async_trait]
impl SyncGateway for MockGateway {
    async fn fetch_context(&self, _id: &str) -> Result<Option<AssessmentContext>> {
        self.calls.lock().unwrap().push("fetch_context");
        Ok(self.context.lock().unwrap().clone())
    }

    async fn create_document(&self, study_id: &str, _name: Option<String>) -> Result<Assessment> {
        self.calls.lock().unwrap().push("create_document");
        self.creates.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut created = context(3, 0, AssessmentStatus::InProgress).assessment;
        created.id = "doc-42".to_string();
        created.study_id = study_id.to_string();
        Ok(created)
    }

    async fn persist_answers(
        &self,
        _id: &str,
        answers: HashMap<String, String>,
    ) -> Result<Option<Assessment>> {
        self.calls.lock().unwrap().push("persist_answers");
        if self.vanished.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let mut context = self.context.lock().unwrap();
        let context = context.as_mut().unwrap();
        context.assessment.answers.extend(answers);
        context.assessment.answered_questions = context.assessment.answers.len();
        Ok(Some(context.assessment.clone()))
    }

    async fn mark_complete(&self, _id: &str) -> Result<Option<Assessment>> {
        self.calls.lock().unwrap().push("mark_complete");
        if self.fail_complete.load(Ordering::SeqCst) {
            return Err(anyhow!("backend unreachable"));
        }
        if self.vanished.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let mut context = self.context.lock().unwrap();
        let context = context.as_mut().unwrap();
        context.assessment.status = AssessmentStatus::Completed;
        context.assessment.progress = 100;
        Ok(Some(context.assessment.clone()))
    }

    async fn rename(&self, _id: &str, new_name: &str) -> Result<Option<Assessment>> {
        self.calls.lock().unwrap().push("rename");
        if self.vanished.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let mut context = self.context.lock().unwrap();
        let context = context.as_mut().unwrap();
        context.assessment.name = new_name.to_string();
        Ok(Some(context.assessment.clone()))
    }
}

/// Draft store whose writes always fail
struct FailingDrafts;

#[async_trait]
impl DraftStore for FailingDrafts {
    async fn load(&self, _assessment_id: &str) -> Result<AnswerBuffer> {
        Ok(AnswerBuffer::new())
    }

    async fn save(&self, _assessment_id: &str, _buffer: &AnswerBuffer) -> Result<()> {
        Err(anyhow!("storage quota exceeded"))
    }

    async fn clear(&self, _assessment_id: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn resumes_at_first_unanswered_position() {
    let gateway = MockGateway::with_context(context(3, 1, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.current_question(), 1);
    assert_eq!(session.total_questions(), 3);
    assert_eq!(session.question().unwrap().id, "q-1");
}

#[tokio::test]
async fn completed_document_opens_at_the_start() {
    let gateway = MockGateway::with_context(context(3, 3, AssessmentStatus::Completed));
    let drafts = Config::new_test().await.unwrap();

    let session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.current_question(), 0);
}

#[tokio::test]
async fn missing_document_loads_as_none() {
    let gateway = MockGateway::default();
    let drafts = Config::new_test().await.unwrap();

    assert!(WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn finishing_persists_then_completes_in_order() {
    let gateway = MockGateway::with_context(context(2, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    session.update_answer("tolerable").await;
    assert!(matches!(session.next().await.unwrap(), Advance::Moved));

    session.update_answer("monitor weekly").await;
    assert!(session.on_last_question());
    let outcome = session.next().await.unwrap();

    let Advance::Completed(document) = outcome else {
        panic!("expected completion, got {:?}", outcome);
    };
    assert_eq!(document.status, AssessmentStatus::Completed);
    assert_eq!(
        gateway.calls(),
        vec!["fetch_context", "persist_answers", "mark_complete"]
    );

    let stored = gateway.stored();
    assert_eq!(stored.answers["q-0"], "tolerable");
    assert_eq!(stored.answers["q-1"], "monitor weekly");
}

#[tokio::test]
async fn failed_completion_leaves_answers_saved_and_in_progress() {
    let gateway = MockGateway::with_context(context(1, 0, AssessmentStatus::InProgress));
    gateway.fail_complete.store(true, Ordering::SeqCst);
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    session.update_answer("tolerable").await;
    assert!(session.next().await.is_err());

    // Answers went out before the completion call failed
    assert_eq!(
        gateway.calls(),
        vec!["fetch_context", "persist_answers", "mark_complete"]
    );
    let stored = gateway.stored();
    assert_eq!(stored.status, AssessmentStatus::InProgress);
    assert_eq!(stored.answers["q-0"], "tolerable");

    // Retrying completion is cheap and idempotent
    gateway.fail_complete.store(false, Ordering::SeqCst);
    assert!(matches!(
        session.next().await.unwrap(),
        Advance::Completed(_)
    ));
    assert_eq!(gateway.stored().status, AssessmentStatus::Completed);
}

#[tokio::test]
async fn save_and_exit_saves_without_completing() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    session.update_answer("tolerable").await;
    let outcome = session.save_and_exit().await.unwrap();

    assert!(matches!(outcome, SaveExit::Saved(_)));
    assert_eq!(gateway.calls(), vec!["fetch_context", "persist_answers"]);
    assert_eq!(gateway.stored().status, AssessmentStatus::InProgress);
    assert_eq!(gateway.stored().answers["q-0"], "tolerable");
}

#[tokio::test]
async fn vanished_document_reports_not_found_on_save() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    gateway.vanished.store(true, Ordering::SeqCst);
    assert!(matches!(
        session.save_and_exit().await.unwrap(),
        SaveExit::NotFound
    ));
}

#[tokio::test]
async fn blank_rename_never_reaches_the_gateway() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    let outcome = session.rename("   ").await.unwrap();

    assert!(matches!(outcome, RenameOutcome::EmptyName));
    assert!(!gateway.calls().contains(&"rename"));
}

#[tokio::test]
async fn rename_updates_the_displayed_name() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    let outcome = session.rename("  Final report  ").await.unwrap();

    assert!(matches!(outcome, RenameOutcome::Renamed(_)));
    assert_eq!(session.document().name, "Final report");
}

#[tokio::test]
async fn answers_are_buffered_through_the_draft_store() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));
    let drafts = Config::new_test().await.unwrap();

    let mut session = WizardSession::load(&gateway, &drafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    session.update_answer("tolerable").await;
    assert!(matches!(session.next().await.unwrap(), Advance::Moved));
    session.update_answer("monitor weekly").await;

    let buffer = drafts.load_draft("doc-1").await.unwrap();
    assert_eq!(buffer[&0], "tolerable");
    assert_eq!(buffer[&1], "monitor weekly");
}

#[tokio::test]
async fn draft_store_failure_leaves_the_session_authoritative() {
    let gateway = MockGateway::with_context(context(3, 0, AssessmentStatus::InProgress));

    let mut session = WizardSession::load(&gateway, &FailingDrafts, "doc-1")
        .await
        .unwrap()
        .unwrap();

    session.update_answer("tolerable").await;
    assert_eq!(session.current_answer(), "tolerable");
}

#[tokio::test]
async fn drafts_survive_a_fresh_process() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");

    let buffer: AnswerBuffer = [(0, "a".to_string())].into();
    {
        let config = Config::load_at(&db_path).await.unwrap();
        config.save_draft("doc-1", &buffer).await.unwrap();
    }

    let reopened = Config::load_at(&db_path).await.unwrap();
    assert_eq!(reopened.load_draft("doc-1").await.unwrap(), buffer);
}

#[tokio::test]
async fn concurrent_creation_is_deduplicated() {
    let gateway = Arc::new(MockGateway::with_context(context(
        3,
        0,
        AssessmentStatus::InProgress,
    )));

    let first = wizard::get_or_create_document(gateway.clone(), "study-dedup", None);
    let second = wizard::get_or_create_document(gateway.clone(), "study-dedup", None);
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap(), "doc-42");
    assert_eq!(second.unwrap(), "doc-42");
    assert_eq!(gateway.creates.load(Ordering::SeqCst), 1);

    // A later creation is a fresh flight
    let third = wizard::get_or_create_document(gateway.clone(), "study-dedup", None)
        .await
        .unwrap();
    assert_eq!(third, "doc-42");
    assert_eq!(gateway.creates.load(Ordering::SeqCst), 2);
}
