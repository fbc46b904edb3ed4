//! Deduplicated creation of assessment documents.
//!
//! A creation trigger can fire more than once for the same study before the
//! first request resolves (double navigation, a repeated key press before
//! the prompt locks). The guard keys in-flight creations by study id so
//! every concurrent caller awaits the same request and exactly one document
//! is created per logical user action. The registry is process-lifetime
//! state, not cross-process.

use crate::api::SyncGateway;
use anyhow::{Result, anyhow};
use futures::FutureExt;
use futures::future::Shared;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type SharedCreate = Shared<Pin<Box<dyn Future<Output = Result<String, Arc<anyhow::Error>>> + Send>>>;

/// In-flight creation registry keyed by study id
pub struct CreateGuard {
    in_flight: Mutex<HashMap<String, (u64, SharedCreate)>>,
    next_flight: AtomicU64,
}

impl CreateGuard {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
            next_flight: AtomicU64::new(0),
        }
    }

    /// Await the in-flight creation for `study_id`, starting one via
    /// `factory` if none is registered.
    ///
    /// `factory` runs exactly once per flight; a rejection reaches every
    /// waiter. Once the flight settles its registration is cleared, so a
    /// later legitimate creation starts fresh.
    pub async fn get_or_create<F, Fut>(&self, study_id: &str, factory: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let (flight, future) = {
            let mut in_flight = self.in_flight.lock().expect("create guard lock poisoned");
            match in_flight.get(study_id) {
                Some((flight, future)) => (*flight, future.clone()),
                None => {
                    let flight = self.next_flight.fetch_add(1, Ordering::Relaxed);
                    let create = factory();
                    let future: SharedCreate =
                        async move { create.await.map_err(Arc::new) }.boxed().shared();
                    in_flight.insert(study_id.to_string(), (flight, future.clone()));
                    (flight, future)
                }
            }
        };

        let result = future.await;

        // Clear the registration, but only if it is still this flight's:
        // another waiter may already have cleared it and a newer flight
        // re-registered the same study id.
        {
            let mut in_flight = self.in_flight.lock().expect("create guard lock poisoned");
            if in_flight.get(study_id).map(|(f, _)| *f) == Some(flight) {
                in_flight.remove(study_id);
            }
        }

        result.map_err(|err| anyhow!("{err:#}"))
    }
}

impl Default for CreateGuard {
    fn default() -> Self {
        Self::new()
    }
}

static CREATE_GUARD: Lazy<CreateGuard> = Lazy::new(CreateGuard::new);

/// Process-wide guard coordinating creation across independent call sites
pub fn create_guard() -> &'static CreateGuard {
    &CREATE_GUARD
}

/// Create a document for `study_id`, or join the creation already in
/// flight for it. Resolves to the document id.
pub async fn get_or_create_document(
    gateway: Arc<dyn SyncGateway>,
    study_id: &str,
    name: Option<String>,
) -> Result<String> {
    let study = study_id.to_string();
    create_guard()
        .get_or_create(study_id, move || async move {
            log::info!("Creating document for study: {}", study);
            let document = gateway.create_document(&study, name).await?;

            if document.id.is_empty() {
                log::error!("Document created but missing id (study: {})", study);
                return Err(anyhow!("Invalid response from server"));
            }

            log::info!("New document created: {} (study: {})", document.id, study);
            Ok(document.id)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_calls_share_one_factory_invocation() {
        let guard = CreateGuard::new();
        let invocations = Arc::new(AtomicUsize::new(0));

        let make_factory = |invocations: Arc<AtomicUsize>| {
            move || async move {
                invocations.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok("doc-42".to_string())
            }
        };

        let (first, second) = tokio::join!(
            guard.get_or_create("study-1", make_factory(invocations.clone())),
            guard.get_or_create("study-1", make_factory(invocations.clone())),
        );

        assert_eq!(first.unwrap(), "doc-42");
        assert_eq!(second.unwrap(), "doc-42");
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn registration_is_cleared_after_settle() {
        let guard = CreateGuard::new();
        let invocations = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let invocations = invocations.clone();
            let id = guard
                .get_or_create("study-1", move || async move {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    Ok("doc-42".to_string())
                })
                .await
                .unwrap();
            assert_eq!(id, "doc-42");
        }

        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_study_ids_do_not_share_a_flight() {
        let guard = CreateGuard::new();
        let invocations = Arc::new(AtomicUsize::new(0));

        let make_factory = |invocations: Arc<AtomicUsize>, id: &'static str| {
            move || async move {
                invocations.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(id.to_string())
            }
        };

        let (first, second) = tokio::join!(
            guard.get_or_create("study-1", make_factory(invocations.clone(), "doc-1")),
            guard.get_or_create("study-2", make_factory(invocations.clone(), "doc-2")),
        );

        assert_eq!(first.unwrap(), "doc-1");
        assert_eq!(second.unwrap(), "doc-2");
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejection_reaches_every_waiter() {
        let guard = CreateGuard::new();

        let factory = || async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(anyhow!("backend unreachable"))
        };

        let (first, second) = tokio::join!(
            guard.get_or_create("study-1", factory),
            guard.get_or_create("study-1", factory),
        );

        assert!(first.unwrap_err().to_string().contains("backend unreachable"));
        assert!(second.unwrap_err().to_string().contains("backend unreachable"));

        // A fresh creation after the failure is not blocked
        let id = guard
            .get_or_create("study-1", || async { Ok("doc-43".to_string()) })
            .await
            .unwrap();
        assert_eq!(id, "doc-43");
    }
}
