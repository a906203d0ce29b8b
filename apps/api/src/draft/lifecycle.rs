//! Draft lifecycle: submission of a draft to the resume store.
//!
//! Order of operations on submit:
//! 1. guest sessions are turned away with a login prompt (draft kept)
//! 2. the single-flight latch is taken; a concurrent submit is rejected
//! 3. a session that already saved is turned away
//! 4. the payload is built and dispatched as update (document id) or create
//! 5. on success the session is marked submitted before the latch is released
//! 6. the latch is released whatever the outcome

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::draft::payload::build_payload;
use crate::models::resume::ResumeDraft;
use crate::resume_client::{ResumeStore, TransportError};

/// Authorization collaborator consulted before any write.
pub trait AuthProvider: Send + Sync {
    fn is_guest(&self) -> bool;

    /// Asks the front end to show its login prompt.
    fn request_login(&self);
}

/// Where a submission goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTarget {
    pub space_id: String,
    pub document_id: Option<String>,
}

impl SubmitTarget {
    /// Resume list of the space; where the editor navigates after leaving.
    pub fn list_path(&self) -> String {
        format!("/space/{}/resume/resumes", self.space_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved { mode: SaveMode, redirect_to: String },
    /// Guest session: nothing was sent, a login prompt was requested.
    LoginRequired,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    InFlight,

    #[error("This draft has already been saved")]
    AlreadySubmitted,

    #[error("Failed to save resume: {0}")]
    Transport(#[from] TransportError),
}

/// Owns the submission latch of one editing session.
#[derive(Debug, Default)]
pub struct LifecycleController {
    saving: AtomicBool,
    submitted: AtomicBool,
}

/// Releases the submission latch on drop.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LifecycleController {
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<SavingGuard<'_>> {
        self.saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SavingGuard(&self.saving))
    }

    pub async fn submit(
        &self,
        auth: &dyn AuthProvider,
        store: &dyn ResumeStore,
        target: &SubmitTarget,
        draft: &ResumeDraft,
    ) -> Result<SubmitOutcome, SubmitError> {
        if auth.is_guest() {
            info!("Guest submission withheld for space {}", target.space_id);
            auth.request_login();
            return Ok(SubmitOutcome::LoginRequired);
        }

        let Some(_guard) = self.try_begin() else {
            warn!("Rejected concurrent submission for space {}", target.space_id);
            return Err(SubmitError::InFlight);
        };

        if self.is_submitted() {
            warn!("Rejected resubmission for space {}", target.space_id);
            return Err(SubmitError::AlreadySubmitted);
        }

        let payload = build_payload(draft);
        let result = match &target.document_id {
            Some(id) => store
                .update(&target.space_id, id, &payload)
                .await
                .map(|_| SaveMode::Updated),
            None => store
                .create(&target.space_id, &payload)
                .await
                .map(|_| SaveMode::Created),
        };

        match result {
            Ok(mode) => {
                self.submitted.store(true, Ordering::Release);
                info!("Resume {mode:?} in space {}", target.space_id);
                Ok(SubmitOutcome::Saved {
                    mode,
                    redirect_to: target.list_path(),
                })
            }
            Err(e) => {
                error!("Failed to save resume in space {}: {e}", target.space_id);
                Err(SubmitError::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::models::resume::{Career, ResumePayload};

    #[derive(Default)]
    struct StubAuth {
        guest: bool,
        prompted: AtomicBool,
    }

    impl AuthProvider for StubAuth {
        fn is_guest(&self) -> bool {
            self.guest
        }

        fn request_login(&self) {
            self.prompted.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(String),
        Update(String, String),
    }

    /// Records calls; optionally fails, optionally parks until released.
    #[derive(Default)]
    struct StubStore {
        fail: bool,
        block: bool,
        entered: Notify,
        release: Notify,
        calls: Mutex<Vec<Call>>,
        payloads: Mutex<Vec<ResumePayload>>,
    }

    impl StubStore {
        async fn finish(&self, call: Call, payload: &ResumePayload) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push(call);
            self.payloads.lock().unwrap().push(payload.clone());
            if self.block {
                self.entered.notify_one();
                self.release.notified().await;
            }
            if self.fail {
                return Err(TransportError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResumeStore for StubStore {
        async fn create(&self, space_id: &str, payload: &ResumePayload) -> Result<(), TransportError> {
            self.finish(Call::Create(space_id.into()), payload).await
        }

        async fn update(
            &self,
            space_id: &str,
            resume_id: &str,
            payload: &ResumePayload,
        ) -> Result<(), TransportError> {
            self.finish(Call::Update(space_id.into(), resume_id.into()), payload)
                .await
        }
    }

    fn target(id: Option<&str>) -> SubmitTarget {
        SubmitTarget {
            space_id: "s1".into(),
            document_id: id.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_without_document_id() {
        let store = StubStore::default();
        let controller = LifecycleController::default();
        let outcome = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Saved {
                mode: SaveMode::Created,
                redirect_to: "/space/s1/resume/resumes".into(),
            }
        );
        assert_eq!(*store.calls.lock().unwrap(), vec![Call::Create("s1".into())]);
        assert!(!controller.is_saving());
    }

    #[tokio::test]
    async fn test_update_with_document_id() {
        let store = StubStore::default();
        let controller = LifecycleController::default();
        let outcome = controller
            .submit(&StubAuth::default(), &store, &target(Some("9")), &ResumeDraft::default())
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved { mode: SaveMode::Updated, .. }));
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec![Call::Update("s1".into(), "9".into())]
        );
    }

    #[tokio::test]
    async fn test_submitted_payload_is_normalized() {
        let store = StubStore::default();
        let draft = ResumeDraft {
            careers: vec![Career {
                start_date: "2304".into(),
                end_date: "bogus".into(),
                ..Career::default()
            }],
            ..ResumeDraft::default()
        };
        LifecycleController::default()
            .submit(&StubAuth::default(), &store, &target(None), &draft)
            .await
            .unwrap();
        let payloads = store.payloads.lock().unwrap();
        assert_eq!(payloads[0].careers[0].start_date, "2023-04-01");
        assert_eq!(payloads[0].careers[0].end_date, "");
    }

    #[tokio::test]
    async fn test_guest_is_prompted_and_nothing_is_sent() {
        let store = StubStore::default();
        let auth = StubAuth {
            guest: true,
            ..StubAuth::default()
        };
        let outcome = LifecycleController::default()
            .submit(&auth, &store, &target(None), &ResumeDraft::default())
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::LoginRequired);
        assert!(auth.prompted.load(Ordering::SeqCst));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_releases_latch() {
        let store = StubStore {
            fail: true,
            ..StubStore::default()
        };
        let controller = LifecycleController::default();
        let err = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Transport(TransportError::Api { status: 503, .. })));
        assert!(!controller.is_saving());

        // user-initiated retry goes through again
        let err = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(store.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected() {
        let store = Arc::new(StubStore {
            block: true,
            ..StubStore::default()
        });
        let controller = Arc::new(LifecycleController::default());

        let first = {
            let store = store.clone();
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit(&StubAuth::default(), &*store, &target(None), &ResumeDraft::default())
                    .await
            })
        };

        store.entered.notified().await;
        assert!(controller.is_saving());

        let second = controller
            .submit(&StubAuth::default(), &*store, &target(None), &ResumeDraft::default())
            .await;
        assert!(matches!(second, Err(SubmitError::InFlight)));
        assert_eq!(store.calls.lock().unwrap().len(), 1);

        store.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, SubmitOutcome::Saved { .. }));
        assert!(!controller.is_saving());
    }

    #[tokio::test]
    async fn test_resubmit_after_success_is_rejected() {
        let store = StubStore::default();
        let controller = LifecycleController::default();
        let first = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await
            .unwrap();
        assert!(matches!(first, SubmitOutcome::Saved { mode: SaveMode::Created, .. }));
        assert!(controller.is_submitted());

        let second = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await;
        assert!(matches!(second, Err(SubmitError::AlreadySubmitted)));
        assert_eq!(store.calls.lock().unwrap().len(), 1);
        assert!(!controller.is_saving());
    }

    #[tokio::test]
    async fn test_failed_submit_does_not_mark_submitted() {
        let store = StubStore {
            fail: true,
            ..StubStore::default()
        };
        let controller = LifecycleController::default();
        let _ = controller
            .submit(&StubAuth::default(), &store, &target(None), &ResumeDraft::default())
            .await;
        assert!(!controller.is_submitted());
    }
}
