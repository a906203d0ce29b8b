//! Source reconciliation: one-time initialization of a session's draft from
//! whichever input source wins.
//!
//! Precedence:
//! 1. edit mode: a document id AND a pre-fetched stored resume
//! 2. generated seed: a usable `data` query token
//! 3. blank template
//!
//! A malformed seed falls through to the blank template.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::draft::seed::{decode_generated_seed, SeedQuery};
use crate::models::resume::{ResumeDraft, StoredResume};

/// Title given to drafts started from the blank template.
pub const BLANK_TITLE: &str = "New Resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSource {
    Edit,
    Generated,
    Blank,
}

/// Everything a session can be initialized from.
#[derive(Debug, Clone, Default)]
pub struct DraftSources {
    pub document_id: Option<String>,
    pub stored: Option<StoredResume>,
    pub seed: SeedQuery,
}

/// A session's draft plus its one-shot initialization latch.
#[derive(Debug, Clone, Default)]
pub struct DraftState {
    pub draft: ResumeDraft,
    initialized: bool,
    source: Option<DraftSource>,
}

impl DraftState {
    /// The source that initialized the draft, once reconciliation has run.
    pub fn source(&self) -> Option<DraftSource> {
        self.source
    }

    /// Populates the draft from `sources`. Runs at most once; later calls
    /// leave the draft untouched and return `None`.
    pub fn reconcile(&mut self, sources: &DraftSources) -> Option<DraftSource> {
        if self.initialized {
            return None;
        }
        self.initialized = true;

        let (draft, source) = resolve(sources);
        info!("Draft initialized from {source:?} source");
        self.draft = draft;
        self.source = Some(source);
        Some(source)
    }
}

fn resolve(sources: &DraftSources) -> (ResumeDraft, DraftSource) {
    if let (Some(_), Some(stored)) = (&sources.document_id, &sources.stored) {
        return (ResumeDraft::from(stored.clone()), DraftSource::Edit);
    }

    if let Some(data) = sources.seed.data_token() {
        match decode_generated_seed(&sources.seed, data) {
            Ok(draft) => return (draft, DraftSource::Generated),
            Err(e) => error!("Failed to parse generated seed data: {e}"),
        }
    }

    (blank_draft(), DraftSource::Blank)
}

pub fn blank_draft() -> ResumeDraft {
    ResumeDraft {
        title: BLANK_TITLE.to_string(),
        ..ResumeDraft::default()
    }
}
