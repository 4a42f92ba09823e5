//! Sync pipeline: plan which matches to fetch, fetch them through the rate
//! governed client, persist them atomically, and report what happened.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use matchvault_shared::errors::ApiError;

pub mod coordinator;
pub mod planner;

pub use coordinator::{SyncCoordinator, SyncRequest};
pub use planner::SyncPlanner;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to resolve player {game_name}#{tag_line}: {source}")]
    Identity {
        game_name: String,
        tag_line: String,
        source: ApiError,
    },

    #[error("failed to list match ids: {0}")]
    Listing(ApiError),

    #[error("local store rejected a write: {0}")]
    Store(matchvault_shared::traits::StoreError),

    #[error("sync did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Why one match of the work list failed. Fetch failures carry over the API
/// taxonomy; store failures map to `Persistence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Transient,
    NotFound,
    Decode,
    Persistence,
}

impl From<&ApiError> for FailureKind {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::RateLimited { .. } => FailureKind::RateLimited,
            ApiError::Transient { .. } | ApiError::UnexpectedStatus(_) => FailureKind::Transient,
            ApiError::NotFound => FailureKind::NotFound,
            ApiError::Decode(_) => FailureKind::Decode,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::RateLimited => "rate limited",
            FailureKind::Transient => "transient",
            FailureKind::NotFound => "not found",
            FailureKind::Decode => "decode failure",
            FailureKind::Persistence => "persistence failure",
        };
        f.write_str(s)
    }
}

/// A work-list entry that could not be fetched or stored.
#[derive(Debug, Clone)]
pub struct FailedMatch {
    pub match_id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FailedMatch {
    fn from_api(match_id: &str, err: &ApiError) -> Self {
        Self {
            match_id: match_id.to_string(),
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

/// What one sync call did: every requested match id is accounted for as
/// fetched, skipped by the planner, or failed with its failure kind.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: Vec<FailedMatch>,
}
