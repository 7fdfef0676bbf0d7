//! Crate-level error taxonomy.
//!
//! Benign UI races (double-started clock, invalid swap pair, undo with no
//! snapshot) are not errors at all; the API reports them as no-ops. Errors
//! here are the fatal-to-the-flow kind: missing prerequisite state, or a
//! store/roster failure the caller must see.

use thiserror::Error;

use crate::models::{MatchId, PlayerId};
use crate::sheet::SheetError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum LiveError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("no sheet recorded for match {match_id}")]
    SheetMissing { match_id: MatchId },

    #[error("no live state recorded for match {match_id}")]
    LiveMissing { match_id: MatchId },

    #[error("no active match; fill a sheet first")]
    NoActiveMatch,

    #[error("duplicate player id {id} in roster")]
    DuplicatePlayerId { id: PlayerId },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LiveError>;
