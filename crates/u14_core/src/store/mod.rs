//! Persistence collaborator: durable storage for match documents.
//!
//! The core writes through after every mutation and never continues silently
//! on a failed write, so store errors propagate to the caller.

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{LiveMatch, MatchId};
use crate::sheet::MatchSheet;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid match id: {0}")]
    InvalidMatchId(MatchId),
}

/// The full persisted record for one match id: the sheet plus, once live
/// tracking has started, the live state.
///
/// Both halves are optional on disk. A document from an earlier schema may
/// carry a sheet and no live state; the session rebuilds the live state from
/// the sheet instead of treating that as corruption.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    #[serde(default)]
    pub sheet: Option<MatchSheet>,
    #[serde(default)]
    pub live: Option<LiveMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Keyed document store. Saving a document also moves the last-known-match
/// pointer, so a fresh session can resume the most recent match.
pub trait MatchStore {
    fn save(&mut self, match_id: MatchId, doc: &MatchDocument) -> Result<(), StoreError>;

    /// Returns the stored document, or `None` when nothing (readable) is
    /// stored under this id.
    fn load(&self, match_id: MatchId) -> Result<Option<MatchDocument>, StoreError>;

    /// Deletes the document for this id. Missing documents are fine.
    fn reset(&mut self, match_id: MatchId) -> Result<(), StoreError>;

    /// The id most recently saved, if any.
    fn last_match_id(&self) -> Result<Option<MatchId>, StoreError>;
}
