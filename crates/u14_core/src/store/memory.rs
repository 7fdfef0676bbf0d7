//! In-memory store for tests and dry runs.

use std::collections::HashMap;

use chrono::Utc;

use super::{MatchDocument, MatchStore, StoreError};
use crate::models::MatchId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: HashMap<MatchId, MatchDocument>,
    last: Option<MatchId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document without moving the last-match pointer, for test
    /// setups that model a pre-existing store.
    pub fn seed(&mut self, match_id: MatchId, doc: MatchDocument) {
        self.docs.insert(match_id, doc);
    }
}

impl MatchStore for MemoryStore {
    fn save(&mut self, match_id: MatchId, doc: &MatchDocument) -> Result<(), StoreError> {
        if match_id == 0 {
            return Err(StoreError::InvalidMatchId(match_id));
        }
        let mut stamped = doc.clone();
        stamped.saved_at = Some(Utc::now());
        self.docs.insert(match_id, stamped);
        self.last = Some(match_id);
        Ok(())
    }

    fn load(&self, match_id: MatchId) -> Result<Option<MatchDocument>, StoreError> {
        Ok(self.docs.get(&match_id).cloned())
    }

    fn reset(&mut self, match_id: MatchId) -> Result<(), StoreError> {
        self.docs.remove(&match_id);
        Ok(())
    }

    fn last_match_id(&self) -> Result<Option<MatchId>, StoreError> {
        Ok(self.last)
    }
}
