//! Directory-backed JSON store.
//!
//! One pretty-printed JSON file per match id plus a pointer file for the
//! last saved match. Writes go through a temp file and a rename so a crash
//! mid-write cannot leave a half-written document behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{MatchDocument, MatchStore, StoreError};
use crate::models::MatchId;

const LAST_MATCH_FILE: &str = "u14_live_last_match_id";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the storage directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn match_path(&self, match_id: MatchId) -> PathBuf {
        self.dir.join(format!("u14_live_match_{}.json", match_id))
    }

    fn pointer_path(&self) -> PathBuf {
        self.dir.join(LAST_MATCH_FILE)
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl MatchStore for FileStore {
    fn save(&mut self, match_id: MatchId, doc: &MatchDocument) -> Result<(), StoreError> {
        if match_id == 0 {
            return Err(StoreError::InvalidMatchId(match_id));
        }
        let mut stamped = doc.clone();
        stamped.saved_at = Some(Utc::now());

        let bytes = serde_json::to_vec_pretty(&stamped)?;
        Self::write_atomic(&self.match_path(match_id), &bytes)?;
        Self::write_atomic(&self.pointer_path(), match_id.to_string().as_bytes())?;
        log::debug!("saved match {} ({} bytes)", match_id, bytes.len());
        Ok(())
    }

    fn load(&self, match_id: MatchId) -> Result<Option<MatchDocument>, StoreError> {
        let path = self.match_path(match_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // An unreadable document counts as absent; the caller rebuilds from
        // the sheet or reports the match as missing.
        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                log::warn!("discarding unreadable document for match {}: {}", match_id, e);
                Ok(None)
            }
        }
    }

    fn reset(&mut self, match_id: MatchId) -> Result<(), StoreError> {
        let path = self.match_path(match_id);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("reset match {}", match_id);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn last_match_id(&self) -> Result<Option<MatchId>, StoreError> {
        let raw = match fs::read_to_string(self.pointer_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(raw.trim().parse::<MatchId>().ok().filter(|&id| id != 0))
    }
}
