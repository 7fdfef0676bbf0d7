//! Roster provider: the static player list supplied at load time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LiveError, Result};
use crate::models::PlayerId;

/// A registered player. Immutable during a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Ordered player list, read-only to the live core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Roster { players }
    }

    /// Loads a roster from a JSON array of `{id, name}` records.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let roster = Self::from_json(&raw)?;
        log::info!("loaded roster of {} players from {}", roster.len(), path.display());
        Ok(roster)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let players: Vec<Player> = serde_json::from_str(raw)?;
        let roster = Roster { players };
        if let Some(dup) = roster.first_duplicate_id() {
            return Err(LiveError::DuplicatePlayerId { id: dup });
        }
        Ok(roster)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players sorted by name, ties broken by id. Every list the UI shows is
    /// in this order.
    pub fn by_name(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        sorted
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn first_duplicate_id(&self) -> Option<PlayerId> {
        let mut seen = std::collections::BTreeSet::new();
        self.players.iter().find_map(|p| (!seen.insert(p.id)).then_some(p.id))
    }
}
