//! Match sheet: pre-match roster selection and starting XI.
//!
//! The sheet is finalized before live tracking starts; the live state is
//! built from it once and the selected key set never changes afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::clock::MatchClock;
use crate::models::{Half, LiveMatch, MatchId, MatchMeta, PlayerId, PlayerLiveState, FIELD_SLOTS};
use crate::roster::Roster;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("match id is required")]
    MatchIdRequired,

    #[error("at least 11 selected players required, found {found}")]
    NotEnoughSelected { found: usize },

    #[error("starting XI must be exactly 11 players, found {found}")]
    WrongXiSize { found: usize },

    #[error("XI player {id} is not in the selected list")]
    XiNotSelected { id: PlayerId },
}

/// Roster selection for one match: who travels and who starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSheet {
    pub match_id: MatchId,
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    /// Players called up for this match.
    #[serde(default)]
    pub selected: Vec<PlayerId>,
    /// Starting eleven, always a subset of `selected`.
    #[serde(default)]
    pub xi: Vec<PlayerId>,
}

impl MatchSheet {
    pub fn new(match_id: MatchId) -> Self {
        MatchSheet {
            match_id,
            opponent: String::new(),
            home_score: None,
            away_score: None,
            selected: Vec::new(),
            xi: Vec::new(),
        }
    }

    pub fn is_selected(&self, id: PlayerId) -> bool {
        self.selected.contains(&id)
    }

    pub fn select(&mut self, id: PlayerId) {
        if !self.is_selected(id) {
            self.selected.push(id);
        }
    }

    /// Removing a player from the call-up also removes them from the XI.
    pub fn deselect(&mut self, id: PlayerId) {
        self.selected.retain(|&p| p != id);
        self.xi.retain(|&p| p != id);
    }

    /// Adds or removes a starter. Returns whether the XI changed; adding
    /// requires the player to be selected and the XI to have a free slot.
    pub fn toggle_xi(&mut self, id: PlayerId) -> bool {
        if let Some(pos) = self.xi.iter().position(|&p| p == id) {
            self.xi.remove(pos);
            return true;
        }
        if self.is_selected(id) && self.xi.len() < FIELD_SLOTS {
            self.xi.push(id);
            return true;
        }
        false
    }

    /// Fills the XI with the first eleven selected players in roster name
    /// order.
    pub fn auto_xi(&mut self, roster: &Roster) {
        self.xi = roster
            .by_name()
            .iter()
            .filter(|p| self.is_selected(p.id))
            .take(FIELD_SLOTS)
            .map(|p| p.id)
            .collect();
    }

    pub fn validate(&self) -> Result<(), SheetError> {
        if self.match_id == 0 {
            return Err(SheetError::MatchIdRequired);
        }
        if self.selected.len() < FIELD_SLOTS {
            return Err(SheetError::NotEnoughSelected { found: self.selected.len() });
        }
        if self.xi.len() != FIELD_SLOTS {
            return Err(SheetError::WrongXiSize { found: self.xi.len() });
        }
        if let Some(&id) = self.xi.iter().find(|id| !self.is_selected(**id)) {
            return Err(SheetError::XiNotSelected { id });
        }
        Ok(())
    }

    /// Builds the kickoff live state: starters on the field with an open
    /// interval at `half 1, start 0`, the rest on the bench with no playing
    /// time.
    pub fn build_live(&self) -> LiveMatch {
        let players = self
            .selected
            .iter()
            .map(|&id| {
                let state = if self.xi.contains(&id) {
                    PlayerLiveState::starter()
                } else {
                    PlayerLiveState::bench()
                };
                (id, state)
            })
            .collect();

        LiveMatch {
            match_id: self.match_id,
            half: Half::First,
            clock: MatchClock::new(),
            players,
            meta: MatchMeta {
                opponent: self.opponent.clone(),
                home_score: self.home_score,
                away_score: self.away_score,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Player;

    fn sheet_with(selected: &[PlayerId], xi: &[PlayerId]) -> MatchSheet {
        let mut sheet = MatchSheet::new(42);
        sheet.selected = selected.to_vec();
        sheet.xi = xi.to_vec();
        sheet
    }

    fn ids(n: u32) -> Vec<PlayerId> {
        (1..=n).collect()
    }

    #[test]
    fn validate_accepts_a_complete_sheet() {
        let sheet = sheet_with(&ids(14), &ids(11));
        assert_eq!(sheet.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_match_id() {
        let mut sheet = sheet_with(&ids(14), &ids(11));
        sheet.match_id = 0;
        assert_eq!(sheet.validate(), Err(SheetError::MatchIdRequired));
    }

    #[test]
    fn validate_rejects_short_call_up_and_wrong_xi() {
        let sheet = sheet_with(&ids(10), &ids(10));
        assert_eq!(sheet.validate(), Err(SheetError::NotEnoughSelected { found: 10 }));

        let sheet = sheet_with(&ids(14), &ids(10));
        assert_eq!(sheet.validate(), Err(SheetError::WrongXiSize { found: 10 }));
    }

    #[test]
    fn validate_rejects_xi_outside_the_call_up() {
        let mut sheet = sheet_with(&ids(14), &ids(10));
        sheet.xi.push(99);
        assert_eq!(sheet.validate(), Err(SheetError::XiNotSelected { id: 99 }));
    }

    #[test]
    fn deselect_removes_the_player_from_the_xi_too() {
        let mut sheet = sheet_with(&ids(14), &ids(11));
        sheet.deselect(5);
        assert!(!sheet.is_selected(5));
        assert!(!sheet.xi.contains(&5));
        assert_eq!(sheet.xi.len(), 10);
    }

    #[test]
    fn toggle_xi_caps_the_starting_eleven() {
        let mut sheet = sheet_with(&ids(14), &ids(11));
        assert!(!sheet.toggle_xi(12), "twelfth starter must be refused");
        assert!(sheet.toggle_xi(11), "removing a starter frees a slot");
        assert!(sheet.toggle_xi(12));
        assert_eq!(sheet.xi.len(), 11);
    }

    #[test]
    fn toggle_xi_requires_selection() {
        let mut sheet = sheet_with(&ids(11), &[]);
        assert!(!sheet.toggle_xi(99));
        assert!(sheet.xi.is_empty());
    }

    #[test]
    fn auto_xi_takes_the_first_eleven_by_name() {
        let roster = Roster::new(
            (1..=14u32)
                .map(|id| Player { id, name: format!("Player {:02}", 15 - id) })
                .collect(),
        );
        let mut sheet = sheet_with(&ids(14), &[]);
        sheet.auto_xi(&roster);
        // Names sort descending by id, so the XI is the eleven highest ids.
        assert_eq!(sheet.xi, (4..=14).rev().collect::<Vec<_>>());
    }

    #[test]
    fn build_live_puts_the_xi_on_the_field() {
        let mut sheet = sheet_with(&ids(14), &ids(11));
        sheet.opponent = "FC Example".to_string();
        let live = sheet.build_live();

        assert_eq!(live.players.len(), 14);
        assert_eq!(live.players.values().filter(|p| p.on_field).count(), 11);
        assert!(live.players[&1].intervals[0].is_open());
        assert!(live.players[&12].intervals.is_empty());
        assert_eq!(live.half, Half::First);
        assert_eq!(live.clock.current_time, 0);
        assert!(!live.clock.is_running);
        assert_eq!(live.meta.opponent, "FC Example");
    }
}
