//! Core data model for a tracked match.
//!
//! The persisted document shape (camelCase keys, `end: null` for an open
//! interval, the clock nested under its own `clock` key) is what a later
//! session reads back, so the serde attributes here are part of the storage
//! contract, not cosmetics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Seconds elapsed since the start of the current half.
pub type Seconds = u32;

/// Roster player identifier. Unique and stable across matches.
pub type PlayerId = u32;

/// Match identifier chosen on the sheet. Zero is "no match".
pub type MatchId = u32;

/// Fixed length of one half: 35 minutes.
pub const HALF_DURATION_SECS: Seconds = 35 * 60;

/// Number of on-field slots.
pub const FIELD_SLOTS: usize = 11;

/// One of the two playing periods. Persisted as `1` / `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Half {
    First,
    Second,
}

impl Half {
    pub fn number(self) -> u8 {
        match self {
            Half::First => 1,
            Half::Second => 2,
        }
    }

    /// The half that follows this one. There is no third period, so the
    /// second half is its own successor.
    pub fn next(self) -> Half {
        Half::Second
    }
}

impl From<Half> for u8 {
    fn from(half: Half) -> u8 {
        half.number()
    }
}

impl TryFrom<u8> for Half {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Half::First),
            2 => Ok(Half::Second),
            other => Err(format!("invalid half: {}", other)),
        }
    }
}

/// A contiguous on-field span scoped to one half.
///
/// Whether an interval is open is a property of the value, not a sentinel:
/// construction goes through [`Interval::open`] / [`Interval::closed`] and the
/// end is only reachable through [`Interval::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub half: Half,
    pub start: Seconds,
    end: Option<Seconds>,
}

impl Interval {
    /// An interval still running: the player is on the field.
    pub fn open(half: Half, start: Seconds) -> Self {
        Interval { half, start, end: None }
    }

    pub fn closed(half: Half, start: Seconds, end: Seconds) -> Self {
        Interval { half, start, end: Some(end) }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn end(&self) -> Option<Seconds> {
        self.end
    }

    /// Closes the interval at `at`. Closing an already-closed interval keeps
    /// the original end.
    pub fn close_at(&mut self, at: Seconds) {
        if self.end.is_none() {
            self.end = Some(at);
        }
    }
}

/// Live-tracking state of one selected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLiveState {
    pub on_field: bool,
    /// Chronological, append-only except for closing the last entry.
    pub intervals: Vec<Interval>,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub rating: f32,
}

impl PlayerLiveState {
    /// Initial state for a starter: on the field since the kickoff.
    pub fn starter() -> Self {
        PlayerLiveState {
            on_field: true,
            intervals: vec![Interval::open(Half::First, 0)],
            goals: 0,
            rating: 0.0,
        }
    }

    /// Initial state for a bench player: no playing time yet.
    pub fn bench() -> Self {
        PlayerLiveState { on_field: false, intervals: Vec::new(), goals: 0, rating: 0.0 }
    }
}

/// Opponent and score header carried alongside the live state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMeta {
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

/// Full live state of a match: the unit of persistence and of the undo
/// snapshot.
///
/// The key set of `players` is fixed at creation (the sheet's selected
/// players) and never changes afterwards. On the wire the clock sits under
/// a `clock` key as `{currentTime, isRunning}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    pub match_id: MatchId,
    pub half: Half,
    #[serde(default)]
    pub clock: crate::engine::clock::MatchClock,
    pub players: BTreeMap<PlayerId, PlayerLiveState>,
    #[serde(default)]
    pub meta: MatchMeta,
}

/// Formats seconds as `mm:ss` for display.
pub fn format_clock(sec: Seconds) -> String {
    format!("{:02}:{:02}", sec / 60, sec % 60)
}
