//! Export projection: the read-only JSON document produced from a finished
//! match. Not part of the live state machine.

use serde::{Deserialize, Serialize};

use crate::error::{LiveError, Result};
use crate::models::{Interval, MatchId, PlayerId, Seconds, HALF_DURATION_SECS};
use crate::store::MatchDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub match_id: MatchId,
    pub meta: ExportMeta,
    /// Sorted by ascending player id.
    pub players: Vec<PlayerExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub halves: u8,
    pub half_duration_minutes: u32,
    pub opponent: String,
    pub score: ExportScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportScore {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerExport {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub minutes: u32,
    pub goals: u32,
    pub rating: f32,
}

/// Builds the export document for `match_id` from its stored record.
///
/// The sheet's score wins over the live header when both carry one (the
/// sheet is where the final score is filled in); the opponent falls back the
/// other way round.
pub fn build_export(match_id: MatchId, doc: &MatchDocument) -> Result<ExportDocument> {
    let live = doc.live.as_ref().ok_or(LiveError::LiveMissing { match_id })?;
    let sheet = doc.sheet.as_ref();

    let opponent = if live.meta.opponent.is_empty() {
        sheet.map(|s| s.opponent.clone()).unwrap_or_default()
    } else {
        live.meta.opponent.clone()
    };
    let score = ExportScore {
        home: sheet.and_then(|s| s.home_score).or(live.meta.home_score),
        away: sheet.and_then(|s| s.away_score).or(live.meta.away_score),
    };

    let mut players: Vec<PlayerExport> = live
        .players
        .iter()
        .map(|(&player_id, state)| PlayerExport {
            match_id: live.match_id,
            player_id,
            minutes: round_to_minutes(total_seconds(&state.intervals)),
            goals: state.goals,
            rating: state.rating,
        })
        .collect();
    players.sort_by_key(|p| p.player_id);

    Ok(ExportDocument {
        match_id: live.match_id,
        meta: ExportMeta {
            halves: 2,
            half_duration_minutes: HALF_DURATION_SECS / 60,
            opponent,
            score,
        },
        players,
    })
}

/// Renders the document as the pretty-printed `match-<id>.json` payload.
pub fn render(doc: &ExportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Total seconds over a terminal interval list. Finish closes everything, so
/// an interval still open here is a stale document; it counts to the end of
/// its half.
fn total_seconds(intervals: &[Interval]) -> Seconds {
    intervals
        .iter()
        .map(|it| it.end().unwrap_or(HALF_DURATION_SECS).saturating_sub(it.start))
        .sum()
}

/// Round half up, like the recordings this feeds always did.
fn round_to_minutes(seconds: Seconds) -> u32 {
    (seconds + 30) / 60
}
