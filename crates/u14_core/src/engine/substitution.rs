//! Substitution legality and application.
//!
//! A swap replaces exactly one on-field player with exactly one bench player
//! at a single point in time. Validation failures are silent drops: they come
//! from UI races (double taps, a player already substituted by another
//! action), not from bugs.

use std::collections::BTreeMap;

use crate::engine::interval;
use crate::models::{LiveMatch, PlayerId, PlayerLiveState, Seconds};

/// A selected outgoing/incoming pair awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapProposal {
    pub out_id: PlayerId,
    pub in_id: PlayerId,
}

/// Checks the swap preconditions: the outgoing player is on the field, the
/// incoming player is on the bench, and both are part of the match roster.
pub fn swap_allowed(players: &BTreeMap<PlayerId, PlayerLiveState>, proposal: SwapProposal) -> bool {
    if proposal.out_id == proposal.in_id {
        return false;
    }
    let out_on_field = players.get(&proposal.out_id).map(|p| p.on_field).unwrap_or(false);
    let in_on_bench = players.get(&proposal.in_id).map(|p| !p.on_field).unwrap_or(false);
    out_on_field && in_on_bench
}

/// Applies a validated swap at `at` seconds into the current half: closes the
/// outgoing player's open interval, opens one for the incoming player, flips
/// both `on_field` flags. Callers check [`swap_allowed`] first.
pub fn apply_swap(state: &mut LiveMatch, proposal: SwapProposal, at: Seconds) {
    let half = state.half;
    if let Some(out) = state.players.get_mut(&proposal.out_id) {
        interval::close_open_interval(&mut out.intervals, half, at);
        out.on_field = false;
    }
    if let Some(incoming) = state.players.get_mut(&proposal.in_id) {
        interval::open_interval(&mut incoming.intervals, half, at);
        incoming.on_field = true;
    }
    log::debug!(
        "substitution applied: out={} in={} at={}s half={}",
        proposal.out_id,
        proposal.in_id,
        at,
        half.number()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Half, Interval};

    fn players() -> BTreeMap<PlayerId, PlayerLiveState> {
        let mut map = BTreeMap::new();
        map.insert(1, PlayerLiveState::starter());
        map.insert(2, PlayerLiveState::bench());
        map
    }

    #[test]
    fn swap_requires_out_on_field_and_in_on_bench() {
        let players = players();
        assert!(swap_allowed(&players, SwapProposal { out_id: 1, in_id: 2 }));
        // Reversed direction: bench player cannot go out.
        assert!(!swap_allowed(&players, SwapProposal { out_id: 2, in_id: 1 }));
        // Unknown ids never pass.
        assert!(!swap_allowed(&players, SwapProposal { out_id: 1, in_id: 99 }));
        assert!(!swap_allowed(&players, SwapProposal { out_id: 99, in_id: 2 }));
        // A player cannot replace themselves.
        assert!(!swap_allowed(&players, SwapProposal { out_id: 1, in_id: 1 }));
    }

    #[test]
    fn apply_swap_closes_and_opens_intervals() {
        let mut state = LiveMatch {
            match_id: 7,
            half: Half::First,
            clock: crate::engine::clock::MatchClock::new(),
            players: players(),
            meta: Default::default(),
        };
        apply_swap(&mut state, SwapProposal { out_id: 1, in_id: 2 }, 600);

        let out = &state.players[&1];
        assert!(!out.on_field);
        assert_eq!(out.intervals, vec![Interval::closed(Half::First, 0, 600)]);

        let incoming = &state.players[&2];
        assert!(incoming.on_field);
        assert_eq!(incoming.intervals, vec![Interval::open(Half::First, 600)]);
    }
}
