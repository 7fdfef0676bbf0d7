//! Live match session: the single owner of clock, roster membership,
//! interval ledgers, the pending swap and the undo slot.
//!
//! Every mutation writes the full document through to the store before the
//! handler returns; a failed write propagates instead of letting in-memory
//! and durable state diverge. All mutations run to completion on one thread
//! (a tick or a user confirmation), so there is no locking here.

use crate::engine::clock::ClockTick;
use crate::engine::interval;
use crate::engine::substitution::{self, SwapProposal};
use crate::error::{LiveError, Result};
use crate::models::{Half, LiveMatch, MatchId, PlayerId, Seconds};
use crate::sheet::MatchSheet;
use crate::store::{MatchDocument, MatchStore};

pub struct LiveSession<S: MatchStore> {
    store: S,
    match_id: MatchId,
    sheet: MatchSheet,
    state: LiveMatch,
    /// Single undo slot: the full state before the most recent swap.
    snapshot: Option<LiveMatch>,
    /// Swap awaiting confirmation.
    pending: Option<SwapProposal>,
}

impl<S: MatchStore> LiveSession<S> {
    /// Opens the session for `match_id` from the store.
    ///
    /// A document with a sheet but no live state is rebuilt from the sheet
    /// (older schema, or live tracking not started yet). No sheet at all is
    /// fatal to the flow; the caller redirects to the sheet step. The clock
    /// always reopens paused and inside the half bounds, whatever the
    /// document says.
    pub fn open(store: S, match_id: MatchId) -> Result<Self> {
        let doc = store
            .load(match_id)?
            .ok_or(LiveError::SheetMissing { match_id })?;
        let sheet = doc.sheet.ok_or(LiveError::SheetMissing { match_id })?;

        let state = match doc.live {
            Some(mut live) => {
                live.match_id = match_id;
                live
            }
            None => {
                sheet.validate()?;
                log::info!("match {}: no live state, rebuilding from sheet", match_id);
                sheet.build_live()
            }
        };

        let mut session =
            LiveSession { store, match_id, sheet, state, snapshot: None, pending: None };
        session.state.clock.is_running = false;
        session.state.clock.current_time = session.state.clock.clamped_time();
        session.persist()?;
        Ok(session)
    }

    /// Opens the most recently saved match.
    pub fn resume_last(store: S) -> Result<Self> {
        let match_id = store.last_match_id()?.ok_or(LiveError::NoActiveMatch)?;
        Self::open(store, match_id)
    }

    // --- clock -----------------------------------------------------------

    pub fn start_clock(&mut self) -> Result<()> {
        if self.state.clock.start() {
            log::info!("match {}: clock started at {}", self.match_id, self.state.clock.current_time);
            self.persist()?;
        }
        Ok(())
    }

    pub fn pause_clock(&mut self) -> Result<()> {
        if self.state.clock.pause() {
            log::info!("match {}: clock paused at {}", self.match_id, self.state.clock.current_time);
            self.persist()?;
        }
        Ok(())
    }

    /// One second of match time, driven by the external clock driver.
    /// Persists on every advance so a crash loses at most one second.
    pub fn tick(&mut self) -> Result<ClockTick> {
        let outcome = self.state.clock.tick();
        match outcome {
            ClockTick::Ignored => {}
            ClockTick::Advanced(_) => self.persist()?,
            ClockTick::LimitReached => {
                log::info!("match {}: half {} time limit reached", self.match_id, self.current_half().number());
                self.persist()?;
            }
        }
        Ok(outcome)
    }

    // --- substitutions ---------------------------------------------------

    /// Records a swap proposal. An invalid pair is dropped on the spot and
    /// `false` comes back; nothing changes.
    pub fn propose_swap(&mut self, out_id: PlayerId, in_id: PlayerId) -> bool {
        let proposal = SwapProposal { out_id, in_id };
        if !substitution::swap_allowed(&self.state.players, proposal) {
            log::debug!("match {}: swap proposal {}->{} refused", self.match_id, out_id, in_id);
            return false;
        }
        self.pending = Some(proposal);
        true
    }

    pub fn pending_swap(&self) -> Option<SwapProposal> {
        self.pending
    }

    pub fn cancel_swap(&mut self) {
        self.pending = None;
    }

    /// Confirms the stored proposal at the current (clamped) time.
    ///
    /// Preconditions are re-checked here: the pair may have become invalid
    /// between proposal and confirmation. A stale proposal is dropped without
    /// touching state or the undo slot. Returns whether a swap was applied.
    pub fn confirm_swap(&mut self) -> Result<bool> {
        let Some(proposal) = self.pending.take() else {
            return Ok(false);
        };
        if !substitution::swap_allowed(&self.state.players, proposal) {
            log::debug!("match {}: stale swap proposal dropped", self.match_id);
            return Ok(false);
        }

        let at = self.state.clock.clamped_time();
        // Overwrites any previous snapshot: one undo level, no history.
        self.snapshot = Some(self.state.clone());
        substitution::apply_swap(&mut self.state, proposal, at);
        self.persist()?;
        log::info!(
            "match {}: substitution {} -> {} at {}s",
            self.match_id,
            proposal.out_id,
            proposal.in_id,
            at
        );
        Ok(true)
    }

    /// Restores the state from before the most recent swap, if one is held.
    /// Returns whether anything was restored; undoing twice is a no-op.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.snapshot.take() else {
            return Ok(false);
        };
        self.state = snapshot;
        self.pending = None;
        self.persist()?;
        log::info!("match {}: substitution undone", self.match_id);
        Ok(true)
    }

    // --- period transitions ----------------------------------------------

    /// Takes halftime: pauses, force-closes every interval open in the
    /// current half at the pre-transition time, rewinds the clock, moves to
    /// the second half and reopens an interval at `start 0` for everyone
    /// still on the field. Clears the pending swap and the undo slot.
    ///
    /// Called while already in the second half this keeps `half == 2`; there
    /// is no third period.
    pub fn halftime_transition(&mut self) -> Result<()> {
        self.state.clock.pause();
        self.close_open_intervals();

        if self.state.half == Half::Second {
            log::warn!("match {}: halftime requested in the second half; staying there", self.match_id);
        }
        self.state.half = self.state.half.next();
        self.state.clock.reset_for_next_half();

        // An interval cannot stay open across the boundary, so on-field
        // players get a fresh one scoped to the new half.
        let half = self.state.half;
        for player in self.state.players.values_mut() {
            if player.on_field {
                interval::open_interval(&mut player.intervals, half, 0);
            }
        }

        self.pending = None;
        self.snapshot = None;
        self.persist()?;
        log::info!("match {}: now in half {}", self.match_id, self.state.half.number());
        Ok(())
    }

    /// Ends the match: pauses and force-closes every open interval at the
    /// current time. The half and the clock stay where they are; the next
    /// step is export.
    pub fn finish(&mut self) -> Result<()> {
        self.state.clock.pause();
        self.close_open_intervals();
        for player in self.state.players.values_mut() {
            player.on_field = false;
        }
        self.pending = None;
        self.snapshot = None;
        self.persist()?;
        log::info!(
            "match {}: finished in half {} at {}s",
            self.match_id,
            self.state.half.number(),
            self.state.clock.current_time
        );
        Ok(())
    }

    fn close_open_intervals(&mut self) {
        let half = self.state.half;
        let at = self.state.clock.clamped_time();
        for player in self.state.players.values_mut() {
            interval::close_all_open(&mut player.intervals, half, at);
        }
    }

    // --- reads ------------------------------------------------------------

    /// Seconds played so far by `player_id`, including the currently running
    /// interval. Linear in that player's interval count.
    pub fn live_seconds(&self, player_id: PlayerId) -> Seconds {
        self.state
            .players
            .get(&player_id)
            .map(|p| {
                interval::elapsed_seconds(&p.intervals, self.state.half, self.state.clock.current_time)
            })
            .unwrap_or(0)
    }

    pub fn current_half(&self) -> Half {
        self.state.half
    }

    pub fn current_time(&self) -> Seconds {
        self.state.clock.current_time
    }

    pub fn is_running(&self) -> bool {
        self.state.clock.is_running
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn sheet(&self) -> &MatchSheet {
        &self.sheet
    }

    pub fn state(&self) -> &LiveMatch {
        &self.state
    }

    // --- persistence ------------------------------------------------------

    fn persist(&mut self) -> Result<()> {
        let doc = MatchDocument {
            sheet: Some(self.sheet.clone()),
            live: Some(self.state.clone()),
            saved_at: None,
        };
        self.store.save(self.match_id, &doc)?;
        Ok(())
    }
}
