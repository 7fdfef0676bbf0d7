//! # u14_core: offline match-day tracking core
//!
//! Tracks a youth match roster, live substitutions and per-player on-field
//! time, persisting the full state after every mutation so a match can be
//! scored with no connectivity.
//!
//! The heart of the crate is [`LiveSession`]: it owns the half-scoped clock,
//! the per-player interval ledgers and the single-level substitution undo,
//! and writes through to a [`MatchStore`] on every change. Around it sit the
//! collaborator seams: the [`Roster`] provider, the [`MatchSheet`] filled in
//! before kickoff, and the [`export`] projection produced once the match is
//! finished.

pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod roster;
pub mod sheet;
pub mod store;

pub use engine::{ClockTick, LiveSession, MatchClock, SwapProposal};
pub use error::{LiveError, Result};
pub use export::{build_export, ExportDocument};
pub use models::{
    format_clock, Half, Interval, LiveMatch, MatchId, MatchMeta, PlayerId, PlayerLiveState,
    Seconds, FIELD_SLOTS, HALF_DURATION_SECS,
};
pub use roster::{Player, Roster};
pub use sheet::{MatchSheet, SheetError};
pub use store::{FileStore, MatchDocument, MatchStore, MemoryStore, StoreError};
