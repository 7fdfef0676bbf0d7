//! Live-match engine: clock, interval ledger, substitutions and the session
//! that owns them.

pub mod clock;
pub mod interval;
pub mod session;
pub mod substitution;

pub use clock::{ClockTick, MatchClock};
pub use session::LiveSession;
pub use substitution::SwapProposal;
