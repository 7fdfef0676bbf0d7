//! Half-scoped match clock.
//!
//! The clock is an owned value inside [`LiveMatch`](crate::models::LiveMatch);
//! there is no shared timer resource. The external clock driver calls
//! [`MatchClock::tick`] once per second while the clock reports running.

use serde::{Deserialize, Serialize};

use crate::models::{Seconds, HALF_DURATION_SECS};

/// Outcome of a single tick, for the driver and the UI refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// The clock was paused; nothing happened.
    Ignored,
    /// The clock advanced one second.
    Advanced(Seconds),
    /// The half duration was reached; the clock auto-paused. The half itself
    /// is not advanced, taking halftime stays a human decision.
    LimitReached,
}

/// Running/paused timer bounded to `[0, HALF_DURATION_SECS]`.
///
/// Persisted inside the live document as `{currentTime, isRunning}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchClock {
    #[serde(default)]
    pub current_time: Seconds,
    #[serde(default)]
    pub is_running: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchClock {
    /// A paused clock at the start of a half.
    pub fn new() -> Self {
        MatchClock { current_time: 0, is_running: false }
    }

    /// `Paused -> Running`. Returns whether a transition happened; starting a
    /// running clock is a no-op so a double-fired start cannot stack ticks.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// `Running -> Paused`. Returns whether a transition happened.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Advances one second, clamped to the half duration. Reaching the limit
    /// auto-pauses.
    pub fn tick(&mut self) -> ClockTick {
        if !self.is_running {
            return ClockTick::Ignored;
        }
        self.current_time = (self.current_time + 1).min(HALF_DURATION_SECS);
        if self.current_time >= HALF_DURATION_SECS {
            self.is_running = false;
            ClockTick::LimitReached
        } else {
            ClockTick::Advanced(self.current_time)
        }
    }

    /// Current time clamped to the half duration. The stored value is already
    /// bounded; this guards values read back from an older document.
    pub fn clamped_time(&self) -> Seconds {
        self.current_time.min(HALF_DURATION_SECS)
    }

    /// Rewinds to 00:00 for the next half. Does not touch the running flag;
    /// callers pause first.
    pub fn reset_for_next_half(&mut self) {
        self.current_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut clock = MatchClock::new();
        assert!(clock.start());
        assert!(!clock.start());
        assert!(clock.is_running);
        assert!(clock.pause());
        assert!(!clock.pause());
        assert!(!clock.is_running);
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut clock = MatchClock::new();
        assert_eq!(clock.tick(), ClockTick::Ignored);
        assert_eq!(clock.current_time, 0);
    }

    #[test]
    fn tick_advances_one_second() {
        let mut clock = MatchClock::new();
        clock.start();
        assert_eq!(clock.tick(), ClockTick::Advanced(1));
        assert_eq!(clock.tick(), ClockTick::Advanced(2));
    }

    #[test]
    fn clock_auto_pauses_at_the_half_limit() {
        let mut clock = MatchClock { current_time: HALF_DURATION_SECS - 1, is_running: true };
        assert_eq!(clock.tick(), ClockTick::LimitReached);
        assert!(!clock.is_running);
        assert_eq!(clock.current_time, HALF_DURATION_SECS);

        // A stray tick after the limit stays clamped.
        clock.is_running = true;
        assert_eq!(clock.tick(), ClockTick::LimitReached);
        assert_eq!(clock.current_time, HALF_DURATION_SECS);
    }

    #[test]
    fn clamped_time_bounds_oversized_stored_values() {
        let clock = MatchClock { current_time: HALF_DURATION_SECS + 500, is_running: false };
        assert_eq!(clock.clamped_time(), HALF_DURATION_SECS);
    }
}
