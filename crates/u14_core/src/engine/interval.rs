//! Interval ledger: per-player playing time derived from interval lists.

use crate::models::{Half, Interval, Seconds, HALF_DURATION_SECS};

/// Total seconds played across both halves, as of `current_time` in
/// `current_half`.
///
/// An open interval in the current half runs to `current_time`. An open
/// interval left over from a past half counts to the end of that half; the
/// half transition force-closes intervals so this is a fallback for stale
/// documents, not a normal path. Each term is clamped at zero so a malformed
/// interval can never subtract time.
pub fn elapsed_seconds(intervals: &[Interval], current_half: Half, current_time: Seconds) -> Seconds {
    intervals
        .iter()
        .map(|it| {
            let end = match it.end() {
                Some(end) => end,
                None if it.half == current_half => current_time,
                None => HALF_DURATION_SECS,
            };
            end.saturating_sub(it.start)
        })
        .sum()
}

/// Closes the last interval if it is open and belongs to `half`; no-op
/// otherwise. Safe to call twice at the same time.
pub fn close_open_interval(intervals: &mut [Interval], half: Half, at: Seconds) {
    if let Some(last) = intervals.last_mut() {
        if last.half == half && last.is_open() {
            last.close_at(at);
        }
    }
}

/// Closes every open interval belonging to `half`. Used by the half
/// transition and by finish, which must not leave anything open behind.
pub fn close_all_open(intervals: &mut [Interval], half: Half, at: Seconds) {
    for it in intervals.iter_mut() {
        if it.half == half && it.is_open() {
            it.close_at(at);
        }
    }
}

/// Appends a new open interval. The caller guarantees no interval is
/// currently open; two open intervals for one player is a logic error.
pub fn open_interval(intervals: &mut Vec<Interval>, half: Half, at: Seconds) {
    debug_assert!(
        intervals.iter().all(|it| !it.is_open()),
        "opening an interval while another is still open"
    );
    intervals.push(Interval::open(half, at));
}
