//! Time abstraction traits for platform-agnostic timing.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// Instants must be ordered so deadlines can be compared against `now`.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}

/// Returns the instant `millis` after `now`.
///
/// On overflow the deadline collapses to `now`, which makes the caller fire on
/// its next service instead of never.
pub(crate) fn deadline_after<I: TimeInstant>(now: I, millis: u64) -> I {
    now.checked_add(I::Duration::from_millis(millis))
        .unwrap_or(now)
}

/// Time left until `deadline`, or zero if it has passed.
pub(crate) fn remaining_until<I: TimeInstant>(now: I, deadline: I) -> I::Duration {
    if deadline <= now {
        I::Duration::ZERO
    } else {
        deadline.duration_since(now)
    }
}
