//! Human-readable clock-time rendering for uptimes and elapsed durations.

use std::time::Duration;

use crate::{Error, Result};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Render a duration as `"D day(s), H hour(s), M minute(s), and S second(s)"`.
///
/// Sub-second remainders are truncated.
///
/// ```
/// use std::time::Duration;
/// use strata_core::clock::clock_time;
///
/// assert_eq!(
///     clock_time(Duration::from_secs(3_645)),
///     "0 day(s), 1 hour(s), 0 minute(s), and 45 second(s)"
/// );
/// ```
#[must_use]
pub fn clock_time(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    format!("{days} day(s), {hours} hour(s), {minutes} minute(s), and {seconds} second(s)")
}

/// Render a millisecond count as clock time.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `millis` is negative.
pub fn clock_time_from_millis(millis: i64) -> Result<String> {
    u64::try_from(millis)
        .map(|ms| clock_time(Duration::from_millis(ms)))
        .map_err(|_| Error::invalid_argument(format!("duration must be non-negative, got {millis}ms")))
}
