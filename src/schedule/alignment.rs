//! Whole-day alignment of timestamps.
//!
//! All arithmetic here uses fixed 24-hour periods on absolute instants, never calendar
//! days, so DST changes in the caller's timezone have no effect on the result.
//! Rounding is done on the nanosecond count with Euclidean division because native
//! integer division truncates toward zero, which is wrong for negative offsets.

use chrono::{DateTime, Duration, Utc};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_DAY: i128 = 24 * 60 * 60 * NANOS_PER_SECOND;

/// Length of one schedule period.
pub fn one_day() -> Duration {
    Duration::days(1)
}

fn total_nanos(delta: Duration) -> i128 {
    // subsec_nanos carries the same sign as the whole duration
    delta.num_seconds() as i128 * NANOS_PER_SECOND + delta.subsec_nanos() as i128
}

/// Number of whole days in `delta`, rounded toward negative infinity.
pub fn whole_days_floor(delta: Duration) -> i64 {
    total_nanos(delta).div_euclid(NANOS_PER_DAY) as i64
}

/// Number of whole days in `delta`, rounded toward positive infinity.
///
/// An exact multiple of a day yields exactly that many days, never one more.
pub fn whole_days_ceil(delta: Duration) -> i64 {
    -((-total_nanos(delta)).div_euclid(NANOS_PER_DAY)) as i64
}

/// Shifts `time_in` by a whole number of days so it lands in `[origin, origin + 24h)`.
///
/// Returns `None` when the shifted instant would fall outside the range of `DateTime<Utc>`.
pub fn shift_within_one_day(origin: DateTime<Utc>, time_in: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let advance = Duration::try_days(whole_days_ceil(origin - time_in))?;
    time_in.checked_add_signed(advance)
}
