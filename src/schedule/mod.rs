//! Sunrise-to-sunrise checkpoint schedule.
//!
//! Given a daily sunrise, a daily sunset and the current instant, this module works out
//! where "now" falls in the repeating four-checkpoint cycle and how long remains until the
//! next checkpoint. Only the time of day of `sunrise` and `sunset` matters: both are aligned
//! by whole days around `now` before anything else happens.
//!
//! Everything here is a pure function of its arguments. A [`Schedule`] is rebuilt on every
//! query and never cached, so repeated or concurrent calls with the same inputs always agree.
//!
//! ## Checkpoint placement
//!
//! With `daylight = sunset - sunrise` (always in `[0, 24h)` after alignment):
//!
//! | Checkpoint      | Time                          |
//! |-----------------|-------------------------------|
//! | `Sunrise`       | `sunrise`                     |
//! | `Morning`       | `sunrise + daylight / 3`      |
//! | `LateAfternoon` | `sunrise + daylight * 5 / 6`  |
//! | `Sunset`        | `sunset`                      |
//!
//! The 1/3 and 5/6 fractions are fixed constants and must not change.

mod alignment;
mod checkpoint;


use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub use alignment::{one_day, shift_within_one_day, whole_days_ceil, whole_days_floor};
pub use checkpoint::Checkpoint;

/// A checkpoint paired with the instant it is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub checkpoint: Checkpoint,
    pub time: DateTime<Utc>,
}

/// Where an instant falls within the daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// The most recently hit checkpoint.
    pub current_checkpoint: Checkpoint,
    /// The checkpoint that will be hit next.
    pub next_checkpoint: Checkpoint,
    /// Time remaining until `next_checkpoint`; never negative.
    pub time_until_next: Duration,
}

/// Four slots, one per checkpoint, sorted by time and anchored so that
/// `slots[0].time <= now < slots[0].time + 24h`.
///
/// The schedule is cyclic: the slot after the last one is the first slot a day later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    slots: [Slot; 4],
}

impl Schedule {
    /// Builds the schedule of the light cycle that contains `now`.
    ///
    /// Returns `None` when that cycle, including the wrap to the next sunrise, does not fit
    /// in the range of `DateTime<Utc>`, i.e. when `now` is within a day of either end.
    pub fn build(
        sunrise_in: DateTime<Utc>,
        sunset_in: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let advance = Duration::try_days(whole_days_floor(now - sunrise_in))?;
        let sunrise = sunrise_in.checked_add_signed(advance)?;
        let sunset = shift_within_one_day(sunrise, sunset_in)?;
        // next_slot wraps to sunrise + 24h
        sunrise.checked_add_signed(one_day())?;
        let daylight = sunset - sunrise;

        Some(Self {
            slots: [
                Slot {
                    checkpoint: Checkpoint::Sunrise,
                    time: sunrise,
                },
                Slot {
                    checkpoint: Checkpoint::Morning,
                    time: sunrise + daylight / 3,
                },
                Slot {
                    checkpoint: Checkpoint::LateAfternoon,
                    time: sunrise + daylight * 5 / 6,
                },
                Slot {
                    checkpoint: Checkpoint::Sunset,
                    time: sunset,
                },
            ],
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Start of the cycle, i.e. the aligned sunrise.
    pub fn start(&self) -> DateTime<Utc> {
        self.slots[0].time
    }

    /// Returns the first slot strictly later than `slots[index]`, wrapping to
    /// tomorrow's first slot when none remains.
    pub fn next_slot(&self, index: usize) -> Slot {
        next_slot_in(&self.slots, index)
    }

    /// Finds the interval `[slot, next_slot)` that contains `now`.
    ///
    /// Returns `None` only when `now` lies outside the cycle this schedule was built for.
    pub fn locate(&self, now: DateTime<Utc>) -> Option<Position> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            let next = self.next_slot(index);
            (now >= slot.time && now < next.time).then(|| Position {
                current_checkpoint: slot.checkpoint,
                next_checkpoint: next.checkpoint,
                time_until_next: next.time - now,
            })
        })
    }

    fn contains(&self, now: DateTime<Utc>) -> bool {
        now >= self.start() && now - self.start() < one_day()
    }
}

pub(crate) fn next_slot_in(slots: &[Slot], index: usize) -> Slot {
    let current = slots[index].time;
    slots[index + 1..]
        .iter()
        .find(|slot| slot.time > current)
        .copied()
        .unwrap_or_else(|| Slot {
            checkpoint: slots[0].checkpoint,
            time: slots[0].time + one_day(),
        })
}

/// Locates `now` within the daily cycle defined by `sunrise` and `sunset`.
///
/// The calendar dates of `sunrise` and `sunset` are irrelevant; only their time of day is
/// used. When sunrise and sunset coincide every checkpoint collapses onto one instant and
/// the result reports a full day until that same checkpoint comes round again.
///
/// Instants within a day of `DateTime::<Utc>::MIN_UTC` or `MAX_UTC` have no complete
/// cycle around them; for those the position is logged as unsupported and the degenerate
/// fallback (first checkpoint, zero time until next) is returned.
pub fn get_current_position(
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Position {
    let Some(schedule) = Schedule::build(sunrise, sunset, now) else {
        log_pipe!();
        log_warning!(
            "Cannot place {} in a daily cycle, it is too close to the end of time",
            now
        );
        log_indented!("Sunrise: {}, sunset: {}", sunrise, sunset);
        return fallback_position(Checkpoint::Sunrise);
    };
    debug_assert!(
        schedule.contains(now),
        "schedule starting {} does not contain {now}",
        schedule.start()
    );

    match schedule.locate(now) {
        Some(position) => position,
        None => {
            log_pipe!();
            log_error!("No checkpoint interval contains {}", now);
            for slot in schedule.slots() {
                log_indented!("{:>14}: {}", slot.checkpoint.display_name(), slot.time);
            }
            debug_assert!(false, "no checkpoint interval contains {now}");
            fallback_position(schedule.slots[0].checkpoint)
        }
    }
}

fn fallback_position(checkpoint: Checkpoint) -> Position {
    Position {
        current_checkpoint: checkpoint,
        next_checkpoint: checkpoint,
        time_until_next: Duration::zero(),
    }
}
