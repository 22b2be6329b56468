//! Time source abstraction for real and simulated time.
//!
//! Everything that needs "now" or has to wait goes through this module, so the follower
//! loop can be driven by an accelerated clock during `--simulate` runs and by mocks in tests.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::{Duration as StdDuration, Instant};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
#[cfg_attr(test, mockall::automock)]
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated clock running from `start_time` to `end_time`.
///
/// With a positive multiplier time flows continuously (e.g. 60.0 = one minute per real
/// second). A multiplier of `0.0` selects fast-forward, where every sleep jumps the clock
/// forward instantly.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    time_multiplier: f64,
    /// Current time in fast-forward mode
    fast_forward_current: Mutex<Option<DateTime<Local>>>,
    /// Simulated time covered by completed sleeps
    accumulated_sleep: Mutex<StdDuration>,
    /// Sleep in progress: (real start, simulated length)
    sleep_in_progress: Mutex<Option<(Instant, StdDuration)>>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// Negative multipliers fall back to one simulated hour per real second.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let is_fast_forward = multiplier == 0.0;
        Self {
            start_time,
            end_time,
            time_multiplier: if is_fast_forward {
                0.0
            } else if multiplier < 0.0 {
                crate::constants::DEFAULT_SIMULATION_MULTIPLIER
            } else {
                multiplier
            },
            fast_forward_current: Mutex::new(is_fast_forward.then_some(start_time)),
            accumulated_sleep: Mutex::new(StdDuration::ZERO),
            sleep_in_progress: Mutex::new(None),
        }
    }

    fn is_fast_forward(&self) -> bool {
        self.time_multiplier == 0.0
    }

    fn elapsed_to_chrono(secs: f64) -> ChronoDuration {
        ChronoDuration::seconds(secs as i64)
            + ChronoDuration::nanoseconds((secs.fract() * 1_000_000_000.0) as i64)
    }

    fn current_time(&self) -> DateTime<Local> {
        if self.is_fast_forward() {
            let guard = self.fast_forward_current.lock().unwrap();
            return guard.unwrap_or(self.end_time);
        }

        let mut total_secs = self.accumulated_sleep.lock().unwrap().as_secs_f64();

        // Include the elapsed share of a sleep that is still running
        if let Some((started, simulated)) = *self.sleep_in_progress.lock().unwrap() {
            let simulated_elapsed = started.elapsed().as_secs_f64() * self.time_multiplier;
            total_secs += simulated_elapsed.min(simulated.as_secs_f64());
        }

        let simulated = self.start_time + Self::elapsed_to_chrono(total_secs);
        simulated.min(self.end_time)
    }

    /// Check if the simulation has reached its end time
    pub fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        if self.is_fast_forward() {
            {
                let mut guard = self.fast_forward_current.lock().unwrap();
                if let Some(current) = *guard {
                    let advanced =
                        current + ChronoDuration::milliseconds(duration.as_millis() as i64);
                    *guard = Some(advanced.min(self.end_time));
                }
            }
            // Let other threads run and logs flush
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        // Never sleep past the end of the simulation
        let duration_to_add = {
            let accumulated = self.accumulated_sleep.lock().unwrap().as_secs_f64();
            let current = self.start_time + Self::elapsed_to_chrono(accumulated);
            if current >= self.end_time {
                StdDuration::ZERO
            } else {
                let remaining = (self.end_time - current)
                    .to_std()
                    .unwrap_or(StdDuration::ZERO);
                duration.min(remaining)
            }
        };

        if duration_to_add.is_zero() {
            return;
        }

        *self.sleep_in_progress.lock().unwrap() = Some((Instant::now(), duration_to_add));
        std::thread::sleep(StdDuration::from_secs_f64(
            duration_to_add.as_secs_f64() / self.time_multiplier,
        ));
        *self.sleep_in_progress.lock().unwrap() = None;
        *self.accumulated_sleep.lock().unwrap() += duration_to_add;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        SimulatedTimeSource::is_ended(self)
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// The global time source, initializing it to real time on first use.
pub fn current() -> Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time.
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<Local> {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_parse_datetime_valid() {
        let parsed = local("2024-06-10 08:30:00");
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "08:30:00");
    }

    #[test]
    fn test_parse_datetime_rejects_bad_format() {
        assert!(parse_datetime("2024-06-10T08:30").is_err());
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_fast_forward_advances_on_sleep() {
        let start = local("2024-06-10 08:00:00");
        let end = local("2024-06-10 12:00:00");
        let source = SimulatedTimeSource::new(start, end, 0.0);

        assert_eq!(source.now(), start);
        source.sleep(StdDuration::from_secs(3600));
        assert_eq!(source.now(), start + ChronoDuration::hours(1));
        assert!(!TimeSource::is_ended(&source));
    }

    #[test]
    fn test_fast_forward_stops_at_end() {
        let start = local("2024-06-10 08:00:00");
        let end = local("2024-06-10 09:00:00");
        let source = SimulatedTimeSource::new(start, end, 0.0);

        source.sleep(StdDuration::from_secs(7200));
        assert_eq!(source.now(), end);
        assert!(TimeSource::is_ended(&source));
    }

    #[test]
    fn test_accelerated_sleep_is_capped_at_end() {
        let start = local("2024-06-10 08:00:00");
        let end = local("2024-06-10 08:00:10");
        // 10 simulated seconds at 1000x take 10ms of real time
        let source = SimulatedTimeSource::new(start, end, 1000.0);

        source.sleep(StdDuration::from_secs(60));
        assert_eq!(source.now(), end);
        assert!(source.is_simulated());
    }
}
