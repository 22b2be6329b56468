//! Application-wide defaults and limits.

// # Configuration Defaults

pub const DEFAULT_MODE: &str = "manual";
pub const DEFAULT_SUNRISE: &str = "06:00:00";
pub const DEFAULT_SUNSET: &str = "18:00:00";
pub const DEFAULT_UPDATE_INTERVAL: u64 = 300; // seconds

// # Validation Limits

pub const MINIMUM_UPDATE_INTERVAL: u64 = 10;
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 3600;

/// Latitudes beyond this are capped so polar day/night still yields sunrise and sunset.
pub const MAXIMUM_EFFECTIVE_LATITUDE: f64 = 65.0;

// # Files

pub const CONFIG_DIR_NAME: &str = "daycycle";
pub const CONFIG_FILE_NAME: &str = "daycycle.toml";
pub const TIME_FORMAT: &str = "%H:%M:%S";

// # Simulation

pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;
pub const MINIMUM_SIMULATION_MULTIPLIER: f64 = 0.1;
pub const MAXIMUM_SIMULATION_MULTIPLIER: f64 = 3600.0;

// # Exit Code

pub const EXIT_FAILURE: i32 = 1;
