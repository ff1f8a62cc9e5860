//! Clock and UI tuning parameters
#![deny(unsafe_code)]

use crate::mechanism::Dial;

/// Clock task configuration
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Hour convention of the flap drum
    pub dial: Dial,
    /// Longest time LastTick may go unwritten to flash, in seconds
    pub flush_interval_secs: u32,
    /// Consecutive failed synchronizations before forced setup
    pub max_sync_attempts: u8,
    /// Seconds to wait before retrying a failed synchronization
    pub sync_retry_secs: u32,
    /// Minute steps allowed while searching for the hour mark
    pub hour_mark_search_limit: u8,
    /// Hour steps allowed while searching for the day mark
    pub day_mark_search_limit: u8,
    /// Skip the homing search when the position is already known
    pub fast_sync: bool,
    /// Watch the hour mark during normal ticking
    pub drift_detection: bool,
    /// Consecutive unconfirmed steps before re-homing
    pub max_actuator_faults: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            dial: Dial::H24,
            flush_interval_secs: 3600,
            max_sync_attempts: 3,
            sync_retry_secs: 60,
            hour_mark_search_limit: 62,
            day_mark_search_limit: 25,
            fast_sync: true,
            drift_detection: true,
            max_actuator_faults: 3,
        }
    }
}

/// Display task configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Display blanking after this long without input, in milliseconds
    pub display_off_ms: u64,
    /// Button hold time that turns a press into a long press
    pub long_press_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            display_off_ms: 30_000,
            long_press_ms: 1_000,
        }
    }
}
