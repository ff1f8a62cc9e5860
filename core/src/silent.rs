//! Silent-period policy
//!
//! A window of whole hours during which the flaps must not move. Steps
//! that fall due inside the window are deferred by the reconciliation
//! engine, never dropped.
#![deny(unsafe_code)]

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::ClockError;

/// Whether `current_hour` falls in the `[start_hour, end_hour)` window
///
/// The window wraps midnight when `start_hour > end_hour`. A zero-width
/// window (`start_hour == end_hour`) is never silent.
pub const fn is_in_silent_period(current_hour: u8, start_hour: u8, end_hour: u8) -> bool {
    if start_hour < end_hour {
        start_hour <= current_hour && current_hour < end_hour
    } else if start_hour > end_hour {
        current_hour >= start_hour || current_hour < end_hour
    } else {
        false
    }
}

/// Meaning of a window whose start and end hour are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZeroWidthPolicy {
    #[default]
    NeverSilent,
    AlwaysSilent,
}

/// Configured silent window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SilentHours {
    start: u8,
    end: u8,
    zero_width: ZeroWidthPolicy,
}

impl Default for SilentHours {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SilentHours {
    /// 22:00 to 09:00
    pub const DEFAULT: Self = Self {
        start: 22,
        end: 9,
        zero_width: ZeroWidthPolicy::NeverSilent,
    };

    pub fn new(start: u8, end: u8) -> Result<Self, ClockError> {
        if start > 23 || end > 23 {
            return Err(ClockError::OutOfRange);
        }
        Ok(Self {
            start,
            end,
            zero_width: ZeroWidthPolicy::NeverSilent,
        })
    }

    pub const fn with_zero_width(mut self, policy: ZeroWidthPolicy) -> Self {
        self.zero_width = policy;
        self
    }

    pub const fn start(&self) -> u8 {
        self.start
    }

    pub const fn end(&self) -> u8 {
        self.end
    }

    pub const fn zero_width(&self) -> ZeroWidthPolicy {
        self.zero_width
    }

    pub const fn contains(&self, hour: u8) -> bool {
        if self.start == self.end {
            return matches!(self.zero_width, ZeroWidthPolicy::AlwaysSilent);
        }
        is_in_silent_period(hour, self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy)]
struct SilentState {
    hours: SilentHours,
    /// Hour of the latest RTC reading, `None` until the clock task has one
    rtc_hour: Option<u8>,
}

/// Lock-guarded silent window plus the RTC hour it was last checked against
///
/// The clock task owns the RTC and records every hour it reads, so other
/// tasks can ask whether silence is in effect without touching the RTC.
pub struct SilentHoursStore {
    state: Mutex<CriticalSectionRawMutex, Cell<SilentState>>,
}

impl Default for SilentHoursStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SilentHoursStore {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(SilentState {
                hours: SilentHours::DEFAULT,
                rtc_hour: None,
            })),
        }
    }

    pub fn silent_hours(&self) -> SilentHours {
        self.state.lock(|cell| cell.get().hours)
    }

    /// Replace the window; persisting it is the caller's job
    pub fn set_silent_hours(&self, hours: SilentHours) {
        self.state.lock(|cell| {
            let mut state = cell.get();
            state.hours = hours;
            cell.set(state);
        });
    }

    /// Record the hour the RTC shows now and check it against the window
    pub fn observe_hour(&self, hour: u8) -> bool {
        self.state.lock(|cell| {
            let mut state = cell.get();
            state.rtc_hour = Some(hour);
            cell.set(state);
            state.hours.contains(hour)
        })
    }

    /// Whether the latest RTC hour falls in the current window
    pub fn silent_now(&self) -> bool {
        self.state.lock(|cell| {
            let state = cell.get();
            state.rtc_hour.is_some_and(|hour| state.hours.contains(hour))
        })
    }
}
