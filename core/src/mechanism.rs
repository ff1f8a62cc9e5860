//! Mechanism position store
//!
//! Tracks where the flaps are believed to point, independent of the RTC.
//! The store is the single place the minute/hour bookkeeping happens, and
//! it only moves after the actuator has confirmed the physical step, so
//! memory and mechanism stay in lockstep.
//!
//! The position lives behind a critical-section mutex: the clock task is
//! the only writer, the display task reads it for rendering.
#![deny(unsafe_code)]

use core::cell::Cell;

use cifra_hal::{Actuator, Coil, RtcTime};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::ClockError;
use crate::fmt::Debug2Format;

/// Hour convention of the flap drum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dial {
    /// 12 hour positions, 00 is shown as 12
    H12,
    /// 24 hour positions
    H24,
}

impl Dial {
    /// Number of hour positions on the drum
    pub const fn hours(self) -> u8 {
        match self {
            Self::H12 => 12,
            Self::H24 => 24,
        }
    }

    /// Minute steps in one full turn of the hour drum
    pub const fn minutes_per_turn(self) -> u32 {
        self.hours() as u32 * 60
    }
}

/// Where the flaps point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechPosition {
    hour: u8,
    minute: u8,
}

impl MechPosition {
    /// The zero reference, 00:00
    pub const ZERO: Self = Self { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8, dial: Dial) -> Result<Self, ClockError> {
        if hour >= dial.hours() || minute > 59 {
            return Err(ClockError::OutOfRange);
        }
        Ok(Self { hour, minute })
    }

    /// Position that displays `time` on `dial`
    pub const fn from_time(time: RtcTime, dial: Dial) -> Self {
        Self {
            hour: time.hour() % dial.hours(),
            minute: time.minute(),
        }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Position after one minute step, carrying into the hour
    pub const fn next_minute(self, dial: Dial) -> Self {
        if self.minute == 59 {
            Self {
                hour: (self.hour + 1) % dial.hours(),
                minute: 0,
            }
        } else {
            Self {
                hour: self.hour,
                minute: self.minute + 1,
            }
        }
    }

    /// Position after one hour step, minutes untouched
    pub const fn next_hour(self, dial: Dial) -> Self {
        Self {
            hour: (self.hour + 1) % dial.hours(),
            minute: self.minute,
        }
    }
}

/// Position plus the polarity the minute coil expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechState {
    pub position: MechPosition,
    pub coil: Coil,
}

/// Lock-guarded mechanism position
pub struct MechStore {
    dial: Dial,
    state: Mutex<CriticalSectionRawMutex, Cell<MechState>>,
}

impl MechStore {
    pub const fn new(dial: Dial) -> Self {
        Self {
            dial,
            state: Mutex::new(Cell::new(MechState {
                position: MechPosition::ZERO,
                coil: Coil::Tick,
            })),
        }
    }

    pub fn dial(&self) -> Dial {
        self.dial
    }

    pub fn snapshot(&self) -> MechState {
        self.state.lock(|cell| cell.get())
    }

    pub fn position(&self) -> MechPosition {
        self.snapshot().position
    }

    pub fn hours(&self) -> u8 {
        self.position().hour()
    }

    pub fn minutes(&self) -> u8 {
        self.position().minute()
    }

    /// Absolute override after a resync or a restore
    pub fn set_position(&self, hour: u8, minute: u8) -> Result<(), ClockError> {
        let position = MechPosition::new(hour, minute, self.dial)?;
        self.update(|state| state.position = position);
        Ok(())
    }

    /// Replace position and coil polarity together
    pub fn restore(&self, state: MechState) {
        self.state.lock(|cell| cell.set(state));
    }

    /// Record the coil polarity after steps taken outside the store
    pub fn set_coil(&self, coil: Coil) {
        self.update(|state| state.coil = coil);
    }

    /// Force the zero reference
    ///
    /// Bookkeeping only: the caller re-homes the mechanism first.
    pub fn reset(&self) {
        self.update(|state| state.position = MechPosition::ZERO);
    }

    /// Step the minute flaps once and record it
    ///
    /// The lock is not held across the physical step; the clock task is the
    /// only writer, readers just see the old position until it lands.
    pub fn increment_minute<A: Actuator>(&self, actuator: &mut A) -> Result<MechPosition, ClockError> {
        let coil = self.snapshot().coil;
        actuator.step_minute(coil).map_err(|e| {
            warn!("Minute step not confirmed: {:?}", Debug2Format(&e));
            ClockError::ActuatorFault
        })?;
        let dial = self.dial;
        Ok(self.update(|state| {
            state.position = state.position.next_minute(dial);
            state.coil = coil.next();
        }))
    }

    /// Step the hour flaps once and record it, minutes untouched
    pub fn increment_hour<A: Actuator>(&self, actuator: &mut A) -> Result<MechPosition, ClockError> {
        actuator.step_hour().map_err(|e| {
            warn!("Hour step not confirmed: {:?}", Debug2Format(&e));
            ClockError::ActuatorFault
        })?;
        let dial = self.dial;
        Ok(self.update(|state| state.position = state.position.next_hour(dial)))
    }

    fn update(&self, f: impl FnOnce(&mut MechState)) -> MechPosition {
        self.state.lock(|cell| {
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
            state.position
        })
    }
}
