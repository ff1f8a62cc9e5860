//! Calibration store
//!
//! Calibration is expressed in the unit of the STM32 smooth-calibration
//! block: parts per 2^20 (about 0.954 ppm). A positive value speeds the
//! clock up. The store carries the sub-millisecond remainder between
//! calls so that the correction over any number of ticks is exactly
//! `floor(c * total_nominal / 2^20)`, with no rounding bias.
#![deny(unsafe_code)]

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::ClockError;

/// log2 of the calibration denominator
pub const CALIBRATION_SHIFT: u32 = 20;

/// Signed drift correction in parts per 2^20
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration(i16);

impl Calibration {
    pub const ZERO: Self = Self(0);
    pub const MIN: i16 = -511;
    pub const MAX: i16 = 511;

    pub fn new(value: i16) -> Result<Self, ClockError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ClockError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Build from a sign flag and magnitude, as entered on the display
    pub fn from_sign_magnitude(negative: bool, magnitude: u16) -> Result<Self, ClockError> {
        let magnitude = i16::try_from(magnitude).map_err(|_| ClockError::OutOfRange)?;
        Self::new(if negative { -magnitude } else { magnitude })
    }

    pub const fn value(self) -> i16 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn magnitude(self) -> u16 {
        self.0.unsigned_abs()
    }
}

#[derive(Clone, Copy)]
struct CalibrationState {
    calibration: Calibration,
    /// Carried fraction, always in [0, 2^20)
    remainder: i64,
}

/// Lock-guarded calibration value and its accumulator
pub struct CalibrationStore {
    state: Mutex<CriticalSectionRawMutex, Cell<CalibrationState>>,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationStore {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(CalibrationState {
                calibration: Calibration::ZERO,
                remainder: 0,
            })),
        }
    }

    pub fn calibration(&self) -> Calibration {
        self.state.lock(|cell| cell.get().calibration)
    }

    /// Replace the calibration; the carried fraction restarts from zero
    ///
    /// Persisting the new value is the caller's job.
    pub fn set_calibration(&self, calibration: Calibration) {
        self.state.lock(|cell| {
            cell.set(CalibrationState {
                calibration,
                remainder: 0,
            })
        });
    }

    /// Corrected length of the next tick of `nominal_ms`
    pub fn apply_calibration(&self, nominal_ms: u32) -> u32 {
        let correction = self.apply_span(u64::from(nominal_ms));
        // |correction| < nominal for any valid calibration
        (i64::from(nominal_ms) + correction) as u32
    }

    /// Correction in milliseconds for a span of `nominal_ms`
    ///
    /// Equivalent to summing [`CalibrationStore::apply_calibration`] over
    /// the ticks making up the span, used to catch up long gaps in one go.
    pub fn apply_span(&self, nominal_ms: u64) -> i64 {
        self.state.lock(|cell| {
            let mut state = cell.get();
            let acc = state.remainder
                + nominal_ms as i64 * i64::from(state.calibration.value());
            let correction = acc >> CALIBRATION_SHIFT;
            state.remainder = acc - (correction << CALIBRATION_SHIFT);
            cell.set(state);
            correction
        })
    }

    #[cfg(test)]
    fn remainder(&self) -> i64 {
        self.state.lock(|cell| cell.get().remainder)
    }
}
