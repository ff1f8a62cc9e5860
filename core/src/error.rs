//! Clock core error types
#![deny(unsafe_code)]

/// Which flap reference sensor failed to report its mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// Minute drum :00 mark
    Hour,
    /// Hour drum 00 mark
    Day,
}

/// Errors raised by the clock core
///
/// None of these is fatal. Each one has a recovery path in the clock
/// controller: retry on the next tick, resynchronize, or fall back to
/// forced setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Hour, minute, calibration or silent-hours input out of range
    OutOfRange,
    /// Settings record could not be read or written
    StorageFailure,
    /// A homing search ran out of steps without seeing its mark
    SensorError(SensorKind),
    /// Too many consecutive synchronization failures
    SyncExhausted,
    /// The actuator did not confirm a step
    ActuatorFault,
    /// The RTC could not be read or set
    RtcUnavailable,
    /// The hour mark was seen while the minute position was not :00
    MechanicalDrift,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "Value out of range"),
            Self::StorageFailure => write!(f, "Settings storage failure"),
            Self::SensorError(SensorKind::Hour) => write!(f, "Hour mark not found"),
            Self::SensorError(SensorKind::Day) => write!(f, "Day mark not found"),
            Self::SyncExhausted => write!(f, "Too many synchronization attempts"),
            Self::ActuatorFault => write!(f, "Actuator step not confirmed"),
            Self::RtcUnavailable => write!(f, "RTC unavailable"),
            Self::MechanicalDrift => write!(f, "Mechanical drift detected"),
        }
    }
}

// Implement core::error::Error for no_std compatibility
impl core::error::Error for ClockError {}
