//! Flap mechanism actuators
//!
//! The minute flaps are driven by a bistable coil that must be pulsed
//! with alternating polarity; the hour flaps are pushed by a separate
//! drive that may need to be engaged before a run of hour steps.
#![deny(unsafe_code)]

use core::fmt::Debug;

/// Minute coil polarity for the next pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Coil {
    #[default]
    Tick,
    Tock,
}

impl Coil {
    /// Polarity for the pulse after this one
    pub const fn next(self) -> Self {
        match self {
            Self::Tick => Self::Tock,
            Self::Tock => Self::Tick,
        }
    }

    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Tock
        } else {
            Self::Tick
        }
    }

    pub const fn bit(self) -> bool {
        matches!(self, Self::Tock)
    }
}

/// Forward-only step outputs
///
/// Every method returns once the motion is complete. An `Err` means the
/// step could not be confirmed and the mechanism must be assumed not to
/// have moved.
pub trait Actuator {
    type Error: Debug;

    /// Flip the minute flaps forward once using the given coil polarity
    fn step_minute(&mut self, coil: Coil) -> Result<(), Self::Error>;

    /// Flip the hour flaps forward once, minutes untouched
    fn step_hour(&mut self) -> Result<(), Self::Error>;

    /// Prepare the hour drive for a run of [`Actuator::step_hour`] calls
    fn engage_hours(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Park the hour drive after a run of hour steps
    fn release_hours(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coil_alternates() {
        assert_eq!(Coil::Tick.next(), Coil::Tock);
        assert_eq!(Coil::Tock.next(), Coil::Tick);
        assert_eq!(Coil::from_bit(Coil::Tock.bit()), Coil::Tock);
        assert_eq!(Coil::from_bit(Coil::Tick.bit()), Coil::Tick);
    }
}
