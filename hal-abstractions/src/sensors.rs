//! Flap position sensors
#![deny(unsafe_code)]

use core::fmt::Debug;

/// Pin level a sensor reads while its drum is at the mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarkLevel {
    High,
    Low,
}

impl MarkLevel {
    /// Translate a raw pin level into "at the mark"
    pub const fn is_mark(self, pin_high: bool) -> bool {
        match self {
            Self::High => pin_high,
            Self::Low => !pin_high,
        }
    }
}

/// Reference marks on the flap drums
///
/// Boards normalize polarity so that `true` always means "at the mark".
pub trait PositionSensors {
    type Error: Debug;

    /// Minute drum is showing :00
    fn hour_mark(&mut self) -> Result<bool, Self::Error>;

    /// Hour drum is showing 00
    fn day_mark(&mut self) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First step after which `level` reports the mark rising
    fn mark_edge(level: MarkLevel, pins: &[bool]) -> Option<usize> {
        pins.windows(2)
            .position(|w| !level.is_mark(w[0]) && level.is_mark(w[1]))
            .map(|i| i + 1)
    }

    #[test]
    fn test_hour_sensor_goes_high_at_full_hour() {
        // Hour reed pin while stepping 58, 59, 00, 01: 0 -> 1 at :00
        let pins = [false, false, true, true];
        assert_eq!(mark_edge(MarkLevel::High, &pins), Some(2));
        // Read active low, the :00 edge is never seen as the mark
        assert_eq!(mark_edge(MarkLevel::Low, &pins), None);
    }

    #[test]
    fn test_day_sensor_goes_low_at_midnight() {
        // Day reed pin while stepping 22, 23, 00: 1 -> 0 at 00
        let pins = [true, true, false];
        assert_eq!(mark_edge(MarkLevel::Low, &pins), Some(2));
        assert_eq!(mark_edge(MarkLevel::High, &pins), None);
    }
}
