//! Hardware abstraction traits for the Cifra clock firmware
//!
//! This crate defines the narrow capabilities the clock core needs from
//! the board: a calendar RTC with a few battery-backed registers, the
//! flap actuators, the two position sensors and a small settings region
//! in non-volatile memory. Boards implement these traits; the core is
//! generic over them and is tested against fakes.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod actuator;
pub mod rtc;
pub mod sensors;
pub mod storage;

pub use actuator::{Actuator, Coil};
pub use rtc::{BackupDomain, RtcClock, RtcDate, RtcDateTime, RtcTime, Weekday};
pub use sensors::{MarkLevel, PositionSensors};
pub use storage::{NorFlashRegion, SettingsStorage};
