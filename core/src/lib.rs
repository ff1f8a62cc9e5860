//! Platform-agnostic control logic for the Cifra 5 flip clock
//!
//! This crate keeps the flaps in step with the RTC: position bookkeeping,
//! calibration, silent hours, settings persistence, the reconciliation
//! engine, the synchronization sequence and the user-interface state
//! machine. It has NO hardware dependencies; boards plug in through the
//! traits in `cifra-hal`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod backup;
pub mod button;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod mechanism;
pub mod settings;
pub mod silent;
pub mod sync;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use calibration::{Calibration, CalibrationStore};
pub use clock::ClockController;
pub use config::{ClockConfig, UiConfig};
pub use engine::{EngineState, Reconciler, TickReport};
pub use error::{ClockError, SensorKind};
pub use events::{Button, ButtonEvent, ClockCommand, DisplayEvent, ErrorPhase, EventSink, Press, SyncPhase};
pub use mechanism::{Dial, MechPosition, MechState, MechStore};
pub use settings::{Settings, SettingsFlash};
pub use silent::{SilentHours, SilentHoursStore, ZeroWidthPolicy};
pub use ui::{UiController, UiMode, UiOutcome};

/// The shared stores, borrowed together
///
/// Each store synchronizes itself, so a `Stores` can be copied into every
/// task that needs one.
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    pub mech: &'a MechStore,
    pub calibration: &'a CalibrationStore,
    pub silent: &'a SilentHoursStore,
}

/// Hardware the clock task drives
pub struct Devices<R, A, P> {
    pub rtc: R,
    pub actuator: A,
    pub sensors: P,
}
