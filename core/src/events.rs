//! Event vocabulary shared by the clock, button and display tasks
//!
//! `DisplayEvent` flows from the clock and button tasks to the display
//! task; `ClockCommand` flows from the display task back to the clock
//! task. Both travel over static channels built on a critical-section
//! mutex, which makes them usable from any RTIC priority.
//!
//! Every event has a stable numeric code (button 1xx, sync 2xx,
//! error 3xx, forced setup 999) used in logs.
#![deny(unsafe_code)]

use cifra_hal::RtcTime;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::calibration::Calibration;
use crate::silent::SilentHours;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Set,
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: Button,
    pub press: Press,
}

impl ButtonEvent {
    pub const fn short(button: Button) -> Self {
        Self {
            button,
            press: Press::Short,
        }
    }

    pub const fn long(button: Button) -> Self {
        Self {
            button,
            press: Press::Long,
        }
    }
}

/// Synchronization progress, in the order the phases run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPhase {
    Start,
    /// Searching the minute drum for its :00 mark
    SourceHour,
    /// Searching the hour drum for its 00 mark
    SourceDay,
    SetHour,
    SetMinute,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorPhase {
    Start,
    SensorHour,
    SensorDay,
    TooManySyncAttempts,
}

/// Messages consumed by the display task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    Button(ButtonEvent),
    Sync(SyncPhase),
    Error(ErrorPhase),
    /// RTC never set: run the full setup wizard
    ForceSetup,
}

impl DisplayEvent {
    pub const fn code(self) -> u16 {
        match self {
            Self::Button(ButtonEvent { button, press }) => {
                let base = match press {
                    Press::Short => 101,
                    Press::Long => 104,
                };
                base + match button {
                    Button::Set => 0,
                    Button::Inc => 1,
                    Button::Dec => 2,
                }
            }
            Self::Sync(phase) => match phase {
                SyncPhase::Start => 201,
                SyncPhase::SourceHour => 202,
                SyncPhase::SourceDay => 203,
                SyncPhase::SetHour => 204,
                SyncPhase::SetMinute => 205,
                SyncPhase::End => 206,
            },
            Self::Error(phase) => match phase {
                ErrorPhase::Start => 301,
                ErrorPhase::SensorHour => 307,
                ErrorPhase::SensorDay => 308,
                ErrorPhase::TooManySyncAttempts => 309,
            },
            Self::ForceSetup => 999,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        let event = match code {
            101 => Self::Button(ButtonEvent::short(Button::Set)),
            102 => Self::Button(ButtonEvent::short(Button::Inc)),
            103 => Self::Button(ButtonEvent::short(Button::Dec)),
            104 => Self::Button(ButtonEvent::long(Button::Set)),
            105 => Self::Button(ButtonEvent::long(Button::Inc)),
            106 => Self::Button(ButtonEvent::long(Button::Dec)),
            201 => Self::Sync(SyncPhase::Start),
            202 => Self::Sync(SyncPhase::SourceHour),
            203 => Self::Sync(SyncPhase::SourceDay),
            204 => Self::Sync(SyncPhase::SetHour),
            205 => Self::Sync(SyncPhase::SetMinute),
            206 => Self::Sync(SyncPhase::End),
            301 => Self::Error(ErrorPhase::Start),
            307 => Self::Error(ErrorPhase::SensorHour),
            308 => Self::Error(ErrorPhase::SensorDay),
            309 => Self::Error(ErrorPhase::TooManySyncAttempts),
            999 => Self::ForceSetup,
            _ => return None,
        };
        Some(event)
    }
}

/// Requests from the display task to the clock task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockCommand {
    /// Set the RTC time of day (date kept) and resynchronize
    SetTime(RtcTime),
    SetSilentHours(SilentHours),
    SetCalibration(Calibration),
    Resync,
}

/// Anything the clock controller can publish display events to
pub trait EventSink {
    fn emit(&mut self, event: DisplayEvent);
}

impl<const N: usize> EventSink for heapless::Vec<DisplayEvent, N> {
    fn emit(&mut self, event: DisplayEvent) {
        if self.push(event).is_err() {
            warn!("Event buffer full, dropped {}", event.code());
        }
    }
}

impl<M: RawMutex, const N: usize> EventSink for Sender<'_, M, DisplayEvent, N> {
    fn emit(&mut self, event: DisplayEvent) {
        if self.try_send(event).is_err() {
            warn!("Display channel full, dropped {}", event.code());
        }
    }
}

pub const DISPLAY_EVENT_DEPTH: usize = 16;
pub const CLOCK_COMMAND_DEPTH: usize = 4;

/// Channel into the display task
/// Using CriticalSectionRawMutex makes it safe across all RTIC priorities
pub static DISPLAY_EVENTS: Channel<CriticalSectionRawMutex, DisplayEvent, DISPLAY_EVENT_DEPTH> =
    Channel::new();

/// Channel into the clock task
pub static CLOCK_COMMANDS: Channel<CriticalSectionRawMutex, ClockCommand, CLOCK_COMMAND_DEPTH> =
    Channel::new();

/// Get a sender for display events (clock and button tasks)
pub fn display_sender(
) -> Sender<'static, CriticalSectionRawMutex, DisplayEvent, DISPLAY_EVENT_DEPTH> {
    DISPLAY_EVENTS.sender()
}

/// Get the display event receiver (display task only)
pub fn display_receiver(
) -> Receiver<'static, CriticalSectionRawMutex, DisplayEvent, DISPLAY_EVENT_DEPTH> {
    DISPLAY_EVENTS.receiver()
}

/// Get a sender for clock commands (display task)
pub fn command_sender(
) -> Sender<'static, CriticalSectionRawMutex, ClockCommand, CLOCK_COMMAND_DEPTH> {
    CLOCK_COMMANDS.sender()
}

/// Get the clock command receiver (clock task only)
pub fn command_receiver(
) -> Receiver<'static, CriticalSectionRawMutex, ClockCommand, CLOCK_COMMAND_DEPTH> {
    CLOCK_COMMANDS.receiver()
}
