//! Synchronization sequence
//!
//! Drives the flaps from an unknown (or merely stale) position to the
//! current RTC time:
//!
//! 1. `SourceHour`: step minutes until the :00 mark rises (homing only)
//! 2. `SourceDay`: step hours until the 00 mark appears (homing only),
//!    then read back the RTC calendar; an unreadable date aborts here
//! 3. `SetHour`: step hours up to the RTC hour
//! 4. `SetMinute`: step minutes up to the RTC minute
//!
//! Steps are counted on a scratch `MechStore`. The shared store is only
//! written at `End`, so an aborted attempt leaves it untouched. The coil
//! polarity is the exception: it follows the physical coil whatever
//! happens, otherwise the next pulse would be lost.
#![deny(unsafe_code)]

use cifra_hal::{Actuator, PositionSensors, RtcClock, RtcDateTime};

use crate::config::ClockConfig;
use crate::error::{ClockError, SensorKind};
use crate::events::{DisplayEvent, ErrorPhase, EventSink, SyncPhase};
use crate::fmt::Debug2Format;
use crate::mechanism::{MechPosition, MechState, MechStore};
use crate::{Devices, Stores};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncMode {
    /// Find the zero reference with the sensors first
    Homing,
    /// Trust the stored position and only move forward from it
    Fast,
}

/// Successful synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncOutcome {
    /// RTC reading the flaps were driven to
    pub target: RtcDateTime,
    pub state: MechState,
}

/// Counts consecutive failed attempts
#[derive(Debug)]
pub struct SyncSupervisor {
    max_attempts: u8,
    failures: u8,
}

impl SyncSupervisor {
    pub const fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts,
            failures: 0,
        }
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures >= self.max_attempts
    }

    /// Count a failure; `Err(SyncExhausted)` exactly once, on the attempt
    /// that reaches the limit
    pub fn record_failure(&mut self) -> Result<(), ClockError> {
        if self.is_exhausted() {
            return Ok(());
        }
        self.failures += 1;
        if self.is_exhausted() {
            error!("{} consecutive sync failures", self.failures);
            return Err(ClockError::SyncExhausted);
        }
        Ok(())
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }
}

fn read_mark<P: PositionSensors>(sensors: &mut P, kind: SensorKind) -> Result<bool, ClockError> {
    let level = match kind {
        SensorKind::Hour => sensors.hour_mark(),
        SensorKind::Day => sensors.day_mark(),
    };
    level.map_err(|e| {
        warn!("{:?} sensor read failed: {:?}", kind, Debug2Format(&e));
        ClockError::SensorError(kind)
    })
}

/// Run one synchronization attempt
///
/// Emits the sync phases as they start, and on a sensor failure an error
/// start followed by the matching sensor error.
pub fn run<R, A, P, E>(
    mode: SyncMode,
    config: &ClockConfig,
    devices: &mut Devices<R, A, P>,
    stores: &Stores<'_>,
    events: &mut E,
) -> Result<SyncOutcome, ClockError>
where
    R: RtcClock,
    A: Actuator,
    P: PositionSensors,
    E: EventSink,
{
    info!("Sync started ({:?})", mode);
    events.emit(DisplayEvent::Sync(SyncPhase::Start));

    let staged = MechStore::new(stores.mech.dial());
    staged.restore(stores.mech.snapshot());

    let result = drive(mode, config, devices, &staged, events);
    let state = staged.snapshot();
    stores.mech.set_coil(state.coil);

    match result {
        Ok(target) => {
            stores.mech.restore(state);
            events.emit(DisplayEvent::Sync(SyncPhase::End));
            info!("Sync complete at {}:{}", state.position.hour(), state.position.minute());
            Ok(SyncOutcome { target, state })
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            if let ClockError::SensorError(kind) = e {
                events.emit(DisplayEvent::Error(ErrorPhase::Start));
                events.emit(DisplayEvent::Error(match kind {
                    SensorKind::Hour => ErrorPhase::SensorHour,
                    SensorKind::Day => ErrorPhase::SensorDay,
                }));
            }
            Err(e)
        }
    }
}

fn drive<R, A, P, E>(
    mode: SyncMode,
    config: &ClockConfig,
    devices: &mut Devices<R, A, P>,
    staged: &MechStore,
    events: &mut E,
) -> Result<RtcDateTime, ClockError>
where
    R: RtcClock,
    A: Actuator,
    P: PositionSensors,
    E: EventSink,
{
    match mode {
        SyncMode::Homing => {
            events.emit(DisplayEvent::Sync(SyncPhase::SourceHour));
            find_hour_mark(config, devices, staged)?;

            events.emit(DisplayEvent::Sync(SyncPhase::SourceDay));
            hours_run(&mut devices.actuator, |actuator| {
                find_day_mark(config, actuator, &mut devices.sensors, staged)
            })?;
            staged.reset();
        }
        SyncMode::Fast => {
            // Known position: roll forward to the next full hour
            while staged.position().minute() != 0 {
                staged.increment_minute(&mut devices.actuator)?;
            }
        }
    }

    // The calendar must read back valid before any hour is driven
    let target = devices.rtc.now().map_err(|e| {
        warn!("RTC date invalid or unreadable during sync: {:?}", Debug2Format(&e));
        ClockError::RtcUnavailable
    })?;
    debug!(
        "Sync target {}-{}-{}",
        target.date.year(),
        target.date.month(),
        target.date.day()
    );

    events.emit(DisplayEvent::Sync(SyncPhase::SetHour));
    let goal = MechPosition::from_time(target.time, staged.dial());
    hours_run(&mut devices.actuator, |actuator| {
        while staged.position().hour() != goal.hour() {
            staged.increment_hour(actuator)?;
        }
        Ok(())
    })?;

    events.emit(DisplayEvent::Sync(SyncPhase::SetMinute));
    while staged.position().minute() != goal.minute() {
        staged.increment_minute(&mut devices.actuator)?;
    }
    Ok(target)
}

/// Step minutes until the :00 mark rises
fn find_hour_mark<R, A, P>(
    config: &ClockConfig,
    devices: &mut Devices<R, A, P>,
    staged: &MechStore,
) -> Result<(), ClockError>
where
    A: Actuator,
    P: PositionSensors,
{
    for _ in 0..config.hour_mark_search_limit {
        let before = read_mark(&mut devices.sensors, SensorKind::Hour)?;
        staged.increment_minute(&mut devices.actuator)?;
        if !before && read_mark(&mut devices.sensors, SensorKind::Hour)? {
            // Hour drum position is still unknown, only minutes are homed
            staged.set_position(staged.hours(), 0)?;
            return Ok(());
        }
    }
    Err(ClockError::SensorError(SensorKind::Hour))
}

/// Step hours until the 00 mark appears
fn find_day_mark<A, P>(
    config: &ClockConfig,
    actuator: &mut A,
    sensors: &mut P,
    staged: &MechStore,
) -> Result<(), ClockError>
where
    A: Actuator,
    P: PositionSensors,
{
    for _ in 0..config.day_mark_search_limit {
        let before = read_mark(sensors, SensorKind::Day)?;
        staged.increment_hour(actuator)?;
        if !before && read_mark(sensors, SensorKind::Day)? {
            return Ok(());
        }
    }
    Err(ClockError::SensorError(SensorKind::Day))
}

/// Engage the hour drive around `f`, releasing it even when `f` fails
fn hours_run<A: Actuator>(
    actuator: &mut A,
    f: impl FnOnce(&mut A) -> Result<(), ClockError>,
) -> Result<(), ClockError> {
    actuator.engage_hours().map_err(|e| {
        warn!("Hour drive engage failed: {:?}", Debug2Format(&e));
        ClockError::ActuatorFault
    })?;
    let result = f(actuator);
    let released = actuator.release_hours().map_err(|e| {
        warn!("Hour drive release failed: {:?}", Debug2Format(&e));
        ClockError::ActuatorFault
    });
    result.and(released)
}
