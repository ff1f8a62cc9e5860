//! RTC reconciliation engine
//!
//! Every pass reads the RTC, turns the seconds elapsed since the previous
//! pass into calibrated milliseconds and issues one minute step for each
//! minute boundary those milliseconds cross.
//!
//! Bookkeeping:
//! - `cursor`: RTC second up to which time has been accounted for.
//! - `boundary`: the instant the minute currently shown on the flaps
//!   began. This is LastTick; it moves forward 60 s per confirmed step.
//! - `phase_ms`: calibrated time since the latest due boundary.
//! - `pending`: steps that are due but not yet taken.
//! - `skew_ms`: calibrated minus nominal time. Whole seconds of skew are
//!   pushed into the RTC so the RTC, the display and the flaps share
//!   one time base.
//!
//! Inside the silent window steps accumulate in `pending` and are all
//! taken, in order, on the first pass after the window closes.
#![deny(unsafe_code)]

use cifra_hal::{Actuator, BackupDomain, PositionSensors, RtcClock, RtcDateTime};

use crate::backup::{self, BackupSnapshot};
use crate::calibration::CalibrationStore;
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::fmt::Debug2Format;
use crate::mechanism::Dial;
use crate::{Devices, Stores};

/// Nominal length of one RTC tick
pub const TICK_MS: u32 = 1000;

const MINUTE_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// Flaps match the RTC
    Idle,
    /// Steps are being taken, or a step failed and will be retried
    Reconciling,
    /// Steps are due but held back by the silent window
    Silenced,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub state: EngineState,
    /// Minute steps confirmed during this pass
    pub stepped: u32,
    /// Steps still owed
    pub pending: u32,
    /// LastTick should be written to flash now
    pub flush_due: bool,
}

pub struct Reconciler {
    dial: Dial,
    flush_interval_secs: u32,
    drift_detection: bool,
    state: EngineState,
    cursor: u32,
    boundary: u32,
    phase_ms: u64,
    skew_ms: i64,
    pending: u32,
    last_flush: Option<u32>,
}

impl Reconciler {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            dial: config.dial,
            flush_interval_secs: config.flush_interval_secs,
            drift_detection: config.drift_detection,
            state: EngineState::Idle,
            cursor: 0,
            boundary: 0,
            phase_ms: 0,
            skew_ms: 0,
            pending: 0,
            last_flush: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Instant the flaps were last known to be correct
    pub fn last_tick(&self) -> RtcDateTime {
        RtcDateTime::from_epoch_seconds(self.boundary)
    }

    /// Continue from a persisted LastTick, the flaps showing its minute
    pub fn resume(&mut self, last_tick: u32) {
        self.boundary = last_tick - last_tick % 60;
        self.cursor = self.boundary;
        self.phase_ms = 0;
        self.skew_ms = 0;
        self.pending = 0;
        self.last_flush = Some(self.boundary);
        self.state = EngineState::Idle;
    }

    /// Restart bookkeeping after the flaps were driven to `now`
    pub fn align(&mut self, now: RtcDateTime) {
        let secs = now.to_epoch_seconds();
        let second = u32::from(now.time.second());
        self.boundary = secs - second;
        self.cursor = secs;
        self.phase_ms = u64::from(second) * 1000;
        self.skew_ms = 0;
        self.pending = 0;
        self.last_flush = None;
        self.state = EngineState::Idle;
    }

    /// LastTick has been persisted (or the attempt is over)
    pub fn mark_flushed(&mut self) {
        self.last_flush = Some(self.boundary);
    }

    /// One reconciliation pass
    ///
    /// An RTC read failure skips the pass. A step failure stops the pass
    /// with the remaining steps still pending; LastTick never moves past
    /// an unconfirmed step.
    pub fn tick<R, A, P>(
        &mut self,
        devices: &mut Devices<R, A, P>,
        stores: &Stores<'_>,
    ) -> Result<TickReport, ClockError>
    where
        R: RtcClock + BackupDomain,
        A: Actuator,
        P: PositionSensors,
    {
        let now = devices.rtc.now().map_err(|e| {
            warn!("RTC read failed, skipping tick: {:?}", Debug2Format(&e));
            ClockError::RtcUnavailable
        })?;
        let now_secs = now.to_epoch_seconds();
        if now_secs < self.cursor {
            debug!("RTC behind reconciled time, holding");
            return Ok(self.report(0));
        }

        self.accumulate(now_secs - self.cursor, stores.calibration);
        self.cursor = now_secs;
        self.rebase(&mut devices.rtc);
        self.fold_whole_turns();

        let hour = RtcDateTime::from_epoch_seconds(self.cursor).time.hour();
        if stores.silent.observe_hour(hour) {
            if self.state != EngineState::Silenced {
                info!("Silent period, holding the flaps");
            }
            self.state = EngineState::Silenced;
            return Ok(self.report(0));
        }
        if self.state == EngineState::Silenced && self.pending > 0 {
            info!("Silent period over, catching up {} steps", self.pending);
        }

        let mut stepped = 0;
        while self.pending > 0 {
            self.state = EngineState::Reconciling;
            self.step(devices, stores)?;
            stepped += 1;
        }
        self.state = EngineState::Idle;
        Ok(self.report(stepped))
    }

    fn accumulate(&mut self, elapsed_secs: u32, calibration: &CalibrationStore) {
        // Anything beyond one turn of the dial is settled in one go
        let turn_secs = self.dial.minutes_per_turn() * 60;
        let (bulk, ticks) = if elapsed_secs > turn_secs {
            (elapsed_secs - turn_secs, turn_secs)
        } else {
            (0, elapsed_secs)
        };

        if bulk > 0 {
            let nominal = u64::from(bulk) * u64::from(TICK_MS);
            let correction = calibration.apply_span(nominal);
            self.advance(nominal, correction);
        }
        for _ in 0..ticks {
            let corrected = calibration.apply_calibration(TICK_MS);
            self.advance(
                u64::from(TICK_MS),
                i64::from(corrected) - i64::from(TICK_MS),
            );
        }
    }

    fn advance(&mut self, nominal_ms: u64, correction_ms: i64) {
        self.skew_ms += correction_ms;
        self.phase_ms += (nominal_ms as i64 + correction_ms).max(0) as u64;
        self.pending += (self.phase_ms / MINUTE_MS) as u32;
        self.phase_ms %= MINUTE_MS;
    }

    fn rebase<R: RtcClock>(&mut self, rtc: &mut R) {
        let whole_secs = self.skew_ms / 1000;
        if whole_secs == 0 {
            return;
        }
        let target = (i64::from(self.cursor) + whole_secs).clamp(0, i64::from(u32::MAX)) as u32;
        match rtc.set(&RtcDateTime::from_epoch_seconds(target)) {
            Ok(()) => {
                self.cursor = target;
                self.skew_ms -= whole_secs * 1000;
                debug!("RTC re-based by {} s", whole_secs);
            }
            Err(e) => warn!("RTC re-base failed: {:?}", Debug2Format(&e)),
        }
    }

    fn fold_whole_turns(&mut self) {
        let turn = self.dial.minutes_per_turn();
        if self.pending >= turn {
            let turns = self.pending / turn;
            self.pending -= turns * turn;
            self.boundary += turns * turn * 60;
            info!("Skipping {} full turns of the dial", turns);
        }
    }

    fn step<R, A, P>(
        &mut self,
        devices: &mut Devices<R, A, P>,
        stores: &Stores<'_>,
    ) -> Result<(), ClockError>
    where
        R: RtcClock + BackupDomain,
        A: Actuator,
        P: PositionSensors,
    {
        let mark_before = if self.drift_detection {
            devices.sensors.hour_mark().ok()
        } else {
            None
        };

        let position = stores.mech.increment_minute(&mut devices.actuator)?;
        self.pending -= 1;
        self.boundary += 60;
        backup::store(
            &mut devices.rtc,
            &BackupSnapshot {
                last_tick: self.boundary,
                coil: stores.mech.snapshot().coil,
                position_valid: true,
            },
        );

        if mark_before == Some(false)
            && matches!(devices.sensors.hour_mark(), Ok(true))
            && position.minute() != 0
        {
            warn!("Hour mark seen at minute {}", position.minute());
            return Err(ClockError::MechanicalDrift);
        }
        Ok(())
    }

    fn report(&self, stepped: u32) -> TickReport {
        let flush_due = self.pending == 0
            && self
                .last_flush
                .is_none_or(|at| self.boundary.saturating_sub(at) >= self.flush_interval_secs);
        TickReport {
            state: self.state,
            stepped,
            pending: self.pending,
            flush_due,
        }
    }
}
