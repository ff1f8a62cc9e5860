//! Clock task state machine
//!
//! Owns the RTC, the actuators, the sensors and the settings flash. It is
//! the single writer of MechPosition, LastTick and the settings record;
//! the display task talks to it only through `ClockCommand`s.
#![deny(unsafe_code)]

use cifra_hal::{
    Actuator, BackupDomain, Coil, PositionSensors, RtcClock, RtcDate, RtcDateTime, RtcTime,
    SettingsStorage,
};

use crate::backup::{self, BackupSnapshot, BackupState};
use crate::config::ClockConfig;
use crate::engine::Reconciler;
use crate::error::ClockError;
use crate::events::{ClockCommand, DisplayEvent, ErrorPhase, EventSink};
use crate::fmt::Debug2Format;
use crate::mechanism::{MechPosition, MechState};
use crate::settings::{Settings, SettingsFlash, SettingsSource};
use crate::sync::{self, SyncMode, SyncSupervisor};
use crate::{Devices, Stores};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPhase {
    /// The RTC holds no user-set time; waiting for `SetTime`
    AwaitingSetup,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncRequest {
    mode: SyncMode,
    /// Asked for by the user, so it runs even in the silent window
    user: bool,
}

pub struct ClockController<'a, R, A, P, S> {
    config: ClockConfig,
    devices: Devices<R, A, P>,
    settings: SettingsFlash<S>,
    stores: Stores<'a>,
    engine: Reconciler,
    supervisor: SyncSupervisor,
    phase: ClockPhase,
    sync_request: Option<SyncRequest>,
    retry_ticks: u32,
    position_known: bool,
    actuator_faults: u8,
}

impl<'a, R, A, P, S> ClockController<'a, R, A, P, S>
where
    R: RtcClock + BackupDomain,
    A: Actuator,
    P: PositionSensors,
    S: SettingsStorage,
{
    pub fn new(
        config: ClockConfig,
        devices: Devices<R, A, P>,
        settings: SettingsFlash<S>,
        stores: Stores<'a>,
    ) -> Self {
        let engine = Reconciler::new(&config);
        let supervisor = SyncSupervisor::new(config.max_sync_attempts);
        Self {
            config,
            devices,
            settings,
            stores,
            engine,
            supervisor,
            phase: ClockPhase::AwaitingSetup,
            sync_request: None,
            retry_ticks: 0,
            position_known: false,
            actuator_faults: 0,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn engine(&self) -> &Reconciler {
        &self.engine
    }

    pub fn sync_pending(&self) -> bool {
        self.sync_request.is_some()
    }

    #[cfg(test)]
    fn devices_mut(&mut self) -> &mut Devices<R, A, P> {
        &mut self.devices
    }

    #[cfg(test)]
    fn settings_mut(&mut self) -> &mut SettingsFlash<S> {
        &mut self.settings
    }

    /// Restore settings and work out where the flaps are
    pub fn boot<E: EventSink>(&mut self, events: &mut E) {
        let restored = self.settings.restore_settings();
        self.stores.calibration.set_calibration(restored.settings.calibration);
        self.stores.silent.set_silent_hours(restored.settings.silent_hours);

        match backup::load(&self.devices.rtc) {
            BackupState::Uninitialized => self.await_setup(events),
            BackupState::Initialized(snapshot) if snapshot.position_valid => {
                info!("Resuming from backup registers");
                self.resume(snapshot.last_tick, snapshot.coil);
            }
            BackupState::Initialized(_) => {
                info!("Mechanism position unknown, homing");
                self.start(SyncMode::Homing, false);
            }
            BackupState::Unsupported => match restored.source {
                SettingsSource::Stored if restored.settings.last_tick != RtcDateTime::EPOCH => {
                    info!("Resuming from flash record");
                    let coil = self.stores.mech.snapshot().coil;
                    self.resume(restored.settings.last_tick.to_epoch_seconds(), coil);
                }
                SettingsSource::Stored => self.start(SyncMode::Homing, false),
                _ => self.await_setup(events),
            },
        }
    }

    /// One pass of the 1 s clock cadence
    pub fn on_tick<E: EventSink>(&mut self, events: &mut E) -> Result<(), ClockError> {
        if self.phase == ClockPhase::AwaitingSetup {
            return Ok(());
        }
        if let Some(request) = self.sync_request {
            return self.try_sync(request, events);
        }

        match self.engine.tick(&mut self.devices, &self.stores) {
            Ok(report) => {
                if report.pending == 0 {
                    self.actuator_faults = 0;
                }
                if report.flush_due {
                    self.persist()?;
                }
                Ok(())
            }
            Err(ClockError::ActuatorFault) => {
                self.actuator_faults = self.actuator_faults.saturating_add(1);
                if self.actuator_faults >= self.config.max_actuator_faults {
                    error!("{} consecutive step faults, re-homing", self.actuator_faults);
                    self.lose_position();
                    self.start(SyncMode::Homing, false);
                }
                Err(ClockError::ActuatorFault)
            }
            Err(ClockError::MechanicalDrift) => {
                self.lose_position();
                if self.supervisor.record_failure().is_err() {
                    self.give_up(events);
                } else {
                    self.start(SyncMode::Homing, false);
                }
                Err(ClockError::MechanicalDrift)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply a request from the display task
    pub fn handle_command<E: EventSink>(
        &mut self,
        command: ClockCommand,
        events: &mut E,
    ) -> Result<(), ClockError> {
        info!("Clock command {:?}", command);
        match command {
            ClockCommand::SetTime(time) => self.set_time(time, events),
            ClockCommand::SetSilentHours(hours) => {
                self.stores.silent.set_silent_hours(hours);
                self.persist()
            }
            ClockCommand::SetCalibration(calibration) => {
                self.stores.calibration.set_calibration(calibration);
                self.persist()
            }
            ClockCommand::Resync => {
                if self.phase == ClockPhase::AwaitingSetup {
                    warn!("Resync ignored, time not set");
                    return Ok(());
                }
                self.start(self.sync_mode(), true);
                Ok(())
            }
        }
    }

    /// Write the settings record with the current LastTick
    pub fn persist(&mut self) -> Result<(), ClockError> {
        let settings = Settings {
            calibration: self.stores.calibration.calibration(),
            silent_hours: self.stores.silent.silent_hours(),
            last_tick: self.engine.last_tick(),
        };
        // A failed write is retried at the next flush interval
        self.engine.mark_flushed();
        self.settings.write_settings(&settings)
    }

    fn set_time<E: EventSink>(&mut self, time: RtcTime, events: &mut E) -> Result<(), ClockError> {
        let date = self
            .devices
            .rtc
            .now()
            .map(|now| now.date)
            .unwrap_or(RtcDate::EPOCH);
        if let Err(e) = self.devices.rtc.set(&RtcDateTime::new(date, time)) {
            error!("RTC set failed: {:?}", Debug2Format(&e));
            events.emit(DisplayEvent::Error(ErrorPhase::Start));
            return Err(ClockError::RtcUnavailable);
        }
        backup::mark_initialized(&mut self.devices.rtc);
        self.supervisor.record_success();
        self.phase = ClockPhase::Running;
        self.start(self.sync_mode(), true);
        Ok(())
    }

    fn try_sync<E: EventSink>(
        &mut self,
        request: SyncRequest,
        events: &mut E,
    ) -> Result<(), ClockError> {
        if self.retry_ticks > 0 {
            self.retry_ticks -= 1;
            return Ok(());
        }
        if !request.user {
            let now = self.devices.rtc.now().map_err(|e| {
                warn!("RTC read failed, sync postponed: {:?}", Debug2Format(&e));
                ClockError::RtcUnavailable
            })?;
            if self.stores.silent.observe_hour(now.time.hour()) {
                return Ok(());
            }
        }

        match sync::run(request.mode, &self.config, &mut self.devices, &self.stores, events) {
            Ok(outcome) => {
                self.supervisor.record_success();
                self.sync_request = None;
                self.position_known = true;
                self.actuator_faults = 0;
                self.engine.align(outcome.target);
                self.mirror(true);
                self.persist()
            }
            Err(e) => {
                if !matches!(e, ClockError::SensorError(_)) {
                    events.emit(DisplayEvent::Error(ErrorPhase::Start));
                }
                self.lose_position();
                if self.supervisor.record_failure().is_err() {
                    self.give_up(events);
                } else {
                    self.sync_request = Some(SyncRequest {
                        mode: SyncMode::Homing,
                        user: request.user,
                    });
                    self.retry_ticks = self.config.sync_retry_secs;
                }
                Err(e)
            }
        }
    }

    fn resume(&mut self, last_tick: u32, coil: Coil) {
        self.engine.resume(last_tick);
        let position = MechPosition::from_time(self.engine.last_tick().time, self.stores.mech.dial());
        self.stores.mech.restore(MechState { position, coil });
        self.position_known = true;
        self.phase = ClockPhase::Running;
        self.sync_request = None;
    }

    fn start(&mut self, mode: SyncMode, user: bool) {
        self.phase = ClockPhase::Running;
        self.retry_ticks = 0;
        self.sync_request = Some(SyncRequest { mode, user });
    }

    fn await_setup<E: EventSink>(&mut self, events: &mut E) {
        warn!("RTC not initialized, forcing setup");
        self.phase = ClockPhase::AwaitingSetup;
        self.sync_request = None;
        events.emit(DisplayEvent::ForceSetup);
    }

    fn give_up<E: EventSink>(&mut self, events: &mut E) {
        events.emit(DisplayEvent::Error(ErrorPhase::TooManySyncAttempts));
        self.phase = ClockPhase::AwaitingSetup;
        self.sync_request = None;
    }

    fn sync_mode(&self) -> SyncMode {
        if self.config.fast_sync && self.position_known {
            SyncMode::Fast
        } else {
            SyncMode::Homing
        }
    }

    fn lose_position(&mut self) {
        self.position_known = false;
        self.mirror(false);
    }

    fn mirror(&mut self, position_valid: bool) {
        backup::store(
            &mut self.devices.rtc,
            &BackupSnapshot {
                last_tick: self.engine.last_tick().to_epoch_seconds(),
                coil: self.stores.mech.snapshot().coil,
                position_valid,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::events::SyncPhase;
    use crate::mechanism::Dial;
    use crate::silent::SilentHours;
    use crate::testing::{datetime, FakeActuator, FakeRtc, FakeSensors, Physical, RamFlash, TestStores};
    use crate::ui::{UiContext, UiController, UiMode};
    use crate::config::UiConfig;
    use cifra_hal::NorFlashRegion;
    use core::cell::RefCell;
    use heapless::Vec;

    type TestController<'a> = ClockController<
        'a,
        FakeRtc,
        FakeActuator<'a>,
        FakeSensors<'a>,
        NorFlashRegion<RamFlash>,
    >;

    type Events = Vec<DisplayEvent, 32>;

    fn controller<'a>(
        phys: &'a RefCell<Physical>,
        stores: &'a TestStores,
        rtc: FakeRtc,
        config: ClockConfig,
    ) -> TestController<'a> {
        ClockController::new(
            config,
            Devices {
                rtc,
                actuator: FakeActuator::new(phys),
                sensors: FakeSensors::new(phys),
            },
            SettingsFlash::new(NorFlashRegion::new(RamFlash::new(), 0)),
            stores.stores(),
        )
    }

    fn rtc_with_mirror(now: RtcDateTime, last_tick: RtcDateTime, position_valid: bool) -> FakeRtc {
        let mut rtc = FakeRtc::new(now);
        backup::mark_initialized(&mut rtc);
        backup::store(
            &mut rtc,
            &BackupSnapshot {
                last_tick: last_tick.to_epoch_seconds(),
                coil: Coil::Tock,
                position_valid,
            },
        );
        rtc
    }

    #[test]
    fn test_first_boot_forces_setup() {
        let phys = RefCell::new(Physical::at(5, 5));
        let stores = TestStores::new(Dial::H24);
        let mut clock = controller(&phys, &stores, FakeRtc::new(datetime(0, 0, 0)), ClockConfig::default());
        let mut events = Events::new();

        clock.boot(&mut events);
        assert_eq!(events.as_slice(), &[DisplayEvent::ForceSetup]);
        assert_eq!(clock.phase(), ClockPhase::AwaitingSetup);

        clock.devices_mut().rtc.advance(600);
        clock.on_tick(&mut events).unwrap();
        assert_eq!(phys.borrow().minute_steps, 0);
    }

    #[test]
    fn test_boot_resumes_from_backup_mirror() {
        let phys = RefCell::new(Physical::at(10, 15));
        phys.borrow_mut().last_coil = Some(Coil::Tick);
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(10, 20, 30), datetime(10, 15, 0), true);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();

        clock.boot(&mut events);
        assert!(!clock.sync_pending());
        assert_eq!(stores.mech.snapshot().coil, Coil::Tock);

        clock.on_tick(&mut events).unwrap();
        assert!(events.is_empty());
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (10, 20));
        assert_eq!(phys.borrow().coil_errors, 0);
        assert_eq!(
            backup::load(&clock.devices_mut().rtc),
            BackupState::Initialized(BackupSnapshot {
                last_tick: datetime(10, 20, 0).to_epoch_seconds(),
                coil: Coil::Tick,
                position_valid: true,
            })
        );
    }

    #[test]
    fn test_unknown_position_is_homed() {
        let phys = RefCell::new(Physical::at(19, 47));
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(14, 2, 9), datetime(13, 0, 0), false);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();

        clock.boot(&mut events);
        clock.on_tick(&mut events).unwrap();

        assert_eq!(events.first(), Some(&DisplayEvent::Sync(SyncPhase::Start)));
        assert_eq!(events.last(), Some(&DisplayEvent::Sync(SyncPhase::End)));
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (14, 2));
        assert!(!clock.sync_pending());

        // LastTick committed to flash with the sync
        let restored = clock.settings_mut().restore_settings();
        assert_eq!(restored.settings.last_tick, datetime(14, 2, 0));
    }

    #[test]
    fn test_set_time_runs_user_sync() {
        let phys = RefCell::new(Physical::at(0, 0));
        let stores = TestStores::new(Dial::H24);
        let mut clock = controller(&phys, &stores, FakeRtc::new(datetime(0, 0, 0)), ClockConfig::default());
        let mut events = Events::new();
        clock.boot(&mut events);
        // Time set inside the default silent window still syncs
        let time = RtcTime::new(23, 30, 0).unwrap();
        clock.handle_command(ClockCommand::SetTime(time), &mut events).unwrap();
        assert_eq!(clock.phase(), ClockPhase::Running);
        assert!(matches!(backup::load(&clock.devices_mut().rtc), BackupState::Initialized(_)));

        clock.on_tick(&mut events).unwrap();
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (23, 30));
        assert_eq!(clock.devices_mut().rtc.now, datetime(23, 30, 0));
    }

    #[test]
    fn test_background_sync_waits_for_silence_to_end() {
        let phys = RefCell::new(Physical::at(4, 0));
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(23, 0, 0), datetime(22, 0, 0), false);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();

        clock.boot(&mut events);
        clock.on_tick(&mut events).unwrap();
        assert!(events.is_empty());
        assert!(clock.sync_pending());

        clock.devices_mut().rtc.advance(10 * 3600);
        clock.on_tick(&mut events).unwrap();
        assert!(!clock.sync_pending());
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (9, 0));
    }

    #[test]
    fn test_three_failed_syncs_force_setup() {
        let phys = RefCell::new(Physical::at(8, 20));
        phys.borrow_mut().day_sensor_dead = true;
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(12, 0, 0), datetime(12, 0, 0), false);
        let config = ClockConfig {
            sync_retry_secs: 0,
            ..ClockConfig::default()
        };
        let mut clock = controller(&phys, &stores, rtc, config);
        let mut ui = UiController::new(UiConfig::default());
        let mut events = Events::new();

        clock.boot(&mut events);
        stores.calibration.set_calibration(Calibration::new(-40).unwrap());
        for _ in 0..5 {
            let _ = clock.on_tick(&mut events);
        }

        let too_many = events
            .iter()
            .filter(|e| **e == DisplayEvent::Error(ErrorPhase::TooManySyncAttempts))
            .count();
        assert_eq!(too_many, 1);
        let day_errors = events
            .iter()
            .filter(|e| **e == DisplayEvent::Error(ErrorPhase::SensorDay))
            .count();
        assert_eq!(day_errors, 3);
        assert_eq!(clock.phase(), ClockPhase::AwaitingSetup);
        assert_eq!(stores.mech.position(), MechPosition::ZERO);
        assert_eq!(stores.calibration.calibration().value(), -40);

        let ctx = UiContext::from_stores(&stores.stores());
        for event in &events {
            ui.handle(*event, &ctx, 0);
        }
        assert!(matches!(ui.mode(), UiMode::ForcedSetup(_)));
    }

    #[test]
    fn test_failed_sync_waits_before_retry() {
        let phys = RefCell::new(Physical::at(8, 20));
        phys.borrow_mut().hour_sensor_dead = true;
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(12, 0, 0), datetime(12, 0, 0), false);
        let config = ClockConfig {
            sync_retry_secs: 2,
            ..ClockConfig::default()
        };
        let mut clock = controller(&phys, &stores, rtc, config);
        let mut events = Events::new();
        clock.boot(&mut events);

        assert!(clock.on_tick(&mut events).is_err());
        let steps = phys.borrow().minute_steps;
        assert_eq!(clock.on_tick(&mut events), Ok(()));
        assert_eq!(clock.on_tick(&mut events), Ok(()));
        assert_eq!(phys.borrow().minute_steps, steps);
        assert!(clock.on_tick(&mut events).is_err());
        assert_eq!(phys.borrow().minute_steps, steps * 2);
    }

    #[test]
    fn test_resync_skips_retry_wait() {
        let phys = RefCell::new(Physical::at(8, 20));
        phys.borrow_mut().hour_sensor_dead = true;
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(12, 0, 0), datetime(12, 0, 0), false);
        let config = ClockConfig {
            sync_retry_secs: 3600,
            ..ClockConfig::default()
        };
        let mut clock = controller(&phys, &stores, rtc, config);
        let mut events = Events::new();
        clock.boot(&mut events);
        assert!(clock.on_tick(&mut events).is_err());

        phys.borrow_mut().hour_sensor_dead = false;
        clock.handle_command(ClockCommand::Resync, &mut events).unwrap();
        clock.on_tick(&mut events).unwrap();
        assert!(!clock.sync_pending());
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (12, 0));
    }

    #[test]
    fn test_settings_commands_persist() {
        let phys = RefCell::new(Physical::at(7, 0));
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(7, 0, 0), datetime(7, 0, 0), true);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();
        clock.boot(&mut events);

        let hours = SilentHours::new(1, 6).unwrap();
        clock
            .handle_command(ClockCommand::SetSilentHours(hours), &mut events)
            .unwrap();
        clock
            .handle_command(
                ClockCommand::SetCalibration(Calibration::new(-300).unwrap()),
                &mut events,
            )
            .unwrap();

        assert!(stores.silent.silent_hours().contains(3));
        let restored = clock.settings_mut().restore_settings();
        assert_eq!(restored.source, SettingsSource::Stored);
        assert_eq!(restored.settings.silent_hours, hours);
        assert_eq!(restored.settings.calibration.value(), -300);
        assert_eq!(restored.settings.last_tick, datetime(7, 0, 0));
    }

    #[test]
    fn test_actuator_faults_escalate_to_homing() {
        let phys = RefCell::new(Physical::at(9, 0));
        let stores = TestStores::new(Dial::H24);
        let rtc = rtc_with_mirror(datetime(9, 0, 0), datetime(9, 0, 0), true);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();
        clock.boot(&mut events);

        phys.borrow_mut().fail_minute_steps = true;
        clock.devices_mut().rtc.advance(60);
        for _ in 0..2 {
            assert_eq!(clock.on_tick(&mut events), Err(ClockError::ActuatorFault));
            assert!(!clock.sync_pending());
        }
        assert_eq!(clock.on_tick(&mut events), Err(ClockError::ActuatorFault));
        assert!(clock.sync_pending());
        assert!(matches!(
            backup::load(&clock.devices_mut().rtc),
            BackupState::Initialized(BackupSnapshot {
                position_valid: false,
                ..
            })
        ));

        phys.borrow_mut().fail_minute_steps = false;
        clock.on_tick(&mut events).unwrap();
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (9, 1));
        assert!(events.contains(&DisplayEvent::Sync(SyncPhase::SourceDay)));
    }

    #[test]
    fn test_drift_triggers_resync() {
        let phys = RefCell::new(Physical::at(11, 59));
        let stores = TestStores::new(Dial::H24);
        // Flaps are really at 11:59 but the mirror says 11:30
        let rtc = rtc_with_mirror(datetime(11, 30, 0), datetime(11, 30, 0), true);
        let mut clock = controller(&phys, &stores, rtc, ClockConfig::default());
        let mut events = Events::new();
        clock.boot(&mut events);

        clock.devices_mut().rtc.advance(60);
        assert_eq!(clock.on_tick(&mut events), Err(ClockError::MechanicalDrift));
        assert!(clock.sync_pending());

        clock.on_tick(&mut events).unwrap();
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (11, 31));
        assert_eq!(stores.mech.position(), MechPosition::new(11, 31, Dial::H24).unwrap());
    }

    #[test]
    fn test_flash_fallback_without_backup_registers() {
        struct PlainRtc(FakeRtc);

        impl RtcClock for PlainRtc {
            type Error = <FakeRtc as RtcClock>::Error;

            fn now(&mut self) -> Result<RtcDateTime, Self::Error> {
                self.0.now()
            }

            fn set(&mut self, datetime: &RtcDateTime) -> Result<(), Self::Error> {
                self.0.set(datetime)
            }
        }

        impl BackupDomain for PlainRtc {
            fn read_backup(&self, _index: usize) -> Option<u32> {
                None
            }

            fn write_backup(&mut self, _index: usize, _value: u32) {}
        }

        let phys = RefCell::new(Physical::at(16, 40));
        let stores = TestStores::new(Dial::H24);
        let mut flash = RamFlash::new();
        let record = Settings {
            last_tick: datetime(16, 40, 0),
            ..Settings::default()
        }
        .encode();
        flash.load(0, &record);

        let mut clock = ClockController::new(
            ClockConfig::default(),
            Devices {
                rtc: PlainRtc(FakeRtc::new(datetime(16, 43, 5))),
                actuator: FakeActuator::new(&phys),
                sensors: FakeSensors::new(&phys),
            },
            SettingsFlash::new(NorFlashRegion::new(flash, 0)),
            stores.stores(),
        );
        let mut events = Events::new();
        clock.boot(&mut events);
        assert_eq!(clock.phase(), ClockPhase::Running);
        assert!(!clock.sync_pending());

        clock.on_tick(&mut events).unwrap();
        assert_eq!((phys.borrow().hour, phys.borrow().minute), (16, 43));
    }
}
