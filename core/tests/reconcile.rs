//! Reconciliation against a simulated mechanism, through the public API

use core::cell::RefCell;
use core::convert::Infallible;

use cifra_core::calibration::{Calibration, CalibrationStore, CALIBRATION_SHIFT};
use cifra_core::config::ClockConfig;
use cifra_core::engine::{EngineState, Reconciler};
use cifra_core::mechanism::{Dial, MechStore};
use cifra_core::silent::{SilentHours, SilentHoursStore};
use cifra_core::ui::UiContext;
use cifra_core::{
    Button, ButtonEvent, Devices, DisplayEvent, Stores, UiConfig, UiController, UiMode, UiOutcome,
};
use cifra_hal::{
    Actuator, BackupDomain, Coil, PositionSensors, RtcClock, RtcDate, RtcDateTime, RtcTime,
};
use proptest::prelude::*;

/// Minute of the day the flaps show
struct Flaps(RefCell<u32>);

struct Coils<'a>(&'a Flaps);

impl Actuator for Coils<'_> {
    type Error = Infallible;

    fn step_minute(&mut self, _coil: Coil) -> Result<(), Infallible> {
        let mut minute = self.0 .0.borrow_mut();
        *minute = (*minute + 1) % 1440;
        Ok(())
    }

    fn step_hour(&mut self) -> Result<(), Infallible> {
        let mut minute = self.0 .0.borrow_mut();
        *minute = (*minute + 60) % 1440;
        Ok(())
    }
}

struct Reeds<'a>(&'a Flaps);

impl PositionSensors for Reeds<'_> {
    type Error = Infallible;

    fn hour_mark(&mut self) -> Result<bool, Infallible> {
        Ok(*self.0 .0.borrow() % 60 == 0)
    }

    fn day_mark(&mut self) -> Result<bool, Infallible> {
        Ok(*self.0 .0.borrow() < 60)
    }
}

struct Rtc(u32);

impl RtcClock for Rtc {
    type Error = Infallible;

    fn now(&mut self) -> Result<RtcDateTime, Infallible> {
        Ok(RtcDateTime::from_epoch_seconds(self.0))
    }

    fn set(&mut self, datetime: &RtcDateTime) -> Result<(), Infallible> {
        self.0 = datetime.to_epoch_seconds();
        Ok(())
    }
}

impl BackupDomain for Rtc {
    fn read_backup(&self, _index: usize) -> Option<u32> {
        None
    }

    fn write_backup(&mut self, _index: usize, _value: u32) {}
}

fn minute_of_day(secs: u32) -> u32 {
    secs % 86_400 / 60
}

fn start_secs(hour: u8, minute: u8, second: u8) -> u32 {
    RtcDateTime::new(
        RtcDate::new(2031, 6, 14).unwrap(),
        RtcTime::new(hour, minute, second).unwrap(),
    )
    .to_epoch_seconds()
}

proptest! {
    #[test]
    fn test_silent_steps_are_deferred_not_lost(
        start_hour in 0u8..24,
        start_minute in 0u8..60,
        second in 0u8..60,
        silent_start in 0u8..24,
        silent_end in 0u8..24,
        gaps in prop::collection::vec(1u32..900, 1..80),
    ) {
        let flaps = Flaps(RefCell::new(u32::from(start_hour) * 60 + u32::from(start_minute)));
        let mech = MechStore::new(Dial::H24);
        mech.set_position(start_hour, start_minute).unwrap();
        let calibration = CalibrationStore::new();
        let silent = SilentHoursStore::new();
        let window = SilentHours::new(silent_start, silent_end).unwrap();
        silent.set_silent_hours(window);
        let stores = Stores { mech: &mech, calibration: &calibration, silent: &silent };

        let now = start_secs(start_hour, start_minute, second);
        let mut devices = Devices { rtc: Rtc(now), actuator: Coils(&flaps), sensors: Reeds(&flaps) };
        let config = ClockConfig { drift_detection: false, ..ClockConfig::default() };
        let mut engine = Reconciler::new(&config);
        engine.align(RtcDateTime::from_epoch_seconds(now));

        for gap in gaps {
            let before = *flaps.0.borrow();
            devices.rtc.0 += gap;
            let report = engine.tick(&mut devices, &stores).unwrap();
            let shown = *flaps.0.borrow();

            if window.contains((devices.rtc.0 % 86_400 / 3600) as u8) {
                prop_assert_eq!(shown, before);
                prop_assert!(report.pending == 0 || report.state == EngineState::Silenced);
            } else {
                prop_assert_eq!(shown, minute_of_day(devices.rtc.0));
                prop_assert_eq!(report.pending, 0);
            }
            let position = mech.position();
            prop_assert_eq!(u32::from(position.hour()) * 60 + u32::from(position.minute()), shown);
        }
    }

    #[test]
    fn test_calibrated_flaps_track_rebased_rtc(
        value in -511i16..=511,
        start_hour in 0u8..24,
        start_minute in 0u8..60,
        second in 0u8..60,
        gaps in prop::collection::vec(1u32..600, 1..60),
    ) {
        let flaps = Flaps(RefCell::new(u32::from(start_hour) * 60 + u32::from(start_minute)));
        let mech = MechStore::new(Dial::H24);
        mech.set_position(start_hour, start_minute).unwrap();
        let calibration = CalibrationStore::new();
        calibration.set_calibration(Calibration::new(value).unwrap());
        let silent = SilentHoursStore::new();
        silent.set_silent_hours(SilentHours::new(3, 3).unwrap());
        let stores = Stores { mech: &mech, calibration: &calibration, silent: &silent };

        let start = start_secs(start_hour, start_minute, second);
        let mut devices = Devices { rtc: Rtc(start), actuator: Coils(&flaps), sensors: Reeds(&flaps) };
        let mut engine = Reconciler::new(&ClockConfig::default());
        engine.align(RtcDateTime::from_epoch_seconds(start));

        let mut nominal = 0i64;
        for gap in gaps {
            devices.rtc.0 += gap;
            nominal += i64::from(gap);
            let report = engine.tick(&mut devices, &stores).unwrap();
            prop_assert_eq!(report.pending, 0);

            // Whole seconds of correction land in the RTC, the rest stays owed
            let correction_ms = (i64::from(value) * nominal * 1000) >> CALIBRATION_SHIFT;
            let calibrated_ms = (i64::from(start) + nominal) * 1000 + correction_ms;
            prop_assert_eq!(
                i64::from(devices.rtc.0),
                i64::from(start) + nominal + correction_ms / 1000
            );
            let shown = *flaps.0.borrow();
            prop_assert_eq!(i64::from(shown), calibrated_ms.div_euclid(60_000) % 1440);
            prop_assert_eq!(u32::from(mech.hours()) * 60 + u32::from(mech.minutes()), shown);
        }
    }
}

#[test]
fn test_day_rollover() {
    let flaps = Flaps(RefCell::new(23 * 60 + 58));
    let mech = MechStore::new(Dial::H24);
    mech.set_position(23, 58).unwrap();
    let calibration = CalibrationStore::new();
    let silent = SilentHoursStore::new();
    silent.set_silent_hours(SilentHours::new(3, 3).unwrap());
    let stores = Stores {
        mech: &mech,
        calibration: &calibration,
        silent: &silent,
    };

    let now = start_secs(23, 58, 30);
    let mut devices = Devices {
        rtc: Rtc(now),
        actuator: Coils(&flaps),
        sensors: Reeds(&flaps),
    };
    let mut engine = Reconciler::new(&ClockConfig::default());
    engine.align(RtcDateTime::from_epoch_seconds(now));

    devices.rtc.0 += 3 * 60;
    engine.tick(&mut devices, &stores).unwrap();
    assert_eq!(*flaps.0.borrow(), 1);
    assert_eq!(engine.last_tick().time, RtcTime::new(0, 1, 0).unwrap());
    assert_eq!(engine.last_tick().date, RtcDate::new(2031, 6, 15).unwrap());
}

#[test]
fn test_time_entry_blocked_while_flaps_held() {
    let flaps = Flaps(RefCell::new(21 * 60 + 58));
    let mech = MechStore::new(Dial::H24);
    mech.set_position(21, 58).unwrap();
    let calibration = CalibrationStore::new();
    let silent = SilentHoursStore::new();
    let stores = Stores {
        mech: &mech,
        calibration: &calibration,
        silent: &silent,
    };

    let now = start_secs(21, 58, 0);
    let mut devices = Devices {
        rtc: Rtc(now),
        actuator: Coils(&flaps),
        sensors: Reeds(&flaps),
    };
    let config = ClockConfig {
        drift_detection: false,
        ..ClockConfig::default()
    };
    let mut engine = Reconciler::new(&config);
    engine.align(RtcDateTime::from_epoch_seconds(now));

    let mut ui = UiController::new(UiConfig::default());
    let set_long = DisplayEvent::Button(ButtonEvent::long(Button::Set));

    devices.rtc.0 += 60;
    engine.tick(&mut devices, &stores).unwrap();
    devices.rtc.0 += 92 * 60;
    let report = engine.tick(&mut devices, &stores).unwrap();
    assert_eq!(report.state, EngineState::Silenced);
    assert_eq!((mech.hours(), mech.minutes()), (21, 59));

    let outcome = ui.handle(set_long, &UiContext::from_stores(&stores), 0);
    assert_eq!(outcome, UiOutcome::Ignored);
    assert_eq!(ui.mode(), UiMode::Normal);

    // 09:00 ends the window; entry is possible again
    devices.rtc.0 += 9 * 3600 + 29 * 60;
    engine.tick(&mut devices, &stores).unwrap();
    assert_eq!((mech.hours(), mech.minutes()), (9, 0));
    let outcome = ui.handle(set_long, &UiContext::from_stores(&stores), 0);
    assert_eq!(outcome, UiOutcome::Updated);
}
