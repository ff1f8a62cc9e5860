//! Internal RTC as the clock's time base
//!
//! The RTC runs from the 32.768 kHz LSE. Its calendar is converted to and
//! from the core's `RtcDateTime`; the day of week is derived from the date.

use cifra_hal::{BackupDomain, RtcClock, RtcDate, RtcDateTime, RtcTime, Weekday};
use defmt::Format;
use embassy_stm32::rtc::{DateTime, DayOfWeek, Rtc};

/// RTC operation errors
#[derive(Debug, Clone, Copy, Format)]
pub enum RtcError {
    /// The calendar registers hold no valid date yet
    NotSet,
    /// The RTC rejected the value or did not respond
    HardwareError,
}

pub struct BoardRtc {
    rtc: Rtc,
}

impl BoardRtc {
    pub fn new(rtc: Rtc) -> Self {
        Self { rtc }
    }
}

fn day_of_week(weekday: Weekday) -> DayOfWeek {
    match weekday {
        Weekday::Monday => DayOfWeek::Monday,
        Weekday::Tuesday => DayOfWeek::Tuesday,
        Weekday::Wednesday => DayOfWeek::Wednesday,
        Weekday::Thursday => DayOfWeek::Thursday,
        Weekday::Friday => DayOfWeek::Friday,
        Weekday::Saturday => DayOfWeek::Saturday,
        Weekday::Sunday => DayOfWeek::Sunday,
    }
}

impl RtcClock for BoardRtc {
    type Error = RtcError;

    fn now(&mut self) -> Result<RtcDateTime, RtcError> {
        let now = self.rtc.now().map_err(|_| RtcError::NotSet)?;
        let date = RtcDate::new(now.year(), now.month(), now.day()).ok_or(RtcError::NotSet)?;
        let time = RtcTime::new(now.hour(), now.minute(), now.second()).ok_or(RtcError::NotSet)?;
        Ok(RtcDateTime::new(date, time))
    }

    fn set(&mut self, datetime: &RtcDateTime) -> Result<(), RtcError> {
        let RtcDateTime { date, time } = *datetime;
        let value = DateTime::from(
            date.year(),
            date.month(),
            date.day(),
            day_of_week(date.weekday()),
            time.hour(),
            time.minute(),
            time.second(),
            0,
        )
        .map_err(|_| RtcError::HardwareError)?;
        self.rtc
            .set_datetime(value)
            .map_err(|_| RtcError::HardwareError)
    }
}

impl BackupDomain for BoardRtc {
    fn read_backup(&self, index: usize) -> Option<u32> {
        self.rtc.read_backup_register(index)
    }

    fn write_backup(&mut self, index: usize, value: u32) {
        self.rtc.write_backup_register(index, value);
    }
}
