//! Calendar RTC values and the clock capability
//!
//! The RTC peripheral keeps wall-clock time in calendar form. The core
//! works with these value types and converts them to seconds since
//! 2000-01-01 00:00:00 (the earliest date the hardware calendar can
//! represent) whenever it needs elapsed time.
//!
//! Date conversions use Howard Hinnant's `days_from_civil` and
//! `civil_from_days` algorithms (O(1), leap-year correct).
//! Reference: http://howardhinnant.github.io/date_algorithms.html
#![deny(unsafe_code)]

use core::fmt::Debug;

const SECONDS_PER_DAY: u32 = 86_400;

/// Days from 0000-03-01 to 2000-01-01 in the proleptic Gregorian calendar
const EPOCH_SHIFT_DAYS: i32 = 730_425;

/// Time of day as read from the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl RtcTime {
    /// 00:00:00
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Build a time of day, rejecting out-of-range fields
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    /// Wrap a second count into a time of day
    pub const fn from_seconds_of_day(secs: u32) -> Self {
        let secs = secs % SECONDS_PER_DAY;
        Self {
            hour: (secs / 3600) as u8,
            minute: ((secs % 3600) / 60) as u8,
            second: (secs % 60) as u8,
        }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Seconds elapsed since midnight
    pub const fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }
}

/// Day of the week, ISO numbering (Monday = 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    // 2000-01-01 was a Saturday
    const fn from_days_since_epoch(days: u32) -> Self {
        Self::ALL[((days + 5) % 7) as usize]
    }
}

/// Calendar date as read from the RTC (years 2000-2099)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcDate {
    year: u16,
    month: u8,
    day: u8,
}

impl RtcDate {
    /// Earliest year the hardware calendar holds
    pub const MIN_YEAR: u16 = 2000;
    /// Latest year the hardware calendar holds
    pub const MAX_YEAR: u16 = 2099;

    /// 2000-01-01
    pub const EPOCH: Self = Self {
        year: Self::MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// Build a date, rejecting anything the RTC calendar cannot hold
    pub fn new(year: u16, month: u8, day: u8) -> Option<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return None;
        }
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Day of the week derived from the date
    pub const fn weekday(&self) -> Weekday {
        Weekday::from_days_since_epoch(self.days_since_epoch())
    }

    /// Days elapsed since 2000-01-01
    pub const fn days_since_epoch(&self) -> u32 {
        days_from_civil(self.year, self.month, self.day) as u32
    }

    /// Date `days` after 2000-01-01, saturating at the last representable day
    pub const fn from_days_since_epoch(days: u32) -> Self {
        let max = days_from_civil(Self::MAX_YEAR, 12, 31) as u32;
        let days = if days > max { max } else { days };
        let (year, month, day) = civil_from_days(days as i32);
        Self { year, month, day }
    }
}

/// Date and time of day as one RTC reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcDateTime {
    pub date: RtcDate,
    pub time: RtcTime,
}

impl RtcDateTime {
    /// 2000-01-01 00:00:00, the zero point of epoch seconds
    pub const EPOCH: Self = Self {
        date: RtcDate::EPOCH,
        time: RtcTime::MIDNIGHT,
    };

    pub const fn new(date: RtcDate, time: RtcTime) -> Self {
        Self { date, time }
    }

    /// Seconds since 2000-01-01 00:00:00
    pub const fn to_epoch_seconds(&self) -> u32 {
        self.date.days_since_epoch() * SECONDS_PER_DAY + self.time.seconds_of_day()
    }

    /// Inverse of [`RtcDateTime::to_epoch_seconds`], saturating at 2099-12-31
    pub const fn from_epoch_seconds(secs: u32) -> Self {
        Self {
            date: RtcDate::from_days_since_epoch(secs / SECONDS_PER_DAY),
            time: RtcTime::from_seconds_of_day(secs),
        }
    }
}

/// Check if year is a leap year (Gregorian calendar)
pub fn is_leap_year(year: u16) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Civil date to days since 2000-01-01
const fn days_from_civil(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // March is month 0 so the leap day falls at the end of the year
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // [0, 399]
    let doy = (153 * (m as u32) + 2) / 5 + (d as u32) - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]

    era * 146_097 + (doe as i32) - EPOCH_SHIFT_DAYS
}

/// Days since 2000-01-01 to civil date (year, month, day)
const fn civil_from_days(days: i32) -> (u16, u8, u8) {
    let z = days + EPOCH_SHIFT_DAYS;

    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u32; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let y = (yoe as i32) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11], 0 = March
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if m <= 2 { y + 1 } else { y };

    (year as u16, m, d)
}

/// Calendar RTC capability
///
/// Reads are expected to be cheap. A failed read is transient from the
/// core's point of view: it skips the current pass and tries again.
pub trait RtcClock {
    type Error: Debug;

    /// Current date and time
    fn now(&mut self) -> Result<RtcDateTime, Self::Error>;

    /// Overwrite the calendar (used by manual set and calibration re-basing)
    fn set(&mut self, datetime: &RtcDateTime) -> Result<(), Self::Error>;
}

/// Battery-backed registers living in the RTC power domain
///
/// They survive resets as long as the RTC keeps running, which makes them
/// the place to mirror state that changes too often for flash.
pub trait BackupDomain {
    /// Read register `index`, `None` if the board has no such register
    fn read_backup(&self, index: usize) -> Option<u32>;

    /// Write register `index`; out-of-range indices are ignored
    fn write_backup(&mut self, index: usize, value: u32);
}
