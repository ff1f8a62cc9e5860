//! Settings persistence
//!
//! Calibration, the silent window and LastTick are stored together as
//! one fixed-layout record (little-endian):
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | magic `0xC1F5_A002`                     |
//! | 4      | 1    | layout version                          |
//! | 5      | 1    | flags, bit 0: zero-width always silent  |
//! | 6      | 1    | silent start hour                       |
//! | 7      | 1    | silent end hour                         |
//! | 8      | 2    | calibration (i16, parts per 2^20)       |
//! | 10     | 2    | reserved                                |
//! | 12     | 4    | LastTick, seconds since 2000-01-01      |
//! | 16     | 4    | reserved                                |
//! | 20     | 4    | CRC-32 of bytes 0..20                   |
//!
//! The length is a multiple of the 8-byte flash programming unit.
//! A blank, foreign or damaged record restores the defaults.
#![deny(unsafe_code)]

use cifra_hal::{RtcDateTime, SettingsStorage};

use crate::calibration::Calibration;
use crate::error::ClockError;
use crate::fmt::Debug2Format;
use crate::silent::{SilentHours, ZeroWidthPolicy};

pub const RECORD_LEN: usize = 24;
pub const RECORD_MAGIC: u32 = 0xC1F5_A002;
pub const RECORD_VERSION: u8 = 1;

const FLAG_ALWAYS_SILENT: u8 = 1 << 0;
const CRC_OFFSET: usize = RECORD_LEN - 4;

/// Everything that survives a power cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub calibration: Calibration,
    pub silent_hours: SilentHours,
    /// RTC time at which the flaps were last known to be correct
    pub last_tick: RtcDateTime,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calibration: Calibration::ZERO,
            silent_hours: SilentHours::DEFAULT,
            last_tick: RtcDateTime::EPOCH,
        }
    }
}

/// Why a stored record was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Erased flash
    Blank,
    /// Not one of our records
    ForeignMagic,
    UnsupportedVersion,
    Checksum,
    /// Checksum fine but a field is out of range
    InvalidField,
}

impl Settings {
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        buf[4] = RECORD_VERSION;
        if self.silent_hours.zero_width() == ZeroWidthPolicy::AlwaysSilent {
            buf[5] |= FLAG_ALWAYS_SILENT;
        }
        buf[6] = self.silent_hours.start();
        buf[7] = self.silent_hours.end();
        buf[8..10].copy_from_slice(&self.calibration.value().to_le_bytes());
        buf[12..16].copy_from_slice(&self.last_tick.to_epoch_seconds().to_le_bytes());
        let crc = crc32fast::hash(&buf[..CRC_OFFSET]);
        buf[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; RECORD_LEN]) -> Result<Self, RecordError> {
        if buf.iter().all(|&b| b == 0xFF) {
            return Err(RecordError::Blank);
        }
        if u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) != RECORD_MAGIC {
            return Err(RecordError::ForeignMagic);
        }
        if buf[4] != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion);
        }
        let stored_crc = u32::from_le_bytes([
            buf[CRC_OFFSET],
            buf[CRC_OFFSET + 1],
            buf[CRC_OFFSET + 2],
            buf[CRC_OFFSET + 3],
        ]);
        if crc32fast::hash(&buf[..CRC_OFFSET]) != stored_crc {
            return Err(RecordError::Checksum);
        }

        let zero_width = if buf[5] & FLAG_ALWAYS_SILENT != 0 {
            ZeroWidthPolicy::AlwaysSilent
        } else {
            ZeroWidthPolicy::NeverSilent
        };
        let silent_hours = SilentHours::new(buf[6], buf[7])
            .map_err(|_| RecordError::InvalidField)?
            .with_zero_width(zero_width);
        let calibration = Calibration::new(i16::from_le_bytes([buf[8], buf[9]]))
            .map_err(|_| RecordError::InvalidField)?;
        let secs = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let last_tick = RtcDateTime::from_epoch_seconds(secs);
        if last_tick.to_epoch_seconds() != secs {
            return Err(RecordError::InvalidField);
        }

        Ok(Self {
            calibration,
            silent_hours,
            last_tick,
        })
    }
}

/// Where restored settings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsSource {
    Stored,
    /// Defaults were used because the record was unusable
    Defaults(RecordError),
    /// Defaults were used because the storage could not be read
    ReadFailed,
}

/// Result of a restore: always usable settings plus their origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Restored {
    pub settings: Settings,
    pub source: SettingsSource,
}

/// Settings record on top of a storage driver
pub struct SettingsFlash<S> {
    storage: S,
}

impl<S: SettingsStorage> SettingsFlash<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Write the record, skipping the erase if it is already current
    ///
    /// A failure leaves the in-memory settings authoritative; the next
    /// scheduled write tries again.
    pub fn write_settings(&mut self, settings: &Settings) -> Result<(), ClockError> {
        let record = settings.encode();

        let mut current = [0u8; RECORD_LEN];
        if self.storage.read(&mut current).is_ok() && current == record {
            debug!("Settings record already current");
            return Ok(());
        }

        self.storage.write(&record).map_err(|e| {
            error!("Settings write failed: {:?}", Debug2Format(&e));
            ClockError::StorageFailure
        })?;
        info!(
            "Settings saved (cal={}, silent {}-{})",
            settings.calibration.value(),
            settings.silent_hours.start(),
            settings.silent_hours.end()
        );
        Ok(())
    }

    /// Read the record, falling back to defaults when it is unusable
    pub fn restore_settings(&mut self) -> Restored {
        let mut record = [0u8; RECORD_LEN];
        if let Err(e) = self.storage.read(&mut record) {
            error!("Settings read failed: {:?}", Debug2Format(&e));
            return Restored {
                settings: Settings::default(),
                source: SettingsSource::ReadFailed,
            };
        }

        match Settings::decode(&record) {
            Ok(settings) => {
                info!("Settings restored from flash");
                Restored {
                    settings,
                    source: SettingsSource::Stored,
                }
            }
            Err(reason) => {
                warn!("Settings record unusable ({:?}), using defaults", reason);
                Restored {
                    settings: Settings::default(),
                    source: SettingsSource::Defaults(reason),
                }
            }
        }
    }
}
