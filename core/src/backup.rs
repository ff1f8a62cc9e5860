//! Mechanism state mirrored in the RTC backup registers
//!
//! Flash is too slow and wears too fast to record every step, so the
//! clock mirrors LastTick and the coil polarity to the battery-backed
//! registers after each confirmed step. The mirror also marks that the
//! RTC has been set at least once.
//!
//! | register | content                                   |
//! |----------|-------------------------------------------|
//! | 0        | marker, `BACKUP_MARKER` once time is set  |
//! | 1        | LastTick, seconds since 2000-01-01        |
//! | 2        | bit 0: coil polarity, bit 1: position ok  |
#![deny(unsafe_code)]

use cifra_hal::{BackupDomain, Coil};

pub const BACKUP_MARKER: u32 = 0xC1F5_0B0B;

const REG_MARKER: usize = 0;
const REG_LAST_TICK: usize = 1;
const REG_FLAGS: usize = 2;

const FLAG_COIL: u32 = 1 << 0;
const FLAG_POSITION_VALID: u32 = 1 << 1;

/// What the backup registers say about the mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackupState {
    /// The board has no backup registers; rely on flash
    Unsupported,
    /// Registers present but the RTC was never set
    Uninitialized,
    /// RTC was set; LastTick is only usable if `position_valid`
    Initialized(BackupSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BackupSnapshot {
    pub last_tick: u32,
    pub coil: Coil,
    pub position_valid: bool,
}

pub fn load<B: BackupDomain + ?Sized>(backup: &B) -> BackupState {
    let Some(marker) = backup.read_backup(REG_MARKER) else {
        return BackupState::Unsupported;
    };
    if marker != BACKUP_MARKER {
        return BackupState::Uninitialized;
    }
    let last_tick = backup.read_backup(REG_LAST_TICK).unwrap_or(0);
    let flags = backup.read_backup(REG_FLAGS).unwrap_or(0);
    BackupState::Initialized(BackupSnapshot {
        last_tick,
        coil: Coil::from_bit(flags & FLAG_COIL != 0),
        position_valid: flags & FLAG_POSITION_VALID != 0,
    })
}

/// Record that the RTC now holds a user-set time
pub fn mark_initialized<B: BackupDomain + ?Sized>(backup: &mut B) {
    backup.write_backup(REG_MARKER, BACKUP_MARKER);
}

/// Mirror the mechanism state after a confirmed step or a sync
pub fn store<B: BackupDomain + ?Sized>(backup: &mut B, snapshot: &BackupSnapshot) {
    let mut flags = 0;
    if snapshot.coil.bit() {
        flags |= FLAG_COIL;
    }
    if snapshot.position_valid {
        flags |= FLAG_POSITION_VALID;
    }
    backup.write_backup(REG_LAST_TICK, snapshot.last_tick);
    backup.write_backup(REG_FLAGS, flags);
}
