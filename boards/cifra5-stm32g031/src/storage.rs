//! Settings page in internal flash

use cifra_hal::{NorFlashRegion, SettingsStorage};
use defmt::{warn, Format};
use embassy_stm32::flash::{Blocking, Flash};
use embassy_time::{Duration, Instant};

/// Last 2 KiB page of the 64 KiB flash, relative to the flash base
pub const SETTINGS_OFFSET: u32 = 0xF800;

/// Longest a settings write may take before it counts as failed
pub const WRITE_BUDGET: Duration = Duration::from_millis(50);

#[derive(Debug, Format)]
pub enum StorageError {
    Flash(embassy_stm32::flash::Error),
    /// The write finished but took longer than the budget, in milliseconds
    OverBudget(u64),
}

/// Flash page holding the settings record, with a write time budget
pub struct SettingsPage {
    region: NorFlashRegion<Flash<'static, Blocking>>,
}

impl SettingsPage {
    pub fn new(flash: Flash<'static, Blocking>) -> Self {
        Self {
            region: NorFlashRegion::new(flash, SETTINGS_OFFSET),
        }
    }
}

impl SettingsStorage for SettingsPage {
    type Error = StorageError;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        self.region.read(buf).map_err(StorageError::Flash)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        let start = Instant::now();
        self.region.write(data).map_err(StorageError::Flash)?;
        let elapsed = start.elapsed();
        if elapsed > WRITE_BUDGET {
            warn!("Settings write took {} ms", elapsed.as_millis());
            return Err(StorageError::OverBudget(elapsed.as_millis()));
        }
        Ok(())
    }
}
