//! Settings record storage
//!
//! The core only ever reads and rewrites one small fixed-size record.
//! Page management stays on the board side; [`NorFlashRegion`] covers
//! the common case of a single dedicated flash page.
#![deny(unsafe_code)]

use core::fmt::Debug;
use embedded_storage::nor_flash::NorFlash;

/// Read/overwrite access to the settings record region
pub trait SettingsStorage {
    type Error: Debug;

    /// Fill `buf` from the start of the region
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Replace the region contents with `data`
    ///
    /// Implementations must return within a bounded time; anything slower
    /// is reported as an error by the caller.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// A single erase unit of NOR flash reserved for settings
///
/// `offset` must be aligned to `F::ERASE_SIZE` and records must be a
/// multiple of `F::WRITE_SIZE` long.
pub struct NorFlashRegion<F> {
    flash: F,
    offset: u32,
}

impl<F: NorFlash> NorFlashRegion<F> {
    pub const fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }
}

impl<F: NorFlash> SettingsStorage for NorFlashRegion<F> {
    type Error = F::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.flash.read(self.offset, buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.flash
            .erase(self.offset, self.offset + F::ERASE_SIZE as u32)?;
        self.flash.write(self.offset, data)
    }
}
