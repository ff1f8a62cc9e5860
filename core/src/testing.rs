//! Fake capabilities for unit tests

use core::cell::RefCell;

use cifra_hal::{Actuator, BackupDomain, Coil, PositionSensors, RtcClock, RtcDate, RtcDateTime, RtcTime};
use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash,
};

use crate::calibration::CalibrationStore;
use crate::mechanism::{Dial, MechStore};
use crate::silent::SilentHoursStore;
use crate::Stores;

pub fn datetime(hour: u8, minute: u8, second: u8) -> RtcDateTime {
    RtcDateTime::new(
        RtcDate::new(2024, 3, 10).unwrap(),
        RtcTime::new(hour, minute, second).unwrap(),
    )
}

#[derive(Debug)]
pub struct FakeFault;

/// A 24-hour flap mechanism the fake actuator moves and the fake sensors read
#[derive(Debug, Default)]
pub struct Physical {
    pub hour: u8,
    pub minute: u8,
    pub minute_steps: u32,
    pub hour_steps: u32,
    pub fail_minute_steps: bool,
    /// Fail the minute step with this (1-based) index
    pub fail_minute_step_at: Option<u32>,
    pub hour_sensor_dead: bool,
    pub day_sensor_dead: bool,
    pub engaged: bool,
    pub last_coil: Option<Coil>,
    /// Pulses repeated with the same polarity, which a bistable coil ignores
    pub coil_errors: u32,
}

impl Physical {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            ..Self::default()
        }
    }
}

pub struct FakeActuator<'a> {
    phys: &'a RefCell<Physical>,
}

impl<'a> FakeActuator<'a> {
    pub fn new(phys: &'a RefCell<Physical>) -> Self {
        Self { phys }
    }
}

impl Actuator for FakeActuator<'_> {
    type Error = FakeFault;

    fn step_minute(&mut self, coil: Coil) -> Result<(), FakeFault> {
        let mut p = self.phys.borrow_mut();
        let index = p.minute_steps + 1;
        if p.fail_minute_steps || p.fail_minute_step_at == Some(index) {
            return Err(FakeFault);
        }
        if p.last_coil == Some(coil) {
            p.coil_errors += 1;
        }
        p.last_coil = Some(coil);
        p.minute_steps = index;
        if p.minute == 59 {
            p.minute = 0;
            p.hour = (p.hour + 1) % 24;
        } else {
            p.minute += 1;
        }
        Ok(())
    }

    fn step_hour(&mut self) -> Result<(), FakeFault> {
        let mut p = self.phys.borrow_mut();
        p.hour_steps += 1;
        p.hour = (p.hour + 1) % 24;
        Ok(())
    }

    fn engage_hours(&mut self) -> Result<(), FakeFault> {
        self.phys.borrow_mut().engaged = true;
        Ok(())
    }

    fn release_hours(&mut self) -> Result<(), FakeFault> {
        self.phys.borrow_mut().engaged = false;
        Ok(())
    }
}

pub struct FakeSensors<'a> {
    phys: &'a RefCell<Physical>,
}

impl<'a> FakeSensors<'a> {
    pub fn new(phys: &'a RefCell<Physical>) -> Self {
        Self { phys }
    }
}

impl PositionSensors for FakeSensors<'_> {
    type Error = FakeFault;

    fn hour_mark(&mut self) -> Result<bool, FakeFault> {
        let p = self.phys.borrow();
        Ok(!p.hour_sensor_dead && p.minute == 0)
    }

    fn day_mark(&mut self) -> Result<bool, FakeFault> {
        let p = self.phys.borrow();
        Ok(!p.day_sensor_dead && p.hour == 0)
    }
}

/// RTC frozen at a settable instant, with a few backup registers
pub struct FakeRtc {
    pub now: RtcDateTime,
    pub fail_reads: bool,
    pub set_calls: u32,
    pub backup: [u32; 4],
}

impl FakeRtc {
    pub fn new(now: RtcDateTime) -> Self {
        Self {
            now,
            fail_reads: false,
            set_calls: 0,
            backup: [0; 4],
        }
    }

    pub fn advance(&mut self, secs: u32) {
        self.now = RtcDateTime::from_epoch_seconds(self.now.to_epoch_seconds() + secs);
    }
}

impl RtcClock for FakeRtc {
    type Error = FakeFault;

    fn now(&mut self) -> Result<RtcDateTime, FakeFault> {
        if self.fail_reads {
            return Err(FakeFault);
        }
        Ok(self.now)
    }

    fn set(&mut self, datetime: &RtcDateTime) -> Result<(), FakeFault> {
        self.set_calls += 1;
        self.now = *datetime;
        Ok(())
    }
}

impl BackupDomain for FakeRtc {
    fn read_backup(&self, index: usize) -> Option<u32> {
        self.backup.get(index).copied()
    }

    fn write_backup(&mut self, index: usize, value: u32) {
        if let Some(slot) = self.backup.get_mut(index) {
            *slot = value;
        }
    }
}

/// One erase page of NOR flash in RAM
pub struct RamFlash {
    pub data: [u8; RamFlash::CAPACITY],
    pub erase_count: u32,
    pub fail_writes: bool,
}

impl RamFlash {
    const CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self {
            data: [0xFF; Self::CAPACITY],
            erase_count: 0,
            fail_writes: false,
        }
    }

    pub fn load(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl ErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > Self::CAPACITY {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        Self::CAPACITY
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 8;
    const ERASE_SIZE: usize = Self::CAPACITY;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(NorFlashErrorKind::Other);
        }
        self.erase_count += 1;
        self.data[from as usize..to as usize].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(NorFlashErrorKind::Other);
        }
        if bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let start = offset as usize;
        for (dst, src) in self.data[start..start + bytes.len()].iter_mut().zip(bytes) {
            // NOR programming only clears bits
            *dst &= *src;
        }
        Ok(())
    }
}

/// Store set owned by a single test
pub struct TestStores {
    pub mech: MechStore,
    pub calibration: CalibrationStore,
    pub silent: SilentHoursStore,
}

impl TestStores {
    pub fn new(dial: Dial) -> Self {
        Self {
            mech: MechStore::new(dial),
            calibration: CalibrationStore::new(),
            silent: SilentHoursStore::new(),
        }
    }

    pub fn stores(&self) -> Stores<'_> {
        Stores {
            mech: &self.mech,
            calibration: &self.calibration,
            silent: &self.silent,
        }
    }
}
