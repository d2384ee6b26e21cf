#![allow(dead_code)]

use std::collections::HashSet;

use core::convert::Infallible;

use embedded_hal::digital::ErrorType as PinErrorType;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation};

use powerpath_drivers::force_sensor::regs::*;
use powerpath_drivers::force_sensor::IrqControl;
use powerpath_drivers::RegisterMap;

// ---------------------------------------------------------------------------
// Register-file fake for RegisterMap users
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read(u8),
    Write(u8, u8),
    BulkRead(u8, usize),
    BulkWrite(u8, Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

pub struct FakeRegs {
    pub regs: [u8; 256],
    pub log: Vec<Access>,
    pub fail_reads: HashSet<u8>,
    pub fail_writes: HashSet<u8>,
    pub clear_on_read: HashSet<u8>,
}

impl FakeRegs {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            log: Vec::new(),
            fail_reads: HashSet::new(),
            fail_writes: HashSet::new(),
            clear_on_read: HashSet::new(),
        }
    }

    pub fn with(mut self, reg: u8, val: u8) -> Self {
        self.regs[reg as usize] = val;
        self
    }

    /// Single-register writes, in order.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|a| match a {
                Access::Write(r, v) => Some((*r, *v)),
                _ => None,
            })
            .collect()
    }

    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.log
            .iter()
            .filter(|a| matches!(a, Access::Write(..) | Access::BulkWrite(..)))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl RegisterMap for FakeRegs {
    type Error = FakeError;

    async fn read(&mut self, reg: u8) -> Result<u8, FakeError> {
        self.log.push(Access::Read(reg));
        if self.fail_reads.contains(&reg) {
            return Err(FakeError);
        }
        let v = self.regs[reg as usize];
        if self.clear_on_read.contains(&reg) {
            self.regs[reg as usize] = 0;
        }
        Ok(v)
    }

    async fn write(&mut self, reg: u8, val: u8) -> Result<(), FakeError> {
        self.log.push(Access::Write(reg, val));
        if self.fail_writes.contains(&reg) {
            return Err(FakeError);
        }
        self.regs[reg as usize] = val;
        Ok(())
    }

    async fn bulk_read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), FakeError> {
        self.log.push(Access::BulkRead(reg, buf.len()));
        if self.fail_reads.contains(&reg) {
            return Err(FakeError);
        }
        let start = reg as usize;
        buf.copy_from_slice(&self.regs[start..start + buf.len()]);
        for r in start..start + buf.len() {
            if self.clear_on_read.contains(&(r as u8)) {
                self.regs[r] = 0;
            }
        }
        Ok(())
    }

    async fn bulk_write(&mut self, reg: u8, data: &[u8]) -> Result<(), FakeError> {
        self.log.push(Access::BulkWrite(reg, data.to_vec()));
        if self.fail_writes.contains(&reg) {
            return Err(FakeError);
        }
        let start = reg as usize;
        self.regs[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 8-bit addressed I2C register device
// ---------------------------------------------------------------------------

pub struct FakeI2cRegs {
    pub addr: u8,
    pub regs: [u8; 256],
    pub ptr: u8,
    pub transactions: usize,
    pub fail: bool,
}

impl FakeI2cRegs {
    pub fn new(addr: u8) -> Self {
        Self { addr, regs: [0; 256], ptr: 0, transactions: 0, fail: false }
    }
}

impl ErrorType for FakeI2cRegs {
    type Error = ErrorKind;
}

impl I2c for FakeI2cRegs {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if self.fail || address != self.addr {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, data)) = bytes.split_first() {
                        self.ptr = reg;
                        for (i, b) in data.iter().enumerate() {
                            self.regs[reg as usize + i] = *b;
                        }
                    }
                }
                Operation::Read(buf) => {
                    let start = self.ptr as usize;
                    buf.copy_from_slice(&self.regs[start..start + buf.len()]);
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bus whose transfers never complete
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StuckI2c {
    pub transactions: usize,
}

impl ErrorType for StuckI2c {
    type Error = ErrorKind;
}

impl I2c for StuckI2c {
    async fn transaction(
        &mut self,
        _address: u8,
        _operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        core::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Force sensor simulator (16-bit big-endian addresses)
// ---------------------------------------------------------------------------

pub struct FakeForceSensor {
    pub chip_id: u16,
    pub version: u32,
    pub raw: [i16; CHANNELS],
    pub diff: [i16; CHANNELS],
    pub flash: Vec<u8>,
    pub prog_mode: bool,
    pub ptr: u16,
    pub transactions: usize,
    pub writes: usize,
    pub erases: usize,
    pub resets: usize,
    /// Busy polls reported after each erase.
    pub busy_polls: u8,
    busy_left: u8,
    /// Erase passes whose read-back is corrupted (1-based: passes <= this).
    pub corrupt_passes: usize,
    pub flash_error: bool,
}

impl FakeForceSensor {
    pub fn new() -> Self {
        Self {
            chip_id: CHIP_ID,
            version: 0x0001_0000,
            raw: [0; CHANNELS],
            diff: [0; CHANNELS],
            flash: vec![0xFF; FW_MAX_SIZE],
            prog_mode: false,
            ptr: 0,
            transactions: 0,
            writes: 0,
            erases: 0,
            resets: 0,
            busy_polls: 2,
            busy_left: 0,
            corrupt_passes: 0,
            flash_error: false,
        }
    }

    fn read_at(&mut self, addr: u16, buf: &mut [u8]) {
        match addr {
            REG_CHIP_ID => buf.copy_from_slice(&self.chip_id.to_le_bytes()[..buf.len()]),
            REG_FW_VERSION => buf.copy_from_slice(&self.version.to_le_bytes()[..buf.len()]),
            REG_RAW_DATA | REG_DIFF_DATA => {
                let src = if addr == REG_RAW_DATA { self.raw } else { self.diff };
                for (pair, v) in buf.chunks_exact_mut(2).zip(src.iter()) {
                    pair.copy_from_slice(&v.to_le_bytes());
                }
            }
            REG_FLASH_STATUS => {
                let mut st = 0;
                if self.busy_left > 0 {
                    self.busy_left -= 1;
                    st |= FLASH_BUSY;
                }
                if self.flash_error {
                    st |= FLASH_ERR;
                }
                buf[0] = st;
            }
            a if a >= FLASH_WINDOW && (a as usize) < FLASH_WINDOW as usize + FW_MAX_SIZE => {
                let off = (a - FLASH_WINDOW) as usize;
                buf.copy_from_slice(&self.flash[off..off + buf.len()]);
                if self.erases <= self.corrupt_passes {
                    buf[0] ^= 0x01;
                }
            }
            _ => buf.fill(0),
        }
    }

    fn write_at(&mut self, addr: u16, data: &[u8]) {
        match addr {
            REG_PROG_KEY if data == PROG_KEY => self.prog_mode = true,
            REG_FLASH_CMD if data == [FLASH_CMD_ERASE_ALL] && self.prog_mode => {
                self.erases += 1;
                self.flash.fill(0xFF);
                self.busy_left = self.busy_polls;
            }
            REG_SOFT_RESET if data == [SOFT_RESET_KEY] => {
                self.resets += 1;
                self.prog_mode = false;
            }
            a if self.prog_mode
                && a >= FLASH_WINDOW
                && (a as usize) < FLASH_WINDOW as usize + FW_MAX_SIZE =>
            {
                let off = (a - FLASH_WINDOW) as usize;
                self.flash[off..off + data.len()].copy_from_slice(data);
            }
            _ => {}
        }
    }
}

impl ErrorType for FakeForceSensor {
    type Error = ErrorKind;
}

impl I2c for FakeForceSensor {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if bytes.len() < 2 {
                        return Err(ErrorKind::Other);
                    }
                    let addr = u16::from_be_bytes([bytes[0], bytes[1]]);
                    self.ptr = addr;
                    if bytes.len() > 2 {
                        self.writes += 1;
                        let data = bytes[2..].to_vec();
                        self.write_at(addr, &data);
                    }
                }
                Operation::Read(buf) => {
                    let addr = self.ptr;
                    self.read_at(addr, buf);
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Delay / IRQ line
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct NoopDelay {
    pub total_ns: u64,
}

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

#[derive(Default)]
pub struct FakeIrqLine {
    pub enabled: bool,
    pub disables: usize,
    pub enables: usize,
}

impl FakeIrqLine {
    pub fn enabled() -> Self {
        Self { enabled: true, ..Default::default() }
    }
}

impl IrqControl for FakeIrqLine {
    fn disable_irq(&mut self) {
        self.enabled = false;
        self.disables += 1;
    }

    fn enable_irq(&mut self) {
        self.enabled = true;
        self.enables += 1;
    }
}

/// INT line that delivers `edges` falling edges, then stays idle.
pub struct FakeIntPin {
    pub edges: usize,
}

impl PinErrorType for FakeIntPin {
    type Error = Infallible;
}

impl Wait for FakeIntPin {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        core::future::pending().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        if self.edges == 0 {
            core::future::pending::<()>().await;
        }
        self.edges -= 1;
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        self.wait_for_falling_edge().await
    }
}
