//! Firmware image and driver error type.

use super::regs::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FwError<E> {
    I2c(E),
    /// A transfer did not complete within `I2C_OP_TIMEOUT`.
    Timeout,
    /// Image length is zero, not a multiple of FW_PAGE_SIZE, or too large.
    InvalidLength(usize),
    /// CHIP_ID mismatch.
    InvalidDevice(u16),
    /// Erase did not finish within the poll budget, or flagged an error.
    FlashBusy,
    /// Read-back of `page` did not match the image.
    VerifyFailed { page: u16 },
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for FwError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FwError::I2c(_) => defmt::write!(f, "I2c(..)"),
            FwError::Timeout => defmt::write!(f, "Timeout"),
            FwError::InvalidLength(n) => defmt::write!(f, "InvalidLength({=usize})", n),
            FwError::InvalidDevice(id) => defmt::write!(f, "InvalidDevice(0x{=u16:04X})", id),
            FwError::FlashBusy => defmt::write!(f, "FlashBusy"),
            FwError::VerifyFailed { page } => defmt::write!(f, "VerifyFailed(page {=u16})", page),
        }
    }
}

impl<E> From<E> for FwError<E> {
    fn from(e: E) -> Self {
        FwError::I2c(e)
    }
}

/// Check that `len` bytes can be burned page by page.
pub fn check_image_len(len: usize) -> Result<(), usize> {
    if len == 0 || len % FW_PAGE_SIZE != 0 || len > FW_MAX_SIZE {
        Err(len)
    } else {
        Ok(())
    }
}

/// A firmware image ready for burning.
#[derive(Copy, Clone, Debug)]
pub struct FirmwareImage<'a> {
    data: &'a [u8],
    version: u32,
}

impl<'a> FirmwareImage<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, usize> {
        check_image_len(data.len())?;
        // FW_PAGE_SIZE > FW_VERSION_OFFSET + 4, so any valid length holds the version.
        let v = &data[FW_VERSION_OFFSET..FW_VERSION_OFFSET + 4];
        Ok(Self {
            data,
            version: u32::from_le_bytes([v[0], v[1], v[2], v[3]]),
        })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn pages(&self) -> usize {
        self.data.len() / FW_PAGE_SIZE
    }
}

/// Control of the sensor's interrupt line around a flash update.
pub trait IrqControl {
    fn disable_irq(&mut self);
    fn enable_irq(&mut self);
}

/// Outcome of `update_firmware`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UpdateOutcome {
    /// Device already runs the image version.
    UpToDate(u32),
    /// Image burned and verified; carries the new version.
    Updated(u32),
}
