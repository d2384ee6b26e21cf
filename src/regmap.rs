//! Regmap-style register access: 8-bit addresses, 8-bit values.
//!
//! Drivers talk to `RegisterMap` so they can sit on a real I2C bus
//! (`I2cRegmap`) or on a fake register file in tests.

use core::result::Result as CoreResult;
use embassy_time::with_timeout;
use embedded_hal_async::i2c::I2c;

use crate::config::{I2C_OP_TIMEOUT, MAX_BULK_WRITE};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error<E> {
    I2c(E),
    Timeout,
    /// Bulk write payload longer than `MAX_BULK_WRITE`.
    Overflow,
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::I2c(_) => defmt::write!(f, "I2c(..)"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Overflow => defmt::write!(f, "Overflow"),
        }
    }
}

/// Register read/write capability of a device.
#[allow(async_fn_in_trait)]
pub trait RegisterMap {
    type Error: core::fmt::Debug;

    async fn read(&mut self, reg: u8) -> CoreResult<u8, Self::Error>;

    async fn write(&mut self, reg: u8, val: u8) -> CoreResult<(), Self::Error>;

    /// Read `buf.len()` consecutive registers starting at `reg`.
    async fn bulk_read(&mut self, reg: u8, buf: &mut [u8]) -> CoreResult<(), Self::Error>;

    /// Write consecutive registers starting at `reg`.
    async fn bulk_write(&mut self, reg: u8, data: &[u8]) -> CoreResult<(), Self::Error>;

    /// Read-modify-write: only bits in `mask` change.
    async fn update_bits(&mut self, reg: u8, mask: u8, val: u8) -> CoreResult<(), Self::Error> {
        let old = self.read(reg).await?;
        self.write(reg, (old & !mask) | (val & mask)).await
    }
}

/// Run an I2C operation under the shared transaction timeout.
async fn with_i2c_timeout<F, T, E>(fut: F) -> CoreResult<T, Error<E>>
where
    F: core::future::Future<Output = CoreResult<T, Error<E>>>,
{
    match with_timeout(I2C_OP_TIMEOUT, fut).await {
        Ok(r) => r,
        Err(_) => Err(Error::Timeout),
    }
}

/// `RegisterMap` over an async I2C bus at a fixed 7-bit address.
pub struct I2cRegmap<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> I2cRegmap<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Consume the regmap and return the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterMap for I2cRegmap<I2C>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    async fn read(&mut self, reg: u8) -> CoreResult<u8, Self::Error> {
        with_i2c_timeout(async {
            let mut buf = [0u8; 1];
            self.i2c
                .write_read(self.addr, &[reg], &mut buf)
                .await
                .map_err(Error::I2c)?;
            Ok(buf[0])
        })
        .await
    }

    async fn write(&mut self, reg: u8, val: u8) -> CoreResult<(), Self::Error> {
        with_i2c_timeout(async {
            self.i2c
                .write(self.addr, &[reg, val])
                .await
                .map_err(Error::I2c)
        })
        .await
    }

    async fn bulk_read(&mut self, reg: u8, buf: &mut [u8]) -> CoreResult<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }
        with_i2c_timeout(async {
            self.i2c
                .write_read(self.addr, &[reg], buf)
                .await
                .map_err(Error::I2c)
        })
        .await
    }

    async fn bulk_write(&mut self, reg: u8, data: &[u8]) -> CoreResult<(), Self::Error> {
        if data.len() > MAX_BULK_WRITE {
            return Err(Error::Overflow);
        }
        let mut buf = [0u8; MAX_BULK_WRITE + 1];
        buf[0] = reg;
        buf[1..1 + data.len()].copy_from_slice(data);
        with_i2c_timeout(async {
            self.i2c
                .write(self.addr, &buf[..1 + data.len()])
                .await
                .map_err(Error::I2c)
        })
        .await
    }
}
