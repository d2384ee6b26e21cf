//! Force sensor driver: identity, sensor dumps and the flash update
//! protocol (erase, page write, read-back verify, bounded retries).

use core::future::Future;
use core::result::Result as CoreResult;
use embassy_time::with_timeout;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::regs::*;
use super::types::*;
use crate::config;

pub type Result<T, E> = CoreResult<T, FwError<E>>;

/// Bound one bus transfer by `I2C_OP_TIMEOUT`.
async fn with_i2c_timeout<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = CoreResult<(), E>>,
{
    match with_timeout(config::I2C_OP_TIMEOUT, fut).await {
        Ok(r) => r.map_err(FwError::I2c),
        Err(_) => Err(FwError::Timeout),
    }
}

pub struct ForceSensor<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> ForceSensor<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c, addr: config::FORCE_I2C_ADDR }
    }

    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    // ===== Low-level: 16-bit big-endian register addresses =====

    async fn wr(&mut self, reg: u16, data: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; 2 + FW_PAGE_SIZE];
        if data.len() > FW_PAGE_SIZE {
            return Err(FwError::InvalidLength(data.len()));
        }
        buf[..2].copy_from_slice(&reg.to_be_bytes());
        buf[2..2 + data.len()].copy_from_slice(data);
        with_i2c_timeout(self.i2c.write(self.addr, &buf[..2 + data.len()])).await
    }

    async fn rd(&mut self, reg: u16, dst: &mut [u8]) -> Result<(), I2C::Error> {
        with_i2c_timeout(self.i2c.write_read(self.addr, &reg.to_be_bytes(), dst)).await
    }

    async fn rd_u8(&mut self, reg: u16) -> Result<u8, I2C::Error> {
        let mut b = [0u8; 1];
        self.rd(reg, &mut b).await?;
        Ok(b[0])
    }

    async fn rd_channels(&mut self, reg: u16) -> Result<[i16; CHANNELS], I2C::Error> {
        let mut b = [0u8; CHANNELS * 2];
        self.rd(reg, &mut b).await?;
        let mut out = [0i16; CHANNELS];
        for (v, pair) in out.iter_mut().zip(b.chunks_exact(2)) {
            *v = i16::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(out)
    }

    // ===== Identity / dumps =====

    pub async fn chip_id(&mut self) -> Result<u16, I2C::Error> {
        let mut b = [0u8; 2];
        self.rd(REG_CHIP_ID, &mut b).await?;
        Ok(u16::from_le_bytes(b))
    }

    pub async fn probe(&mut self) -> Result<(), I2C::Error> {
        match self.chip_id().await? {
            CHIP_ID => Ok(()),
            other => Err(FwError::InvalidDevice(other)),
        }
    }

    pub async fn firmware_version(&mut self) -> Result<u32, I2C::Error> {
        let mut b = [0u8; 4];
        self.rd(REG_FW_VERSION, &mut b).await?;
        Ok(u32::from_le_bytes(b))
    }

    /// Raw ADC counts per channel.
    pub async fn read_raw(&mut self) -> Result<[i16; CHANNELS], I2C::Error> {
        self.rd_channels(REG_RAW_DATA).await
    }

    /// Baseline-subtracted counts per channel.
    pub async fn read_diff(&mut self) -> Result<[i16; CHANNELS], I2C::Error> {
        self.rd_channels(REG_DIFF_DATA).await
    }

    // ===== Flash programming =====

    pub async fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I2C::Error> {
        self.wr(REG_SOFT_RESET, &[SOFT_RESET_KEY]).await?;
        delay.delay_ms(config::FW_RESET_DELAY_MS).await;
        Ok(())
    }

    async fn wait_flash_idle<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I2C::Error> {
        for _ in 0..config::FW_ERASE_POLLS {
            let st = self.rd_u8(REG_FLASH_STATUS).await?;
            if (st & FLASH_ERR) != 0 {
                warn!("FORCE: flash reports error, status=0x{:02X}", st);
                return Err(FwError::FlashBusy);
            }
            if (st & FLASH_BUSY) == 0 {
                return Ok(());
            }
            delay.delay_ms(config::FW_ERASE_POLL_MS).await;
        }
        Err(FwError::FlashBusy)
    }

    /// One erase/program/verify pass over the whole image.
    async fn burn_once<D: DelayNs>(&mut self, data: &[u8], delay: &mut D) -> Result<(), I2C::Error> {
        self.wr(REG_PROG_KEY, &PROG_KEY).await?;
        delay.delay_ms(config::FW_PROG_ENTRY_DELAY_MS).await;

        self.wr(REG_FLASH_CMD, &[FLASH_CMD_ERASE_ALL]).await?;
        self.wait_flash_idle(delay).await?;

        for (i, page) in data.chunks(FW_PAGE_SIZE).enumerate() {
            self.wr(FLASH_WINDOW + (i * FW_PAGE_SIZE) as u16, page).await?;
        }

        let mut readback = [0u8; FW_PAGE_SIZE];
        for (i, page) in data.chunks(FW_PAGE_SIZE).enumerate() {
            self.rd(FLASH_WINDOW + (i * FW_PAGE_SIZE) as u16, &mut readback).await?;
            if readback[..] != page[..] {
                return Err(FwError::VerifyFailed { page: i as u16 });
            }
        }
        Ok(())
    }

    /// Burn `data` into flash.
    ///
    /// The length must be a non-zero multiple of `FW_PAGE_SIZE` no larger
    /// than `FW_MAX_SIZE`; otherwise nothing is sent. A failed pass is
    /// retried up to `FW_BURN_RETRIES` times in total. The device is reset
    /// afterwards whether or not the burn succeeded.
    pub async fn burn<D: DelayNs>(&mut self, data: &[u8], delay: &mut D) -> Result<(), I2C::Error> {
        check_image_len(data.len()).map_err(FwError::InvalidLength)?;

        let mut last_err = FwError::FlashBusy;
        for attempt in 1..=config::FW_BURN_RETRIES {
            match self.burn_once(data, delay).await {
                Ok(()) => {
                    info!("FORCE: burned {} bytes (attempt {})", data.len(), attempt);
                    return self.reset(delay).await;
                }
                Err(e) => {
                    warn!("FORCE: burn attempt {} failed: {:?}", attempt, e);
                    last_err = e;
                }
            }
        }

        error!("FORCE: giving up after {} attempts", config::FW_BURN_RETRIES);
        if let Err(e) = self.reset(delay).await {
            warn!("FORCE: reset after failed burn failed: {:?}", e);
        }
        Err(last_err)
    }

    /// Update to `image` unless the device already runs its version.
    ///
    /// The interrupt line is disabled for the duration of the burn and
    /// re-enabled afterwards on every path.
    pub async fn update_firmware<Q, D>(
        &mut self,
        image: &FirmwareImage<'_>,
        irq: &mut Q,
        delay: &mut D,
        force: bool,
    ) -> Result<UpdateOutcome, I2C::Error>
    where
        Q: IrqControl,
        D: DelayNs,
    {
        if !force {
            match self.firmware_version().await {
                Ok(v) if v == image.version() => {
                    info!("FORCE: firmware 0x{:08X} up to date", v);
                    return Ok(UpdateOutcome::UpToDate(v));
                }
                Ok(v) => info!("FORCE: firmware 0x{:08X} -> 0x{:08X}", v, image.version()),
                Err(e) => warn!("FORCE: version read failed, updating anyway: {:?}", e),
            }
        }

        irq.disable_irq();
        let res = self.burn(image.data(), delay).await;
        irq.enable_irq();
        res?;

        Ok(UpdateOutcome::Updated(image.version()))
    }
}
