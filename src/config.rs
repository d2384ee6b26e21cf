//! Compile-time knobs for the power-path drivers.
//! Edit these constants and rebuild.
use embassy_time::Duration;

/// Upper bound for a single I2C transaction before it is reported as a timeout.
pub const I2C_OP_TIMEOUT: Duration = Duration::from_millis(30);

/// Largest payload accepted by `RegisterMap::bulk_write` (and by the raw port).
pub const MAX_BULK_WRITE: usize = 32;

/// 7-bit I2C address of the BC80 voltage divider.
pub const BC80_I2C_ADDR: u8 = 0x5F;

pub const BC80_LOG_PERIOD_MS: u64 = 5_000; // readings publish period

/// Sense resistor on the BC80 input path, used to scale the IIN ADC.
pub const BC80_R_INPUT_SENSE_MOHM: u16 = 5;

/// 7-bit I2C address of the force sensor.
pub const FORCE_I2C_ADDR: u8 = 0x50;

/// Whole-image burn attempts before the update is reported as failed.
pub const FW_BURN_RETRIES: u8 = 3;

/// Busy polls after a flash erase, FW_ERASE_POLL_MS apart.
pub const FW_ERASE_POLLS: u8 = 50;
pub const FW_ERASE_POLL_MS: u32 = 20;

/// Settling after entering program mode and after the post-burn reset.
pub const FW_PROG_ENTRY_DELAY_MS: u32 = 10;
pub const FW_RESET_DELAY_MS: u32 = 50;
