//! Register map of the Chipsea-style force sensor.
//! Addresses are 16-bit and sent MSB first.

pub const REG_CHIP_ID: u16 = 0x0000; // u16 LE
pub const   CHIP_ID: u16 = 0xC5A1;
pub const REG_FW_VERSION: u16 = 0x0004; // u32 LE

// Sensor dumps: CHANNELS x i16 LE
pub const REG_RAW_DATA: u16 = 0x0100;
pub const REG_DIFF_DATA: u16 = 0x0110;
pub const CHANNELS: usize = 4;

// --- Flash programming
pub const REG_PROG_KEY: u16 = 0xF000;
pub const   PROG_KEY: [u8; 2] = [0xAA, 0x55];

pub const REG_FLASH_CMD: u16 = 0xF002;
pub const   FLASH_CMD_ERASE_ALL: u8 = 0x01;

pub const REG_FLASH_STATUS: u16 = 0xF003;
pub const   FLASH_BUSY: u8 = 1 << 0;
pub const   FLASH_ERR: u8 = 1 << 1;

pub const REG_SOFT_RESET: u16 = 0xF0FF;
pub const   SOFT_RESET_KEY: u8 = 0x5A;

/// Flash is mapped at this address while in program mode.
pub const FLASH_WINDOW: u16 = 0x8000;
pub const FW_PAGE_SIZE: usize = 128;
/// Keeps the window below the programming registers at 0xF000.
pub const FW_MAX_SIZE: usize = 0x6000;

/// Image version, u32 LE, at this offset inside the image.
pub const FW_VERSION_OFFSET: usize = 0x0C;
