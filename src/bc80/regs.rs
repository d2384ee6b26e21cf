//! Register addresses and bit masks for the BC80 voltage divider.

pub const REG_DEVICE_ID: u8 = 0x00;
pub const   BC80_DEVICE_ID: u8 = 0x80;

// Interrupt flags are clear-on-read. Mask bit set = source masked.
pub const REG_INT_FLAG_1: u8 = 0x01;
pub const REG_INT_FLAG_2: u8 = 0x02;
pub const REG_INT_MASK_1: u8 = 0x03;
pub const REG_INT_MASK_2: u8 = 0x04;
pub const   INT_MASK_ALL: u8 = 0xFF;
pub const   INT_UNMASK_ALL: u8 = 0x00;

pub const REG_STATUS: u8 = 0x05;
pub const   VIN_PRESENT_STAT: u8 = 1 << 7;
pub const   VOUT_OK_STAT: u8     = 1 << 6;
pub const   SWITCHING_STAT: u8   = 1 << 5;
pub const   BYPASS_STAT: u8      = 1 << 4;
pub const   TSHUT_STAT: u8       = 1 << 0;

pub const REG_CTRL_0: u8 = 0x06;
pub const   MODE_SEL_MASK: u8 = 0b0000_0011; // <<0
pub const   MODE_SEL_SHIFT: u8 = 0;

pub const REG_FET_CTRL: u8 = 0x07;
pub const   INFET_EN: u8 = 1 << 0;

pub const REG_PRECHG_CTRL: u8 = 0x08;
pub const   PRECHG_EN: u8 = 1 << 1;
pub const   TRACK_EN: u8  = 1 << 0;

// Fault detection disables: bit set = fault ignored.
pub const REG_FAULT_CTRL: u8 = 0x09;
pub const   VIN_OVP_DIS: u8   = 1 << 7;
pub const   VOUT_OVP_DIS: u8  = 1 << 6;
pub const   IIN_OCP_DIS: u8   = 1 << 5;
pub const   IIN_UCP_DIS: u8   = 1 << 4;
pub const   REV_OCP_DIS: u8   = 1 << 3;
pub const   VDROP_DIS: u8     = 1 << 2;
pub const   VOUT_UVP_DIS: u8  = 1 << 1;
pub const   WD_FAULT_DIS: u8  = 1 << 0;

pub const REG_CLK_CTRL: u8 = 0x0A;
pub const   FSW_MASK: u8 = 0b0000_1111; // <<0
pub const   FSW_BASE_KHZ: u16 = 250;
pub const   FSW_STEP_KHZ: u16 = 50;

// --- ADC
pub const REG_ADC_CTRL: u8 = 0x10;
pub const   ADC_EN: u8   = 1 << 7;
pub const   ADC_RATE: u8 = 1 << 6; // 0=continuous, 1=one-shot

// u16 big-endian results, contiguous from REG_VIN_ADC
pub const REG_VIN_ADC: u8  = 0x11;
pub const REG_VOUT_ADC: u8 = 0x13;
pub const REG_IIN_ADC: u8  = 0x15;
pub const REG_TDIE_ADC: u8 = 0x17;
pub const ADC_BLOCK_LEN: usize = 8;

pub const VIN_ADC_LSB_MV: u32 = 5;
pub const VOUT_ADC_LSB_MV: u32 = 5;
/// IIN LSB in µV across the sense resistor.
pub const IIN_ADC_LSB_UV: u32 = 10;
/// TDIE is 0.5 °C/LSB offset by -40 °C.
pub const TDIE_OFFSET_C: i16 = -40;

/// Registers covered by the diagnostic dump. The clear-on-read flag
/// registers inside the range are not read.
pub const DUMP_FIRST: u8 = 0x00;
pub const DUMP_LEN: usize = 0x20;

// INT_FLAG_1 bits
pub const VIN_OVP_FLAG: u8   = 1 << 7;
pub const VOUT_OVP_FLAG: u8  = 1 << 6;
pub const IIN_OCP_FLAG: u8   = 1 << 5;
pub const IIN_UCP_FLAG: u8   = 1 << 4;
pub const REV_OCP_FLAG: u8   = 1 << 3;
pub const VDROP_FLAG: u8     = 1 << 2;
pub const VOUT_UVP_FLAG: u8  = 1 << 1;
pub const WD_FLAG: u8        = 1 << 0;

// INT_FLAG_2 bits
pub const VIN_PLUG_FLAG: u8  = 1 << 7;
pub const MODE_CHG_FLAG: u8  = 1 << 6;
pub const ADC_DONE_FLAG: u8  = 1 << 5;
pub const TSHUT_FLAG: u8     = 1 << 0;
