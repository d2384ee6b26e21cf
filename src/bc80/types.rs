//! Public enums, snapshots and the driver error type.

use super::regs::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// Register access failed.
    Bus(E),
    /// DEVICE_ID mismatch.
    InvalidDevice(u8),
    /// Requested operating mode outside STANDBY..=SWITCHING_ALT.
    InvalidMode(u8),
    /// Parameter outside allowed range.
    InvalidInput,
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Bus(_) => defmt::write!(f, "Bus(..)"),
            Error::InvalidDevice(id) => defmt::write!(f, "InvalidDevice(0x{=u8:02X})", id),
            Error::InvalidMode(m) => defmt::write!(f, "InvalidMode({=u8})", m),
            Error::InvalidInput => defmt::write!(f, "InvalidInput"),
        }
    }
}

/// Power-path topology selected by the MODE_SEL field.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OpMode {
    Standby,
    Bypass,
    Switching,
    SwitchingAlt,
    /// Readback or request outside the known encodings.
    Unknown(u8),
}

impl OpMode {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => OpMode::Standby,
            1 => OpMode::Bypass,
            2 => OpMode::Switching,
            3 => OpMode::SwitchingAlt,
            other => OpMode::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            OpMode::Standby => 0,
            OpMode::Bypass => 1,
            OpMode::Switching => 2,
            OpMode::SwitchingAlt => 3,
            OpMode::Unknown(c) => c,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, OpMode::Unknown(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            OpMode::Standby => "standby",
            OpMode::Bypass => "bypass",
            OpMode::Switching => "switching",
            OpMode::SwitchingAlt => "switching_alt",
            OpMode::Unknown(_) => "unknown",
        }
    }

    /// Accepts the mode names used by the shell or a raw numeric code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standby" => Some(OpMode::Standby),
            "bypass" => Some(OpMode::Bypass),
            "switching" => Some(OpMode::Switching),
            "switching_alt" => Some(OpMode::SwitchingAlt),
            _ => s.parse::<u8>().ok().map(OpMode::from_code),
        }
    }
}

/// Upstream charging-cable classification.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CableType {
    #[default]
    None,
    Wired,
    Wireless,
    PdApdo,
}

impl CableType {
    pub fn is_charging(self) -> bool {
        self != CableType::None
    }

    pub fn name(self) -> &'static str {
        match self {
            CableType::None => "none",
            CableType::Wired => "wired",
            CableType::Wireless => "wireless",
            CableType::PdApdo => "pd_apdo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(CableType::None),
            "wired" => Some(CableType::Wired),
            "wireless" => Some(CableType::Wireless),
            "pd_apdo" => Some(CableType::PdApdo),
            _ => None,
        }
    }
}

/// Interrupt flags (clear-on-read) and status captured by one IRQ service.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IrqStatus {
    pub flag1: u8,
    pub flag2: u8,
    pub status: u8,
}

/// Configuration read back from the control registers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bc80Config {
    pub mode: OpMode,
    pub infet_enabled: bool,
    pub precharge_enabled: bool,
    pub track_enabled: bool,
    pub fault_disable_mask: u8,
    pub fsw_code: u8,
    pub fsw_khz: u16,
}

impl Bc80Config {
    /// Decode from the contiguous block CTRL_0..=CLK_CTRL.
    pub fn from_block(b: &[u8; 5]) -> Self {
        let fsw_code = b[4] & FSW_MASK;
        Self {
            mode: OpMode::from_code((b[0] & MODE_SEL_MASK) >> MODE_SEL_SHIFT),
            infet_enabled: (b[1] & INFET_EN) != 0,
            precharge_enabled: (b[2] & PRECHG_EN) != 0,
            track_enabled: (b[2] & TRACK_EN) != 0,
            fault_disable_mask: b[3],
            fsw_code,
            fsw_khz: FSW_BASE_KHZ + fsw_code as u16 * FSW_STEP_KHZ,
        }
    }
}

/// ADC snapshot in engineering units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AdcReadings {
    pub vin_mv: u16,
    pub vout_mv: u16,
    pub iin_ma: u16,
    pub tdie_c: i16,
}

impl AdcReadings {
    /// Convert the raw big-endian ADC block (VIN, VOUT, IIN, TDIE).
    pub fn from_block(b: &[u8; ADC_BLOCK_LEN], r_sense_mohm: u16) -> Self {
        let word = |i: usize| u16::from_be_bytes([b[i], b[i + 1]]) as u32;
        // Out-of-range codes pin at full scale instead of wrapping.
        let sat = |v: u32| v.min(u16::MAX as u32) as u16;
        let r = (r_sense_mohm as u32).max(1);
        Self {
            vin_mv: sat(word(0) * VIN_ADC_LSB_MV),
            vout_mv: sat(word(2) * VOUT_ADC_LSB_MV),
            // µV / mΩ = mA
            iin_ma: sat(word(4) * IIN_ADC_LSB_UV / r),
            tdie_c: (word(6) / 2) as i16 + TDIE_OFFSET_C,
        }
    }
}

/// Raw register contents DUMP_FIRST..DUMP_FIRST+DUMP_LEN.
///
/// The interrupt flag slots stay zero; see `RegisterDump::skips`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterDump {
    pub regs: [u8; DUMP_LEN],
}

impl RegisterDump {
    /// Whether `reg` is left out of the dump (reading it would clear it).
    pub fn skips(reg: u8) -> bool {
        (REG_INT_FLAG_1..=REG_INT_FLAG_2).contains(&reg)
    }

    /// Dumped value of `reg`; `None` outside the range or for skipped flags.
    pub fn get(&self, reg: u8) -> Option<u8> {
        if Self::skips(reg) {
            return None;
        }
        let idx = reg.checked_sub(DUMP_FIRST)? as usize;
        self.regs.get(idx).copied()
    }
}
