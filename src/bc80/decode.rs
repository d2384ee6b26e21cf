//! Human-readable decoders for BC80 flags and status.

use super::regs::*;

pub const FLAG1_MAP: &[(&str, u8)] = &[
    ("VIN_OVP", VIN_OVP_FLAG),
    ("VOUT_OVP", VOUT_OVP_FLAG),
    ("IIN_OCP", IIN_OCP_FLAG),
    ("IIN_UCP", IIN_UCP_FLAG),
    ("REV_OCP", REV_OCP_FLAG),
    ("VDROP", VDROP_FLAG),
    ("VOUT_UVP", VOUT_UVP_FLAG),
    ("WD", WD_FLAG),
];

pub const FLAG2_MAP: &[(&str, u8)] = &[
    ("VIN_PLUG", VIN_PLUG_FLAG),
    ("MODE_CHG", MODE_CHG_FLAG),
    ("ADC_DONE", ADC_DONE_FLAG),
    ("TSHUT", TSHUT_FLAG),
];

pub const STATUS_MAP: &[(&str, u8)] = &[
    ("VIN_PRESENT", VIN_PRESENT_STAT),
    ("VOUT_OK", VOUT_OK_STAT),
    ("SWITCHING", SWITCHING_STAT),
    ("BYPASS", BYPASS_STAT),
    ("TSHUT", TSHUT_STAT),
];

/// Names of the bits set in `val`, in map order.
pub fn named_bits<'a>(
    val: u8,
    map: &'a [(&'static str, u8)],
) -> impl Iterator<Item = &'static str> + 'a {
    map.iter()
        .filter(move |(_, mask)| (val & *mask) != 0)
        .map(|(name, _)| *name)
}

fn log_named_bits(tag: &str, val: u8, map: &[(&'static str, u8)]) {
    let mut any = false;
    for name in named_bits(val, map) {
        if !any {
            info!("{} = 0x{:02X}:", tag, val);
            any = true;
        }
        info!("  - {}", name);
    }
    if !any {
        debug!("{}: (none set, 0x{:02X})", tag, val);
    }
}

pub fn log_flag1(f1: u8) {
    log_named_bits("BC80 FLAG1", f1, FLAG1_MAP);
}

pub fn log_flag2(f2: u8) {
    log_named_bits("BC80 FLAG2", f2, FLAG2_MAP);
}

pub fn log_status(s: u8) {
    log_named_bits("BC80 STATUS", s, STATUS_MAP);
}
