//! Register recipes for the operating-mode transitions.
//!
//! Each step is a masked field write. The controller looks the steps up
//! here and applies them in a fixed order; no bit arithmetic lives in the
//! transition code itself.

use super::regs::*;
use super::types::OpMode;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldWrite {
    pub reg: u8,
    pub mask: u8,
    pub val: u8,
}

impl FieldWrite {
    pub const fn new(reg: u8, mask: u8, val: u8) -> Self {
        Self { reg, mask, val }
    }
}

/// When a fault profile is applied relative to the mode-select write.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FaultStage {
    /// Relaxed profile held across the electrical transition.
    Temporary,
    /// Profile for the settled topology.
    Final,
}

struct FaultProfile {
    mode: OpMode,
    reverse: bool,
    stage: FaultStage,
    disable: u8,
}

const FAULT_FIELDS: u8 = 0xFF;

const fn fp(mode: OpMode, reverse: bool, stage: FaultStage, disable: u8) -> FaultProfile {
    FaultProfile { mode, reverse, stage, disable }
}

use FaultStage::{Final, Temporary};

#[rustfmt::skip]
const FAULT_PROFILES: [FaultProfile; 14] = [
    // STANDBY: written once, before MODE_SEL
    fp(OpMode::Standby,      false, Final,     IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS | WD_FAULT_DIS),
    fp(OpMode::Standby,      true,  Final,     VIN_OVP_DIS | IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS | WD_FAULT_DIS),
    // BYPASS
    fp(OpMode::Bypass,       false, Temporary, IIN_OCP_DIS | IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::Bypass,       false, Final,     IIN_UCP_DIS),
    fp(OpMode::Bypass,       true,  Temporary, VIN_OVP_DIS | REV_OCP_DIS | IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::Bypass,       true,  Final,     VIN_OVP_DIS | IIN_UCP_DIS),
    // SWITCHING
    fp(OpMode::Switching,    false, Temporary, IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::Switching,    false, Final,     VDROP_DIS),
    fp(OpMode::Switching,    true,  Temporary, VIN_OVP_DIS | REV_OCP_DIS | IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::Switching,    true,  Final,     VIN_OVP_DIS | VDROP_DIS),
    // SWITCHING_ALT
    fp(OpMode::SwitchingAlt, false, Temporary, IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::SwitchingAlt, false, Final,     IIN_UCP_DIS | VDROP_DIS),
    fp(OpMode::SwitchingAlt, true,  Temporary, VIN_OVP_DIS | REV_OCP_DIS | IIN_UCP_DIS | VDROP_DIS | VOUT_UVP_DIS),
    fp(OpMode::SwitchingAlt, true,  Final,     VIN_OVP_DIS | IIN_UCP_DIS | VDROP_DIS),
];

/// Precharge/track bits for a target mode.
pub fn precharge_step(mode: OpMode) -> Option<FieldWrite> {
    let val = match mode {
        OpMode::Standby => 0,
        OpMode::Bypass => PRECHG_EN,
        OpMode::Switching => PRECHG_EN | TRACK_EN,
        OpMode::SwitchingAlt => TRACK_EN,
        OpMode::Unknown(_) => return None,
    };
    Some(FieldWrite::new(REG_PRECHG_CTRL, PRECHG_EN | TRACK_EN, val))
}

/// Fault-detection disables for (mode, direction, stage).
/// STANDBY has no `Temporary` profile.
pub fn fault_profile(mode: OpMode, reverse: bool, stage: FaultStage) -> Option<FieldWrite> {
    FAULT_PROFILES
        .iter()
        .find(|p| p.mode == mode && p.reverse == reverse && p.stage == stage)
        .map(|p| FieldWrite::new(REG_FAULT_CTRL, FAULT_FIELDS, p.disable))
}

/// The MODE_SEL write that commits the transition.
pub fn mode_select(mode: OpMode) -> Option<FieldWrite> {
    if !mode.is_known() {
        return None;
    }
    Some(FieldWrite::new(
        REG_CTRL_0,
        MODE_SEL_MASK,
        (mode.code() << MODE_SEL_SHIFT) & MODE_SEL_MASK,
    ))
}
