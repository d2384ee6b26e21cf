//! src/shared_state.rs

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::PubSubChannel;

use crate::bc80::{AdcReadings, CableType, OpMode};

/// Snapshot broadcast by the BC80 monitor task.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bc80Readings {
    pub mode: OpMode,
    pub cable: CableType,
    pub reverse_power: bool,
    pub infet_enabled: bool,
    pub adc: AdcReadings,
}

/// The PubSubChannel for broadcasting BC80 readings.
///
/// Buffer for 2 messages, up to 3 subscribers, 1 publisher.
pub static BC80_CHANNEL: PubSubChannel<CriticalSectionRawMutex, Bc80Readings, 2, 3, 1> =
    PubSubChannel::new();

/// Cable classification changes from the charger/PD stack.
pub static CABLE_CHANNEL: PubSubChannel<CriticalSectionRawMutex, CableType, 4, 1, 3> =
    PubSubChannel::new();

/// The commands that can be sent to the BC80 task.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bc80Command {
    SetMode(OpMode),
    SetInfet(bool),
    SetReversePower(bool),
    Dump,
}

/// The PubSubChannel for sending commands to the BC80 task.
pub static BC80_COMMAND_CHANNEL: PubSubChannel<CriticalSectionRawMutex, Bc80Command, 2, 1, 3> =
    PubSubChannel::new();
