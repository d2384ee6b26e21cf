//! Async `no_std` drivers for a mobile power-path voltage divider (BC80)
//! and a Chipsea-style force sensor, built on `embedded-hal-async` and
//! `embassy-sync`.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod regmap;
pub mod shared_state;
pub mod bc80;
pub mod force_sensor;
pub mod ndt;
pub mod shell;

pub use regmap::{I2cRegmap, RegisterMap};
