#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod descriptor;
#[cfg(test)]
mod device_file;
pub mod probe;
pub mod registry;
pub mod validation;

pub use descriptor::{BusDevice, Chip, DeviceConfig, PinRole};
pub use validation::{ConfigError, ValidationErrors};
