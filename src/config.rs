//! Compiled-in device descriptors.
//!
//! `build.rs` turns every `devices/<id>.toml` into a `pub const <ID>:
//! DeviceConfig`, lists them in `DEVICES`, and points `ACTIVE` at the one
//! named by the `DEVICE` environment variable or by `device` in `cfg.toml`.

use crate::descriptor::{Chip, DeviceConfig};

// descriptors are generated at compile time
include!(concat!(env!("OUT_DIR"), "/devices.rs"));
