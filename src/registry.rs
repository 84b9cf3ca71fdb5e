//! Lookup over the descriptors compiled into this build.

use log::debug;

use crate::config::{ACTIVE, DEVICES};
use crate::descriptor::DeviceConfig;

/// Every compiled-in descriptor, sorted by id
pub fn all() -> &'static [&'static DeviceConfig] {
    DEVICES
}

/// The descriptor selected for this build
pub fn active() -> &'static DeviceConfig {
    ACTIVE
}

/// Finds a descriptor by id, ignoring ASCII case.
pub fn find(id: &str) -> Option<&'static DeviceConfig> {
    let found = DEVICES
        .iter()
        .copied()
        .find(|device| device.id.eq_ignore_ascii_case(id));

    if found.is_none() {
        debug!("No device descriptor named {}", id);
    }
    found
}

/// Finds the descriptor of the physical unit with this base MAC address.
///
/// Only descriptors declaring a MAC suffix take part; when several match,
/// the longest suffix wins.
pub fn find_by_mac(mac: &[u8; 6]) -> Option<&'static DeviceConfig> {
    longest_mac_match(DEVICES, mac)
}

fn longest_mac_match(
    devices: &[&'static DeviceConfig],
    mac: &[u8; 6],
) -> Option<&'static DeviceConfig> {
    devices
        .iter()
        .copied()
        .filter_map(|device| device.mac_suffix.map(|suffix| (device, suffix)))
        .filter(|(_, suffix)| mac.ends_with(suffix))
        .max_by_key(|(_, suffix)| suffix.len())
        .map(|(device, _)| device)
}
