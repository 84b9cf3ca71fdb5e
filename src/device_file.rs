//! Checks on the authored `devices/*.toml` files.
//!
//! Shared between `build.rs`, which turns the files into constants, and the
//! test suite. Everything here is pure: the build script reads the files and
//! the environment and hands the values in.

use std::string::String;
use std::vec::Vec;
use std::{format, vec};

/// Names the generated code defines besides the per-device constants
pub const RESERVED_NAMES: &[&str] = &["DEVICES", "ACTIVE"];

/// Constant generated for a device id
pub fn const_name(id: &str) -> String {
    id.to_ascii_uppercase()
}

// Device ids become constant names, so they must be plain identifiers
pub fn check_identifier(id: &str) -> Result<(), String> {
    let valid = id.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!(
            "devices/{id}.toml: device id must match [A-Za-z][A-Za-z0-9_]*"
        ));
    }
    Ok(())
}

/// Rejects ids whose constants would clash with each other or with the
/// generated table names.
pub fn check_const_names<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), String> {
    let mut seen: Vec<(String, &str)> = vec![];

    for id in ids {
        let name = const_name(id);

        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(format!(
                "devices/{id}.toml: device id clashes with the generated {name}"
            ));
        }
        if let Some((_, other)) = seen.iter().find(|(n, _)| *n == name) {
            return Err(format!(
                "devices/{id}.toml: device id only differs in case from devices/{other}.toml"
            ));
        }

        seen.push((name, id));
    }
    Ok(())
}

pub fn chip_variant(chip: &str) -> Option<&'static str> {
    match chip {
        "esp32" => Some("Esp32"),
        "esp32c3" => Some("Esp32c3"),
        _ => None,
    }
}

// "00:A4" -> [0x00, 0xA4], between one and six bytes
pub fn parse_mac_suffix(suffix: &str) -> Option<Vec<u8>> {
    let bytes = suffix
        .split(':')
        .map(|part| {
            if part.len() == 2 {
                u8::from_str_radix(part, 16).ok()
            } else {
                None
            }
        })
        .collect::<Option<Vec<_>>>()?;
    (1..=6).contains(&bytes.len()).then_some(bytes)
}

/// Picks the device named `selected`, ignoring ASCII case.
pub fn select<'a>(ids: &[&'a str], selected: &str) -> Result<&'a str, String> {
    ids.iter()
        .copied()
        .find(|id| id.eq_ignore_ascii_case(selected))
        .ok_or_else(|| format!("unknown device {selected:?}, expected one of {ids:?}"))
}

/// Firmware builds need exactly one chip feature, matching the device chip.
pub fn check_chip_feature(
    id: &str,
    chip: &str,
    firmware: bool,
    enabled: &[&str],
) -> Result<(), String> {
    if !firmware {
        return Ok(());
    }

    match enabled {
        [feature] if *feature == chip => Ok(()),
        [feature] => Err(format!(
            "device {id} is an {chip} board but the {feature} feature is enabled"
        )),
        _ => Err(format!(
            "firmware builds need exactly one chip feature, use --features {chip}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(check_identifier("lolin_d32_00A4").is_ok());
        assert!(check_identifier("esp32c3_template").is_ok());

        for id in ["", "1board", "_board", "lolin-d32", "board.v2"] {
            assert!(check_identifier(id).is_err(), "{id:?}");
        }
    }

    #[test]
    fn test_const_names_case_collision() {
        let err = check_const_names(["lolin_d32_00A4", "LOLIN_d32_00a4"]).unwrap_err();
        assert_eq!(
            err,
            "devices/LOLIN_d32_00a4.toml: device id only differs in case from devices/lolin_d32_00A4.toml"
        );
    }

    #[test]
    fn test_const_names_reserved() {
        for id in ["devices", "Active"] {
            let err = check_const_names(["esp32c3_template", id]).unwrap_err();
            assert!(err.starts_with(&format!("devices/{id}.toml:")), "{err}");
        }
    }

    #[test]
    fn test_const_names_distinct() {
        assert!(check_const_names([
            "esp32c3_template",
            "esp32c3_template_power_saving",
            "lolin_d32_00A4",
        ])
        .is_ok());
    }

    #[test]
    fn test_chip_variant() {
        assert_eq!(chip_variant("esp32"), Some("Esp32"));
        assert_eq!(chip_variant("esp32c3"), Some("Esp32c3"));
        assert_eq!(chip_variant("esp32s3"), None);
        assert_eq!(chip_variant("ESP32"), None);
    }

    #[test]
    fn test_mac_suffix() {
        assert_eq!(parse_mac_suffix("00:A4"), Some(vec![0x00, 0xA4]));
        assert_eq!(parse_mac_suffix("a4"), Some(vec![0xA4]));
        assert_eq!(
            parse_mac_suffix("24:0a:c4:5e:00:a4"),
            Some(vec![0x24, 0x0A, 0xC4, 0x5E, 0x00, 0xA4])
        );

        for suffix in ["", "0:A4", "00:A4:", "00-A4", "zz", "00:11:22:33:44:55:66"] {
            assert_eq!(parse_mac_suffix(suffix), None, "{suffix:?}");
        }
    }

    #[test]
    fn test_select() {
        let ids = ["esp32c3_template", "lolin_d32_00A4"];
        assert_eq!(select(&ids, "LOLIN_D32_00a4"), Ok("lolin_d32_00A4"));

        let err = select(&ids, "lolin_d32").unwrap_err();
        assert!(err.starts_with("unknown device \"lolin_d32\""), "{err}");
    }

    #[test]
    fn test_chip_feature() {
        // Library and test builds need no chip
        assert!(check_chip_feature("lolin_d32_00A4", "esp32", false, &[]).is_ok());

        assert!(check_chip_feature("lolin_d32_00A4", "esp32", true, &["esp32"]).is_ok());
        assert_eq!(
            check_chip_feature("lolin_d32_00A4", "esp32", true, &["esp32c3"]),
            Err("device lolin_d32_00A4 is an esp32 board but the esp32c3 feature is enabled".into())
        );
        assert!(check_chip_feature("lolin_d32_00A4", "esp32", true, &[]).is_err());
        assert!(
            check_chip_feature("lolin_d32_00A4", "esp32", true, &["esp32", "esp32c3"]).is_err()
        );
    }
}
