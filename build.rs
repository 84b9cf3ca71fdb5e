use std::{env, error::Error, fmt::Write as _, fs, path::Path};

use serde::Deserialize;

#[path = "src/device_file.rs"]
mod device_file;

use device_file::{
    chip_variant, check_chip_feature, check_const_names, check_identifier, const_name,
    parse_mac_suffix, select,
};

#[derive(Deserialize)]
struct RawConfig {
    device: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDevice {
    description: String,
    chip: String,
    mac_suffix: Option<String>,
    features: RawFeatures,
    pins: RawPins,
    bme280: RawBme280,
    ssd1306: RawSsd1306,
    sleep: RawSleep,
    power_saving: Option<RawPowerSaving>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFeatures {
    led: bool,
    battery: bool,
    display: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPins {
    led: u8,
    sda: u8,
    scl: u8,
    battery: u8,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBme280 {
    address: u8,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSsd1306 {
    address: u8,
    width: u16,
    height: u16,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSleep {
    duration_us: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPowerSaving {
    cpu_freq_mhz: u16,
    wifi_off_before_sleep: bool,
    display_dim: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if the selection or any device changes
    println!("cargo:rerun-if-changed=cfg.toml");
    println!("cargo:rerun-if-changed=devices");
    println!("cargo:rerun-if-changed=src/device_file.rs");
    println!("cargo:rerun-if-env-changed=DEVICE");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR")?;
    let root = Path::new(&manifest_dir);

    // Read every device descriptor, sorted so the generated table is stable
    let mut files: Vec<_> = fs::read_dir(root.join("devices"))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut devices = Vec::with_capacity(files.len());
    for path in &files {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("invalid device file name: {}", path.display()))?
            .to_owned();
        check_identifier(&id)?;

        let toml_str = fs::read_to_string(path)?;
        let raw: RawDevice =
            toml::from_str(&toml_str).map_err(|e| format!("devices/{id}.toml: {e}"))?;
        devices.push((id, raw));
    }

    if devices.is_empty() {
        return Err("no device descriptors found under devices/".into());
    }

    let ids: Vec<&str> = devices.iter().map(|(id, _)| id.as_str()).collect();
    check_const_names(ids.iter().copied())?;

    // DEVICE overrides the selection in cfg.toml
    let selected = match env::var("DEVICE") {
        Ok(device) if !device.is_empty() => device,
        _ => {
            let cfg_str = fs::read_to_string(root.join("cfg.toml"))?;
            let raw: RawConfig = toml::from_str(&cfg_str)?;
            raw.device
        }
    };

    let active_id = select(&ids, &selected)?;
    let active = devices
        .iter()
        .find(|(id, _)| id == active_id)
        .map(|(_, raw)| raw)
        .ok_or_else(|| format!("unknown device {active_id:?}"))?;

    let enabled: Vec<_> = [("esp32", "CARGO_FEATURE_ESP32"), ("esp32c3", "CARGO_FEATURE_ESP32C3")]
        .into_iter()
        .filter(|(_, var)| env::var_os(var).is_some())
        .map(|(feature, _)| feature)
        .collect();
    // Flashing a descriptor onto the wrong chip is caught before it links
    check_chip_feature(
        active_id,
        &active.chip,
        env::var_os("CARGO_FEATURE_FIRMWARE").is_some(),
        &enabled,
    )?;

    // Generate Rust code
    let mut code = String::new();
    for (id, raw) in &devices {
        write_device(&mut code, id, raw)?;
    }

    writeln!(code, "pub const DEVICES: &[&DeviceConfig] = &[")?;
    for id in &ids {
        writeln!(code, "    &{},", const_name(id))?;
    }
    writeln!(code, "];")?;
    writeln!(
        code,
        "pub const ACTIVE: &DeviceConfig = &{};",
        const_name(active_id)
    )?;

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("devices.rs");
    fs::write(dest_path, code)?;

    println!("cargo:warning=building for device {active_id}");

    Ok(())
}

fn write_device(code: &mut String, id: &str, raw: &RawDevice) -> Result<(), Box<dyn Error>> {
    let chip = chip_variant(&raw.chip).ok_or_else(|| {
        format!(
            "devices/{id}.toml: unknown chip {:?}, expected \"esp32\" or \"esp32c3\"",
            raw.chip
        )
    })?;

    let mac_suffix = match &raw.mac_suffix {
        Some(suffix) => {
            let bytes = parse_mac_suffix(suffix)
                .ok_or_else(|| format!("devices/{id}.toml: invalid mac_suffix {suffix:?}"))?;
            let bytes: Vec<_> = bytes.iter().map(|b| format!("{b:#04x}")).collect();
            format!("Some(&[{}])", bytes.join(", "))
        }
        None => "None".to_owned(),
    };

    // Devices without a power saving block keep the chip defaults
    let (cpu_freq_mhz, wifi_off_before_sleep, display_dim) = match &raw.power_saving {
        Some(p) => (p.cpu_freq_mhz, p.wifi_off_before_sleep, p.display_dim),
        None => (0, false, false),
    };

    write!(
        code,
        r#"
pub const {name}: DeviceConfig = DeviceConfig {{
    id: {id:?},
    description: {description:?},
    chip: Chip::{chip},
    mac_suffix: {mac_suffix},
    has_led: {has_led},
    has_battery: {has_battery},
    has_display: {has_display},
    led_pin: {led_pin},
    sda_pin: {sda_pin},
    scl_pin: {scl_pin},
    battery_pin: {battery_pin},
    bme280_address: {bme280:#04x},
    ssd1306_address: {ssd1306:#04x},
    screen_width: {width},
    screen_height: {height},
    sleep_duration_us: {sleep},
    cpu_freq_mhz: {cpu_freq_mhz},
    wifi_off_before_sleep: {wifi_off_before_sleep},
    display_dim: {display_dim},
}};
"#,
        name = const_name(id),
        description = raw.description,
        has_led = raw.features.led,
        has_battery = raw.features.battery,
        has_display = raw.features.display,
        led_pin = raw.pins.led,
        sda_pin = raw.pins.sda,
        scl_pin = raw.pins.scl,
        battery_pin = raw.pins.battery,
        bme280 = raw.bme280.address,
        ssd1306 = raw.ssd1306.address,
        width = raw.ssd1306.width,
        height = raw.ssd1306.height,
        sleep = raw.sleep.duration_us,
    )?;

    Ok(())
}
