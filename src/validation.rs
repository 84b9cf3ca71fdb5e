//! Startup checks on a [`DeviceConfig`].
//!
//! Descriptors are authored by hand, so nothing stops a board file from
//! wiring two peripherals to the same GPIO or asking for a display the
//! SSD1306 cannot drive. These checks run at boot and in the test suite and
//! report every problem found, not just the first.

use core::fmt;

use heapless::Vec;

use crate::constants::*;
use crate::descriptor::{BusDevice, Chip, DeviceConfig, PinRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    PinConflict {
        first: PinRole,
        second: PinRole,
        pin: u8,
    },
    PinOutOfRange {
        role: PinRole,
        pin: u8,
        chip: Chip,
    },
    FlashPin {
        role: PinRole,
        pin: u8,
        chip: Chip,
    },
    BatteryPinNotAnalog {
        pin: u8,
        chip: Chip,
    },
    AddressOutOfRange {
        device: BusDevice,
        address: u8,
    },
    UnexpectedAddress {
        device: BusDevice,
        address: u8,
    },
    AddressConflict {
        address: u8,
    },
    InvalidScreenGeometry {
        width: u16,
        height: u16,
    },
    ZeroSleepDuration,
    UnsupportedCpuFrequency {
        mhz: u16,
        chip: Chip,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PinConflict { first, second, pin } => {
                write!(f, "{} and {} both use GPIO{}", first, second, pin)
            }
            ConfigError::PinOutOfRange { role, pin, chip } => {
                write!(f, "{} pin GPIO{} does not exist on {}", role, pin, chip)
            }
            ConfigError::FlashPin { role, pin, chip } => {
                write!(f, "{} pin GPIO{} is wired to the SPI flash on {}", role, pin, chip)
            }
            ConfigError::BatteryPinNotAnalog { pin, chip } => {
                write!(f, "battery pin GPIO{} is not an ADC1 input on {}", pin, chip)
            }
            ConfigError::AddressOutOfRange { device, address } => {
                write!(f, "{} address {:#04x} is not a 7-bit address", device, address)
            }
            ConfigError::UnexpectedAddress { device, address } => {
                write!(f, "{} cannot answer at {:#04x}", device, address)
            }
            ConfigError::AddressConflict { address } => {
                write!(f, "BME280 and SSD1306 share address {:#04x}", address)
            }
            ConfigError::InvalidScreenGeometry { width, height } => {
                write!(f, "SSD1306 cannot drive a {}x{} screen", width, height)
            }
            ConfigError::ZeroSleepDuration => write!(f, "sleep duration is zero"),
            ConfigError::UnsupportedCpuFrequency { mhz, chip } => {
                write!(f, "{} cannot run at {}MHz", chip, mhz)
            }
        }
    }
}

/// Every violation found in one descriptor
pub type ValidationErrors = Vec<ConfigError, MAX_CONFIG_ERRORS>;

pub fn validate(config: &DeviceConfig) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_pins(config, &mut errors);
    check_addresses(config, &mut errors);
    check_screen(config, &mut errors);
    check_power(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_pins(config: &DeviceConfig, errors: &mut ValidationErrors) {
    let pins = config.active_pins();

    for (i, &(first, pin)) in pins.iter().enumerate() {
        for &(second, other) in &pins[i + 1..] {
            if pin == other {
                errors
                    .push(ConfigError::PinConflict { first, second, pin })
                    .ok();
            }
        }

        if !config.chip.is_gpio(pin) {
            errors
                .push(ConfigError::PinOutOfRange {
                    role: first,
                    pin,
                    chip: config.chip,
                })
                .ok();
        } else if config.chip.is_flash_pin(pin) {
            errors
                .push(ConfigError::FlashPin {
                    role: first,
                    pin,
                    chip: config.chip,
                })
                .ok();
        }
    }

    if config.has_battery && !config.chip.is_adc1_pin(config.battery_pin) {
        errors
            .push(ConfigError::BatteryPinNotAnalog {
                pin: config.battery_pin,
                chip: config.chip,
            })
            .ok();
    }
}

fn check_addresses(config: &DeviceConfig, errors: &mut ValidationErrors) {
    for (device, address) in config.bus_devices() {
        let expected = match device {
            BusDevice::Bme280 => BME280_ADDRESSES,
            BusDevice::Ssd1306 => SSD1306_ADDRESSES,
        };

        if address > I2C_MAX_ADDRESS {
            errors
                .push(ConfigError::AddressOutOfRange { device, address })
                .ok();
        } else if !expected.contains(&address) {
            errors
                .push(ConfigError::UnexpectedAddress { device, address })
                .ok();
        }
    }

    if config.has_display && config.bme280_address == config.ssd1306_address {
        errors
            .push(ConfigError::AddressConflict {
                address: config.bme280_address,
            })
            .ok();
    }
}

fn check_screen(config: &DeviceConfig, errors: &mut ValidationErrors) {
    let Some((width, height)) = config.screen_geometry() else {
        return;
    };

    let width_ok = (1..=SSD1306_MAX_WIDTH).contains(&width);
    let height_ok =
        (1..=SSD1306_MAX_HEIGHT).contains(&height) && height % SSD1306_PAGE_HEIGHT == 0;

    if !width_ok || !height_ok {
        errors
            .push(ConfigError::InvalidScreenGeometry { width, height })
            .ok();
    }
}

fn check_power(config: &DeviceConfig, errors: &mut ValidationErrors) {
    if config.sleep_duration_us == 0 {
        errors.push(ConfigError::ZeroSleepDuration).ok();
    }

    if let Some(mhz) = config.cpu_frequency() {
        if !config.chip.cpu_frequencies_mhz().contains(&mhz) {
            errors
                .push(ConfigError::UnsupportedCpuFrequency {
                    mhz,
                    chip: config.chip,
                })
                .ok();
        }
    }
}
