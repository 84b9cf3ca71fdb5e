//! Per-board configuration descriptor.
//!
//! A [`DeviceConfig`] fully parameterizes one physical board: which
//! peripherals are fitted, where they are wired, and how the board should
//! behave around sleep. Every field exists for every board, so generic code
//! compiles against any of them. Fields belonging to a disabled feature keep
//! their authored placeholder and must not be read; the accessors below
//! return `None` for those.

use core::fmt;
use core::time::Duration;

use heapless::Vec;

use crate::validation::{self, ValidationErrors};

/// Target SoC of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Esp32,
    Esp32c3,
}

impl Chip {
    /// Whether the chip has a GPIO with this number
    pub const fn is_gpio(self, pin: u8) -> bool {
        match self {
            // GPIO20, 24 and 28..=31 are not bonded out
            Chip::Esp32 => matches!(pin, 0..=19 | 21..=23 | 25..=27 | 32..=39),
            Chip::Esp32c3 => pin <= 21,
        }
    }

    /// Whether the pin is wired to the in-package or module SPI flash
    pub const fn is_flash_pin(self, pin: u8) -> bool {
        match self {
            Chip::Esp32 => matches!(pin, 6..=11),
            Chip::Esp32c3 => matches!(pin, 12..=17),
        }
    }

    /// CPU clocks the chip can run at, in MHz
    pub const fn cpu_frequencies_mhz(self) -> &'static [u16] {
        match self {
            Chip::Esp32 => &[80, 160, 240],
            Chip::Esp32c3 => &[80, 160],
        }
    }

    /// Whether the pin is routed to ADC1 (ADC2 is unusable while Wi-Fi runs)
    pub const fn is_adc1_pin(self, pin: u8) -> bool {
        match self {
            Chip::Esp32 => pin >= 32 && pin <= 39,
            Chip::Esp32c3 => pin <= 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Chip::Esp32 => "esp32",
            Chip::Esp32c3 => "esp32c3",
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a GPIO is used for on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Led,
    Sda,
    Scl,
    Battery,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PinRole::Led => "LED",
            PinRole::Sda => "SDA",
            PinRole::Scl => "SCL",
            PinRole::Battery => "battery",
        })
    }
}

/// Peripherals addressed over the I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusDevice {
    Bme280,
    Ssd1306,
}

impl fmt::Display for BusDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusDevice::Bme280 => "BME280",
            BusDevice::Ssd1306 => "SSD1306",
        })
    }
}

/// Pins in use on a board, at most one per [`PinRole`]
pub type ActivePins = Vec<(PinRole, u8), 4>;

/// Bus addresses in use on a board, at most one per [`BusDevice`]
pub type BusDevices = Vec<(BusDevice, u8), 2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    // Identifier, matches the descriptor file name under devices/
    pub id: &'static str,

    // Human readable board name
    pub description: &'static str,

    // Target SoC
    pub chip: Chip,

    // Trailing bytes of the base MAC address identifying the physical unit
    pub mac_suffix: Option<&'static [u8]>,

    // Status LED fitted
    pub has_led: bool,

    // Battery voltage divider fitted
    pub has_battery: bool,

    // SSD1306 display fitted
    pub has_display: bool,

    // GPIO driving the status LED
    pub led_pin: u8,

    // I2C data line
    pub sda_pin: u8,

    // I2C clock line
    pub scl_pin: u8,

    // ADC input of the battery voltage divider
    pub battery_pin: u8,

    // BME280 7-bit I2C address
    pub bme280_address: u8,

    // SSD1306 7-bit I2C address
    pub ssd1306_address: u8,

    // Display width in pixels
    pub screen_width: u16,

    // Display height in pixels
    pub screen_height: u16,

    // Time spent in deep sleep between measurement cycles
    pub sleep_duration_us: u64,

    // CPU clock in MHz, 0 keeps the chip default
    pub cpu_freq_mhz: u16,

    // Shut the radio down before entering deep sleep
    pub wifi_off_before_sleep: bool,

    // Run the display at reduced contrast
    pub display_dim: bool,
}

impl DeviceConfig {
    /// CPU clock requested by the power policy, `None` for the chip default.
    pub const fn cpu_frequency(&self) -> Option<u16> {
        if self.cpu_freq_mhz == 0 {
            None
        } else {
            Some(self.cpu_freq_mhz)
        }
    }

    pub const fn sleep_duration(&self) -> Duration {
        Duration::from_micros(self.sleep_duration_us)
    }

    /// Display size as `(width, height)`, only when a display is fitted.
    pub const fn screen_geometry(&self) -> Option<(u16, u16)> {
        if self.has_display {
            Some((self.screen_width, self.screen_height))
        } else {
            None
        }
    }

    /// Whether any power saving option departs from the chip defaults
    pub const fn has_power_saving(&self) -> bool {
        self.cpu_freq_mhz != 0 || self.wifi_off_before_sleep || self.display_dim
    }

    /// Pins driven on this board.
    ///
    /// The BME280 is always wired, so the I2C pins are always listed.
    pub fn active_pins(&self) -> ActivePins {
        let mut pins = ActivePins::new();
        pins.push((PinRole::Sda, self.sda_pin)).ok();
        pins.push((PinRole::Scl, self.scl_pin)).ok();
        if self.has_led {
            pins.push((PinRole::Led, self.led_pin)).ok();
        }
        if self.has_battery {
            pins.push((PinRole::Battery, self.battery_pin)).ok();
        }
        pins
    }

    /// I2C peripherals expected on the bus.
    pub fn bus_devices(&self) -> BusDevices {
        let mut devices = BusDevices::new();
        devices.push((BusDevice::Bme280, self.bme280_address)).ok();
        if self.has_display {
            devices
                .push((BusDevice::Ssd1306, self.ssd1306_address))
                .ok();
        }
        devices
    }

    /// Whether `mac` ends with this board's MAC suffix.
    ///
    /// Boards without a suffix are generic and match any unit.
    pub fn matches_mac(&self, mac: &[u8; 6]) -> bool {
        match self.mac_suffix {
            Some(suffix) => mac.ends_with(suffix),
            None => true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate(self)
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.description, self.chip)?;

        write!(f, "; I2C sda={} scl={}", self.sda_pin, self.scl_pin)?;
        write!(f, "; BME280 @ {:#04x}", self.bme280_address)?;

        if self.has_led {
            write!(f, "; LED pin={}", self.led_pin)?;
        }
        if self.has_battery {
            write!(f, "; battery pin={}", self.battery_pin)?;
        }
        if let Some((width, height)) = self.screen_geometry() {
            write!(
                f,
                "; SSD1306 {}x{} @ {:#04x}",
                width, height, self.ssd1306_address
            )?;
        }

        write!(f, "; sleep {}s", self.sleep_duration().as_secs())?;

        match self.cpu_frequency() {
            Some(mhz) => write!(f, "; cpu {}MHz", mhz)?,
            None => write!(f, "; cpu default")?,
        }
        if self.wifi_off_before_sleep {
            write!(f, "; wifi off before sleep")?;
        }
        if self.has_display && self.display_dim {
            write!(f, "; display dimmed")?;
        }

        Ok(())
    }
}
