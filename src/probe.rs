//! Boot-time presence check of the I2C peripherals a descriptor declares.
//!
//! This only asks each address whether something answers (and, for the
//! BME280, what chip it is). Driving the peripherals is left to their own
//! drivers.

use core::fmt;

use embedded_hal_async::i2c::I2c;
use log::{info, warn};

use crate::constants::*;
use crate::descriptor::{BusDevice, DeviceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    NotResponding { device: BusDevice, address: u8 },
    UnexpectedChipId { address: u8, chip_id: u8 },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::NotResponding { device, address } => {
                write!(f, "{} not responding at {:#04x}", device, address)
            }
            ProbeError::UnexpectedChipId { address, chip_id } => {
                write!(
                    f,
                    "unexpected chip id {:#04x} at {:#04x}, expected a BME280",
                    chip_id, address
                )
            }
        }
    }
}

/// Environment sensor found at the BME280 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentSensor {
    Bme280,
    // Pin compatible, reports no humidity
    Bmp280,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusReport {
    pub environment: Result<EnvironmentSensor, ProbeError>,
    // None when the board has no display
    pub display: Option<Result<(), ProbeError>>,
}

impl BusReport {
    /// Whether every declared peripheral answered as expected
    pub fn is_healthy(&self) -> bool {
        self.environment.is_ok() && self.display.map_or(true, |display| display.is_ok())
    }
}

pub async fn probe_bus<I: I2c>(i2c: &mut I, config: &DeviceConfig) -> BusReport {
    let environment = probe_environment(i2c, config.bme280_address).await;

    let display = if config.has_display {
        Some(probe_display(i2c, config.ssd1306_address).await)
    } else {
        None
    };

    BusReport {
        environment,
        display,
    }
}

pub async fn probe_environment<I: I2c>(
    i2c: &mut I,
    address: u8,
) -> Result<EnvironmentSensor, ProbeError> {
    let mut chip_id = [0u8; 1];
    i2c.write_read(address, &[BME280_CHIP_ID_REGISTER], &mut chip_id)
        .await
        .map_err(|_| ProbeError::NotResponding {
            device: BusDevice::Bme280,
            address,
        })?;

    match chip_id[0] {
        BME280_CHIP_ID => {
            info!("Found BME280 at {:#04x}", address);
            Ok(EnvironmentSensor::Bme280)
        }
        BMP280_CHIP_ID => {
            warn!("Found BMP280 at {:#04x}, humidity unavailable", address);
            Ok(EnvironmentSensor::Bmp280)
        }
        chip_id => Err(ProbeError::UnexpectedChipId { address, chip_id }),
    }
}

pub async fn probe_display<I: I2c>(i2c: &mut I, address: u8) -> Result<(), ProbeError> {
    // A single read returns the status register
    let mut status = [0u8; 1];
    i2c.read(address, &mut status)
        .await
        .map_err(|_| ProbeError::NotResponding {
            device: BusDevice::Ssd1306,
            address,
        })?;

    info!("Found SSD1306 at {:#04x}", address);
    Ok(())
}
