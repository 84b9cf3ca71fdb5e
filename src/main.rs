#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_backtrace as _;
use esp_hal::{self as hal};
use esp_println::logger::init_logger;

use hal::{
    clock::CpuClock,
    efuse::Efuse,
    gpio::{AnyPin, Level, Output, OutputConfig},
    i2c::master::{BusTimeout, I2c},
    time::Rate,
    timer::timg::TimerGroup,
};
use log::{error, info, warn};

use esp32_device_config::{constants::*, probe::probe_bus, registry, DeviceConfig};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    init_logger(log::LevelFilter::Info);

    let device = registry::active();

    let config = match cpu_clock(device) {
        Some(clock) => hal::Config::default().with_cpu_clock(clock),
        None => hal::Config::default(),
    };
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    info!("Firmware v{} starting", VERSION);
    info!("Device: {}", device);

    let mac = Efuse::mac_address();
    if !device.matches_mac(&mac) {
        match registry::find_by_mac(&mac) {
            Some(unit) => warn!(
                "MAC {:02x?} belongs to {}, not {}, wrong descriptor flashed?",
                mac, unit.id, device.id
            ),
            None => warn!(
                "MAC {:02x?} does not match {}, wrong descriptor flashed?",
                mac, device.id
            ),
        }
    }

    if let Err(errors) = device.validate() {
        for e in &errors {
            error!("Invalid device configuration: {}", e);
        }
        return;
    }

    // Pins below passed validation: each exists on this chip, is not wired to
    // the SPI flash, and is claimed by exactly one role.
    let mut led = device.has_led.then(|| {
        let pin = unsafe { AnyPin::steal(device.led_pin) };
        Output::new(pin, Level::High, OutputConfig::default())
    });

    // possibly high transient required at init
    // https://github.com/esp-rs/esp-hal/issues/1626
    Timer::after(Duration::from_millis(POWER_ON_DELAY_MS)).await;

    let (sda, scl) = unsafe {
        (
            AnyPin::steal(device.sda_pin),
            AnyPin::steal(device.scl_pin),
        )
    };

    let i2c_config = hal::i2c::master::Config::default()
        .with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ))
        .with_timeout(BusTimeout::BusCycles(I2C_TIMEOUT_BUS_CYCLES));

    let mut i2c = match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => i2c.with_sda(sda).with_scl(scl).into_async(),
        Err(e) => {
            error!("I2C configuration error: {:?}", e);
            return;
        }
    };

    let report = probe_bus(&mut i2c, device).await;
    if let Err(e) = report.environment {
        error!("Bus check failed: {}", e);
    }
    if let Some(Err(e)) = report.display {
        error!("Bus check failed: {}", e);
    }

    if report.is_healthy() {
        info!("Device {} ready", device.id);
    }

    // LED stays lit when healthy and blinks on a fault
    loop {
        if !report.is_healthy() {
            if let Some(led) = led.as_mut() {
                led.toggle();
            }
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

fn cpu_clock(device: &DeviceConfig) -> Option<CpuClock> {
    match device.cpu_frequency()? {
        80 => Some(CpuClock::_80MHz),
        160 => Some(CpuClock::_160MHz),
        #[cfg(feature = "esp32")]
        240 => Some(CpuClock::_240MHz),
        mhz => {
            warn!("Unsupported CPU clock {}MHz, keeping the default", mhz);
            None
        }
    }
}
