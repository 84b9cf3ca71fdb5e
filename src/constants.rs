/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// I2C bus clock in kHz
pub const I2C_FREQUENCY_KHZ: u32 = 100;
/// I2C bus timeout in bus cycles
pub const I2C_TIMEOUT_BUS_CYCLES: u32 = 24;
/// Highest 7-bit I2C address
pub const I2C_MAX_ADDRESS: u8 = 0x7F;

/// Addresses a BME280 can be strapped to (SDO low / high)
pub const BME280_ADDRESSES: &[u8] = &[0x76, 0x77];
/// BME280 chip identification register
pub const BME280_CHIP_ID_REGISTER: u8 = 0xD0;
/// Chip ID reported by a BME280
pub const BME280_CHIP_ID: u8 = 0x60;
/// Chip ID reported by a BMP280 (same footprint, no humidity)
pub const BMP280_CHIP_ID: u8 = 0x58;

/// Addresses an SSD1306 can be strapped to (SA0 low / high)
pub const SSD1306_ADDRESSES: &[u8] = &[0x3C, 0x3D];
/// Columns driven by the SSD1306
pub const SSD1306_MAX_WIDTH: u16 = 128;
/// Rows driven by the SSD1306
pub const SSD1306_MAX_HEIGHT: u16 = 64;
/// Rows per SSD1306 RAM page
pub const SSD1306_PAGE_HEIGHT: u16 = 8;

/// Upper bound on errors reported for one descriptor
pub const MAX_CONFIG_ERRORS: usize = 24;

/// Delay before touching the I2C bus after power on, in milliseconds
pub const POWER_ON_DELAY_MS: u64 = 1000;
