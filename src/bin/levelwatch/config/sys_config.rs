use levelwatch::display::Bounds;
use levelwatch::MagnitudeWindow;

pub const SYSCLK_MHZ: u32 = 48;
pub const IMU_SPI_FREQ_MHZ: u32 = 1;
pub const UART_BAUD: u32 = 115200;

// estimator update period, ~10 Hz
pub const ACCEL_UPDATE_PERIOD_MS: u64 = 100;
// sensor output data rate 1125 / (1 + 111) ~ 10 Hz
pub const ACCEL_SAMPLE_RATE_DIV: u16 = 111;
// sample-to-sample jump that marks a sample as disturbed
pub const ACCEL_WOM_THRESHOLD_MG: u16 = 80;

// milli-g calibration: 1g ~ 1000
pub const AXIS_LIMIT_MG: u16 = 1200;
pub const MAGNITUDE_WINDOW: MagnitudeWindow = MagnitudeWindow {
    min_sq: 640_000,
    max_sq: 1_440_000,
};
pub const DEFAULT_FILTER_STRENGTH: u8 = 3;

pub const SCREEN: Bounds = Bounds::new(144, 168);
