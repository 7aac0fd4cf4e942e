// Bubble level on the bench: polls the ICM-20948 and prints tilt over UART

#![no_main]
#![no_std]

use levelwatch::display::Bounds;
use levelwatch::drivers::imu::icm20948;
use levelwatch::{OrientationEstimator, RawSample};

use core::fmt::Write;
use cortex_m_rt::entry;
use panic_write::PanicHandler;
use stm32f4xx_hal as hal;

use crate::hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};

const SCREEN: Bounds = Bounds::new(144, 168);

#[entry]
fn main() -> ! {
    if let (Some(dp), Some(cp)) = (
        pac::Peripherals::take(),
        cortex_m::peripheral::Peripherals::take(),
    ) {
        let gpioa = dp.GPIOA.split();
        let gpiob = dp.GPIOB.split();

        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(48.MHz()).freeze();

        let mut delay = cp.SYST.delay(&clocks);

        // uart tx doubles as the panic output
        let tx_pin = gpioa.pa2.into_alternate();
        let serial = Serial::tx(
            dp.USART2,
            tx_pin,
            Config::default()
                .baudrate(115200.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let mut tx = PanicHandler::new(serial);

        // spi 1 to the imu
        let sclk = gpiob.pb3.into_alternate();
        let mosi = gpiob.pb5.into_alternate();
        let miso = gpiob.pb4.into_alternate();
        let cs = gpioa.pa4.into_push_pull_output();
        let spi = Spi::new(
            dp.SPI1,
            (sclk, miso, mosi),
            Mode {
                polarity: Polarity::IdleLow,
                phase: Phase::CaptureOnFirstTransition,
            },
            1.MHz(),
            &clocks,
        );

        writeln!(tx, "Initializing IMU...\r").unwrap();

        // ~10 Hz output data rate, 80 mg wake-on-motion
        let mut imu = icm20948::ICM20948::new(spi, cs);
        match imu.init(
            &mut delay,
            icm20948::AccelFullScaleSel::Gpm2,
            icm20948::AccelDLPFSel::D5bw7N8bw3,
            111,
            80,
        ) {
            Ok(_) => writeln!(tx, "IMU initialized\r").unwrap(),
            Err(e) => {
                writeln!(tx, "IMU init failed: {:?}\r", e).unwrap();
                panic!();
            }
        }

        let mut estimator = OrientationEstimator::default();

        loop {
            match imu.data_ready() {
                Ok(true) => match imu.read_accel() {
                    Ok(_) => {
                        let (x, y, z) = imu.get_accel_mg();
                        let sample = RawSample {
                            x,
                            y,
                            z,
                            disturbed: imu.motion_detected(),
                        };
                        match estimator.ingest(sample) {
                            Some((vector, tilt)) => {
                                let (bx, by) = SCREEN.bubble(&vector);
                                writeln!(tx, "tilt: {} bubble: ({}, {})\r", tilt, bx, by).unwrap();
                            }
                            None => writeln!(tx, "held: {:?}\r", estimator.check(&sample)).unwrap(),
                        }
                    }
                    Err(e) => writeln!(tx, "read failed: {:?}\r", e).unwrap(),
                },
                Ok(false) => {}
                Err(e) => writeln!(tx, "status failed: {:?}\r", e).unwrap(),
            }
            delay.delay_ms(100_u32);
        }
    }

    loop {}
}
