#![no_main]
#![no_std]

mod config;
mod delay;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [SPI2])]
mod app {
    use crate::config::sys_config;
    use crate::delay::BusyDelay;
    use core::fmt::Write;
    use cortex_m::asm;
    use levelwatch::drivers::imu::icm20948;
    use levelwatch::{EstimatorConfig, FilterStrength, OrientationEstimator, RawSample};
    use panic_write::PanicHandler;
    use stm32f4xx_hal::{
        gpio::{Alternate, Edge, ExtiPin, Input, Output, Pin, PushPull, PB3, PB4, PB5},
        pac::{SPI1, USART2},
        prelude::*,
        serial::{Config, Serial, Tx},
        spi::{Mode, Phase, Polarity, Spi},
    };
    use systick_monotonic::{fugit::Duration, Systick};

    #[shared]
    struct Shared {
        estimator: OrientationEstimator,
        tx: core::pin::Pin<panic_write::PanicHandler<Tx<USART2>>>,
    }

    #[local]
    struct Local {
        imu: icm20948::ICM20948<
            Spi<SPI1, (PB3<Alternate<5>>, PB4<Alternate<5>>, PB5<Alternate<5>>)>,
            Pin<'A', 4, Output<PushPull>>,
        >,
        button: Pin<'C', 13, Input>,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1000>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut dp = ctx.device;

        // configure clocks
        let rcc = dp.RCC.constrain();
        let mono = Systick::new(ctx.core.SYST, sys_config::SYSCLK_MHZ * 1_000_000);
        let clocks = rcc.cfgr.sysclk(sys_config::SYSCLK_MHZ.MHz()).freeze();

        let gpioa = dp.GPIOA.split();
        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();

        // configure IMU spi and cs
        let imu_cs = gpioa.pa4.into_push_pull_output();
        let imu_sclk = gpiob.pb3.into_alternate();
        let imu_mosi = gpiob.pb5.into_alternate();
        let imu_miso = gpiob.pb4.into_alternate();
        let imu_spi = Spi::new(
            dp.SPI1,
            (imu_sclk, imu_miso, imu_mosi),
            Mode {
                polarity: Polarity::IdleLow,
                phase: Phase::CaptureOnFirstTransition,
            },
            sys_config::IMU_SPI_FREQ_MHZ.MHz(),
            &clocks,
        );

        // set up uart tx
        let tx_pin = gpioa.pa2.into_alternate();
        let serial = Serial::tx(
            dp.USART2,
            tx_pin,
            Config::default()
                .baudrate(sys_config::UART_BAUD.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let mut tx = PanicHandler::new(serial);

        // user button cycles the filter strength
        let mut syscfg = dp.SYSCFG.constrain();
        let mut button = gpioc.pc13.into_pull_up_input();
        button.make_interrupt_source(&mut syscfg);
        button.trigger_on_edge(&mut dp.EXTI, Edge::Falling);
        button.enable_interrupt(&mut dp.EXTI);

        // set up IMU sensor
        let mut delay = BusyDelay::new(sys_config::SYSCLK_MHZ);
        let mut imu = icm20948::ICM20948::new(imu_spi, imu_cs);
        match imu.init(
            &mut delay,
            icm20948::AccelFullScaleSel::Gpm2,
            icm20948::AccelDLPFSel::D5bw7N8bw3,
            sys_config::ACCEL_SAMPLE_RATE_DIV,
            sys_config::ACCEL_WOM_THRESHOLD_MG,
        ) {
            Ok(_) => writeln!(tx, "imu initialized\r").unwrap(),
            Err(e) => {
                match e {
                    icm20948::ErrorCode::ParamError => writeln!(tx, "param error\r").unwrap(),
                    icm20948::ErrorCode::SpiError => writeln!(tx, "SPI error\r").unwrap(),
                    icm20948::ErrorCode::WrongID => writeln!(tx, "wrong ID\r").unwrap(),
                    icm20948::ErrorCode::CSError => writeln!(tx, "CS error\r").unwrap(),
                }
                panic!("imu initialization failed");
            }
        }

        let estimator = match EstimatorConfig::new(
            sys_config::AXIS_LIMIT_MG,
            Some(sys_config::MAGNITUDE_WINDOW),
        )
        .and_then(|config| {
            FilterStrength::new(sys_config::DEFAULT_FILTER_STRENGTH)
                .map(|strength| OrientationEstimator::new(config, strength))
        }) {
            Ok(estimator) => estimator,
            Err(e) => {
                writeln!(tx, "{}\r", e).unwrap();
                panic!("estimator configuration failed");
            }
        };

        writeln!(tx, "system initialized\r").unwrap();

        sample_accel::spawn_after(Duration::<u64, 1, 1000>::millis(
            sys_config::ACCEL_UPDATE_PERIOD_MS,
        ))
        .unwrap();

        (
            Shared { estimator, tx },
            Local { imu, button },
            init::Monotonics(mono),
        )
    }

    #[task(local = [imu], shared = [estimator, tx])]
    fn sample_accel(mut cx: sample_accel::Context) {
        let imu = cx.local.imu;
        // no new conversion since the last read: keep the motion latch for
        // the next one and try again next period
        let sample = match imu.data_ready() {
            Ok(true) => imu.read_accel().map(|_| {
                let (x, y, z) = imu.get_accel_mg();
                Some(RawSample {
                    x,
                    y,
                    z,
                    disturbed: imu.motion_detected(),
                })
            }),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };

        match sample {
            Ok(None) => {}
            Ok(Some(sample)) => {
                // rejected samples keep the last reading on screen
                let reading = cx.shared.estimator.lock(|estimator| estimator.ingest(sample));
                if let Some((vector, tilt)) = reading {
                    let (bx, by) = sys_config::SCREEN.bubble(&vector);
                    cx.shared.tx.lock(|tx| {
                        writeln!(tx, "tilt: {} bubble: ({}, {})\r", tilt, bx, by).ok();
                    });
                }
            }
            Err(e) => {
                cx.shared.tx.lock(|tx| {
                    writeln!(tx, "imu read failed: {:?}\r", e).ok();
                });
            }
        }

        // run at ~10 Hz
        sample_accel::spawn_after(Duration::<u64, 1, 1000>::millis(
            sys_config::ACCEL_UPDATE_PERIOD_MS,
        ))
        .unwrap();
    }

    #[task(binds = EXTI15_10, local = [button], shared = [estimator, tx])]
    fn button_pressed(mut cx: button_pressed::Context) {
        cx.local.button.clear_interrupt_pending_bit();
        let strength = cx.shared.estimator.lock(|estimator| {
            let next = estimator.filter_strength().next();
            estimator.set_filter_strength(next);
            next
        });
        cx.shared.tx.lock(|tx| {
            writeln!(tx, "filter strength: {}\r", strength.shift()).ok();
        });
    }

    #[idle]
    fn idle(_ctx: idle::Context) -> ! {
        loop {
            asm::nop();
        }
    }
}
