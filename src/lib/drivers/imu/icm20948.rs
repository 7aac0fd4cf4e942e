// ICM-20948 accelerometer driver, SPI only
// Datasheet: https://invensense.tdk.com/wp-content/uploads/2021/10/DS-000189-ICM-20948-v1.5.pdf
// Gyro and magnetometer stay powered down; the level only needs gravity and
// the wake-on-motion interrupt.

pub use super::icm20948_constants::*;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;

// Error codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    ParamError,
    SpiError,
    WrongID,
    CSError,
}

#[derive(Default)]
struct Axes {
    x: i16,
    y: i16,
    z: i16,
}

struct SpiWrapper<SPI, CS> {
    spi_bus: SPI,
    cs: CS,
}

impl<SPI, CS> SpiWrapper<SPI, CS>
where
    SPI: Write<u8> + Transfer<u8>,
    CS: OutputPin,
{
    fn transfer<'a>(&mut self, data: &'a mut [u8]) -> Result<&'a [u8], ErrorCode> {
        if self.cs.set_low().is_err() {
            return Err(ErrorCode::CSError);
        }
        let res = self.spi_bus.transfer(data);
        if self.cs.set_high().is_err() {
            return Err(ErrorCode::CSError);
        }
        match res {
            Ok(read_data) => Ok(&read_data[1..]),
            Err(_) => Err(ErrorCode::SpiError),
        }
    }
}

pub struct ICM20948<SPI, CS> {
    spi: SpiWrapper<SPI, CS>,
    curr_bank: u8,
    raw_accel: Axes,
    motion: bool,
    accel_fss: AccelFullScaleSel,
}

impl<SPI, CS> ICM20948<SPI, CS>
where
    SPI: Write<u8> + Transfer<u8>,
    CS: OutputPin,
{
    pub fn new(spi_bus: SPI, cs: CS) -> Self {
        Self {
            spi: SpiWrapper { spi_bus, cs },
            curr_bank: 255,
            raw_accel: Axes::default(),
            motion: false,
            accel_fss: AccelFullScaleSel::Gpm2,
        }
    }

    // sample_rate_div: output data rate is 1125 Hz / (1 + div)
    // wom_threshold_mg: sample-to-sample change that counts as motion, 0 disables
    pub fn init<D: DelayMs<u32>>(
        &mut self,
        delay: &mut D,
        fss_config: AccelFullScaleSel,
        dlpf_config: AccelDLPFSel,
        sample_rate_div: u16,
        wom_threshold_mg: u16,
    ) -> Result<(), ErrorCode> {
        if sample_rate_div > MAX_ACCEL_SAMPLE_RATE_DIV || wom_threshold_mg > MAX_WOM_THRESHOLD_MG
        {
            return Err(ErrorCode::ParamError);
        }

        self.check_id()?;
        self.sw_reset()?;
        delay.delay_ms(RESET_DELAY_MS);
        self.sleep(false)?;
        self.set_low_power(false)?;
        self.disable_gyro()?;

        self.config_accel(fss_config, dlpf_config)?;
        self.set_sample_rate(sample_rate_div)?;
        self.init_wake_on_motion(wom_threshold_mg)?;
        self.init_interrupt()?;
        Ok(())
    }

    pub fn data_ready(&mut self) -> Result<bool, ErrorCode> {
        self.set_bank(0)?;
        let data_ready = self.read_byte(RegAddrBank0::IntStatus1 as u8)?;
        Ok((data_ready & IntEnable1Bits::RawData0Ready as u8) != 0)
    }

    // Latches the wake-on-motion status together with the sample. The
    // status register clears on read, so motion since the previous call is
    // reported exactly once.
    pub fn read_accel(&mut self) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let status = self.read_byte(RegAddrBank0::IntStatus as u8)?;
        self.motion = (status & IntEnableBits::WakeOnMotion as u8) != 0;

        let mut bytes: [u8; ACCEL_DATA_NUM_BYTES + 1] = [0; ACCEL_DATA_NUM_BYTES + 1];
        bytes[0] = RegAddrBank0::AccelXoutH as u8;
        let buf = self.read_bytes(&mut bytes[..])?;
        self.raw_accel.x = i16::from_be_bytes([buf[0], buf[1]]);
        self.raw_accel.y = i16::from_be_bytes([buf[2], buf[3]]);
        self.raw_accel.z = i16::from_be_bytes([buf[4], buf[5]]);
        Ok(())
    }

    // (x, y, z) acceleration in milli G's
    pub fn get_accel_mg(&self) -> (i16, i16, i16) {
        (
            self.to_mg(self.raw_accel.x),
            self.to_mg(self.raw_accel.y),
            self.to_mg(self.raw_accel.z),
        )
    }

    // motion interrupt seen by the last read_accel
    pub fn motion_detected(&self) -> bool {
        self.motion
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi.spi_bus, self.spi.cs)
    }

    fn to_mg(&self, raw: i16) -> i16 {
        (raw as i32 * 1000 / self.accel_fss.lsb_per_g()) as i16
    }

    fn check_id(&mut self) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let whoami = self.read_byte(RegAddrBank0::WhoAmI as u8)?;
        if whoami != ICM_20948_WHO_AM_I {
            Err(ErrorCode::WrongID)
        } else {
            Ok(())
        }
    }

    fn sw_reset(&mut self) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let mut reg = self.read_byte(RegAddrBank0::PwrMgmt1 as u8)?;

        // Set DEVICE_RESET bit
        reg |= PwrMgmt1Bits::DeviceReset as u8;

        self.write_byte(RegAddrBank0::PwrMgmt1 as u8, reg)?;
        // the device comes back in bank 0
        self.curr_bank = 0;
        Ok(())
    }

    fn sleep(&mut self, sleep: bool) -> Result<(), ErrorCode> {
        self.update_bits(RegAddrBank0::PwrMgmt1 as u8, PwrMgmt1Bits::Sleep as u8, sleep)
    }

    fn set_low_power(&mut self, enable: bool) -> Result<(), ErrorCode> {
        self.update_bits(
            RegAddrBank0::PwrMgmt1 as u8,
            PwrMgmt1Bits::LPEnable as u8,
            enable,
        )
    }

    fn disable_gyro(&mut self) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let mut reg = self.read_byte(RegAddrBank0::PwrMgmt2 as u8)?;
        reg &= !(PwrMgmt2Bits::DisableAccel as u8);
        reg |= PwrMgmt2Bits::DisableGyro as u8;
        self.write_byte(RegAddrBank0::PwrMgmt2 as u8, reg)
    }

    fn config_accel(
        &mut self,
        fss_config: AccelFullScaleSel,
        dlpf_config: AccelDLPFSel,
    ) -> Result<(), ErrorCode> {
        self.set_bank(2)?;
        let mut config = self.read_byte(RegAddrBank2::AccelConfig as u8)?;

        // Configure DLPF
        if matches!(dlpf_config, AccelDLPFSel::Disable) {
            config &= !(AccelConfigBits::AccelFChoice as u8);
        } else {
            config &= !(AccelConfigBits::AccelDLPFCFG as u8);
            config |= ((dlpf_config as u8) << 3) | (AccelConfigBits::AccelFChoice as u8);
        }

        // Configure FS
        config &= !(AccelConfigBits::AccelFSSel as u8);
        config |= (fss_config as u8) << 1;

        self.write_byte(RegAddrBank2::AccelConfig as u8, config)?;
        self.accel_fss = fss_config;
        Ok(())
    }

    fn set_sample_rate(&mut self, div: u16) -> Result<(), ErrorCode> {
        self.set_bank(2)?;
        let [msb, lsb] = div.to_be_bytes();
        self.write_byte(RegAddrBank2::AccelSmplrtDiv1 as u8, msb & 0x0F)?;
        self.write_byte(RegAddrBank2::AccelSmplrtDiv2 as u8, lsb)
    }

    fn init_wake_on_motion(&mut self, threshold_mg: u16) -> Result<(), ErrorCode> {
        self.set_bank(2)?;
        let threshold = (threshold_mg / WOM_THRESHOLD_MG_PER_LSB) as u8;
        self.write_byte(RegAddrBank2::AccelWomThr as u8, threshold)?;

        let ctrl = if threshold == 0 {
            0
        } else {
            // compare each sample against the previous one
            AccelIntelCtrlBits::Enable as u8 | AccelIntelCtrlBits::CompareToPrevious as u8
        };
        self.write_byte(RegAddrBank2::AccelIntelCtrl as u8, ctrl)?;

        self.update_bits(
            RegAddrBank0::IntEnable as u8,
            IntEnableBits::WakeOnMotion as u8,
            threshold != 0,
        )
    }

    fn init_interrupt(&mut self) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let mut config = self.read_byte(RegAddrBank0::IntPinConfig as u8)?;

        config |= IntPinConfigBits::Int1ActiveLow as u8; // Configure active low by setting INT1_ACTL bit to 1
        config |= IntPinConfigBits::Int1Open as u8; // Configure open drain by setting INT1_OPEN bit to 1
        config &= !(IntPinConfigBits::Int1LatchEnable as u8); // Configure interrupt pulse width to 50us by setting INT1_LATCH_EN bit to 0
        config |= IntPinConfigBits::IntAnyReadToClear as u8; // Configure clear interrupt by any read operation by setting INT_ANYRD_2CLEAR bit to 1

        self.write_byte(RegAddrBank0::IntPinConfig as u8, config)?;

        self.update_bits(
            RegAddrBank0::IntEnable1 as u8,
            IntEnable1Bits::RawData0Ready as u8,
            true,
        )
    }

    // read-modify-write of a bank 0 register
    fn update_bits(&mut self, reg: u8, mask: u8, set: bool) -> Result<(), ErrorCode> {
        self.set_bank(0)?;
        let mut value = self.read_byte(reg)?;
        if set {
            value |= mask;
        } else {
            value &= !mask;
        }
        self.write_byte(reg, value)
    }

    fn set_bank(&mut self, bank: u8) -> Result<(), ErrorCode> {
        if bank > 3 {
            Err(ErrorCode::ParamError)
        } else if self.curr_bank == bank {
            Ok(())
        } else {
            self.write_byte(RegAddrGeneral::BankSel as u8, (bank << 4) & 0x30)?;
            self.curr_bank = bank;
            Ok(())
        }
    }

    fn write_byte(&mut self, reg: u8, data: u8) -> Result<(), ErrorCode> {
        let mut bytes = [reg, data];
        self.spi.transfer(&mut bytes[..]).map(|_| ())
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, ErrorCode> {
        let mut bytes = [reg | 0x80, 0];
        self.spi.transfer(&mut bytes[..]).map(|data| data[0])
    }

    fn read_bytes<'a>(&mut self, data: &'a mut [u8]) -> Result<&'a [u8], ErrorCode> {
        data[0] |= 0x80;
        self.spi.transfer(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    // Register file behind a fake SPI bus. Writing DEVICE_RESET restores
    // the power-on value of PWR_MGMT_1 like the real part does.
    struct FakeBus {
        regs: [[u8; 128]; 4],
        bank: usize,
        writes: Vec<(usize, u8, u8)>,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut regs = [[0u8; 128]; 4];
            regs[0][RegAddrBank0::WhoAmI as usize] = ICM_20948_WHO_AM_I;
            regs[0][RegAddrBank0::PwrMgmt1 as usize] = 0x41;
            Self {
                regs,
                bank: 0,
                writes: Vec::new(),
            }
        }

        fn written(&self, bank: usize, reg: u8) -> Option<u8> {
            self.writes
                .iter()
                .rev()
                .find(|(b, r, _)| *b == bank && *r == reg)
                .map(|(_, _, v)| *v)
        }
    }

    impl Transfer<u8> for FakeBus {
        type Error = Infallible;
        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Infallible> {
            let reg = (words[0] & 0x7F) as usize;
            let read = words[0] & 0x80 != 0;
            if read {
                for (i, word) in words[1..].iter_mut().enumerate() {
                    *word = self.regs[self.bank][reg + i];
                }
            } else if reg == RegAddrGeneral::BankSel as usize {
                self.bank = ((words[1] >> 4) & 0x03) as usize;
            } else {
                let mut value = words[1];
                if reg == RegAddrBank0::PwrMgmt1 as usize
                    && self.bank == 0
                    && value & PwrMgmt1Bits::DeviceReset as u8 != 0
                {
                    value = 0x41;
                    self.bank = 0;
                }
                self.regs[self.bank][reg] = value;
                self.writes.push((self.bank, reg as u8, value));
            }
            let words: &'w [u8] = words;
            Ok(words)
        }
    }

    impl Write<u8> for FakeBus {
        type Error = Infallible;
        fn write(&mut self, _words: &[u8]) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct FakePin;

    impl OutputPin for FakePin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayMs<u32> for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
    }

    fn init_default(bus: FakeBus) -> Result<ICM20948<FakeBus, FakePin>, ErrorCode> {
        let mut imu = ICM20948::new(bus, FakePin);
        imu.init(
            &mut NoDelay,
            AccelFullScaleSel::Gpm2,
            AccelDLPFSel::D5bw7N8bw3,
            111,
            80,
        )?;
        Ok(imu)
    }

    #[test]
    fn wrong_id_is_reported() {
        let mut bus = FakeBus::new();
        bus.regs[0][RegAddrBank0::WhoAmI as usize] = 0x12;
        assert_eq!(init_default(bus).err(), Some(ErrorCode::WrongID));
    }

    #[test]
    fn out_of_range_params_are_refused() {
        let mut imu = ICM20948::new(FakeBus::new(), FakePin);
        let res = imu.init(
            &mut NoDelay,
            AccelFullScaleSel::Gpm2,
            AccelDLPFSel::Disable,
            0x1000,
            0,
        );
        assert_eq!(res, Err(ErrorCode::ParamError));
        let res = imu.init(
            &mut NoDelay,
            AccelFullScaleSel::Gpm2,
            AccelDLPFSel::Disable,
            0,
            2000,
        );
        assert_eq!(res, Err(ErrorCode::ParamError));
    }

    #[test]
    fn init_configures_accel_only() {
        let imu = init_default(FakeBus::new()).unwrap();
        let (bus, _) = imu.release();

        let pwr1 = bus.regs[0][RegAddrBank0::PwrMgmt1 as usize];
        assert_eq!(pwr1 & PwrMgmt1Bits::Sleep as u8, 0);
        assert_eq!(pwr1 & PwrMgmt1Bits::LPEnable as u8, 0);
        assert_eq!(bus.regs[0][RegAddrBank0::PwrMgmt2 as usize], 0x07);

        // DLPF 6, +-2g, FCHOICE
        assert_eq!(bus.written(2, RegAddrBank2::AccelConfig as u8), Some(0x31));
        assert_eq!(bus.written(2, RegAddrBank2::AccelSmplrtDiv1 as u8), Some(0));
        assert_eq!(bus.written(2, RegAddrBank2::AccelSmplrtDiv2 as u8), Some(111));
        assert_eq!(bus.written(2, RegAddrBank2::AccelWomThr as u8), Some(20));
        assert_eq!(bus.written(2, RegAddrBank2::AccelIntelCtrl as u8), Some(0x03));
        assert_eq!(bus.regs[0][RegAddrBank0::IntEnable as usize], 0x08);
        assert_eq!(bus.regs[0][RegAddrBank0::IntEnable1 as usize], 0x01);
    }

    #[test]
    fn zero_threshold_disables_wake_on_motion() {
        let mut imu = ICM20948::new(FakeBus::new(), FakePin);
        imu.init(
            &mut NoDelay,
            AccelFullScaleSel::Gpm4,
            AccelDLPFSel::Disable,
            0,
            0,
        )
        .unwrap();
        let (bus, _) = imu.release();
        assert_eq!(bus.written(2, RegAddrBank2::AccelIntelCtrl as u8), Some(0));
        assert_eq!(bus.regs[0][RegAddrBank0::IntEnable as usize] & 0x08, 0);
        // FCHOICE clear, +-4g
        assert_eq!(bus.written(2, RegAddrBank2::AccelConfig as u8), Some(0x02));
    }

    #[test]
    fn reads_accel_in_milli_g() {
        let mut bus = FakeBus::new();
        let base = RegAddrBank0::AccelXoutH as usize;
        // x = +1g, y = -0.5g, z = 0 at +-2g
        bus.regs[0][base..base + 6].copy_from_slice(&[0x40, 0x00, 0xE0, 0x00, 0x00, 0x00]);
        let mut imu = init_default(bus).unwrap();

        imu.read_accel().unwrap();
        assert_eq!(imu.get_accel_mg(), (1000, -500, 0));
        assert!(!imu.motion_detected());
    }

    #[test]
    fn motion_flag_follows_status() {
        let mut bus = FakeBus::new();
        bus.regs[0][RegAddrBank0::IntStatus as usize] = 0x08;
        bus.regs[0][RegAddrBank0::IntStatus1 as usize] = 0x01;
        let mut imu = init_default(bus).unwrap();

        assert_eq!(imu.data_ready(), Ok(true));
        imu.read_accel().unwrap();
        assert!(imu.motion_detected());
    }

    #[test]
    fn no_data_ready_until_raw_data_interrupt() {
        let mut bus = FakeBus::new();
        bus.regs[0][RegAddrBank0::IntStatus1 as usize] = 0x00;
        let mut imu = init_default(bus).unwrap();
        assert_eq!(imu.data_ready(), Ok(false));

        let (mut bus, cs) = imu.release();
        bus.regs[0][RegAddrBank0::IntStatus1 as usize] = 0x01;
        let mut imu = ICM20948::new(bus, cs);
        assert_eq!(imu.data_ready(), Ok(true));
    }
}
