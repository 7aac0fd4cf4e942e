// ICM-20948 accelerometer registers and configs

#[repr(u8)]
pub enum RegAddrGeneral {
    BankSel = 0x7F,
}

#[repr(u8)]
pub enum RegAddrBank0 {
    WhoAmI = 0x00,
    PwrMgmt1 = 0x06,
    PwrMgmt2 = 0x07,
    IntPinConfig = 0x0F,
    IntEnable = 0x10,
    IntEnable1 = 0x11,
    IntStatus = 0x19,
    IntStatus1 = 0x1A,
    AccelXoutH = 0x2D,
}

#[repr(u8)]
pub enum RegAddrBank2 {
    AccelSmplrtDiv1 = 0x10,
    AccelSmplrtDiv2 = 0x11,
    AccelIntelCtrl = 0x12,
    AccelWomThr = 0x13,
    AccelConfig = 0x14,
}

// PwrMgmt1 register:
// Bits:     |       7      |   6   |   5   |     4    |     3    |   2:0  |
// Function: | DEVICE_RESET | SLEEP | LP_EN | reserved | TEMP_DIS | CLKSEL |
#[repr(u8)]
#[allow(dead_code)]
pub enum PwrMgmt1Bits {
    ClkSel = 0x07 << 0,
    TempDis = 0x01 << 3,
    LPEnable = 0x01 << 5,
    Sleep = 0x01 << 6,
    DeviceReset = 0x01 << 7,
}

// PwrMgmt2 register:
// Bits:     |    7:6   |      5:3      |     2:0      |
// Function: | reserved | DISABLE_ACCEL | DISABLE_GYRO |
#[repr(u8)]
#[allow(dead_code)]
pub enum PwrMgmt2Bits {
    DisableGyro = 0x07 << 0,
    DisableAccel = 0x07 << 3,
}

// AccelConfig register:
// Bits:     |    7:6   |       5:3     |      2:1     |       0       |
// Function: | reserved | ACCEL_DLPFCFG | ACCEL_FS_SEL | ACCEL_FCHOICE |
#[repr(u8)]
#[allow(dead_code)]
pub enum AccelConfigBits {
    AccelFChoice = 0x01 << 0,
    AccelFSSel = 0x03 << 1,
    AccelDLPFCFG = 0x07 << 3,
}

// AccelIntelCtrl register:
// Bits:     |    7:2   |       1        |           0          |
// Function: | reserved | ACCEL_INTEL_EN | ACCEL_INTEL_MODE_INT |
#[repr(u8)]
#[allow(dead_code)]
pub enum AccelIntelCtrlBits {
    CompareToPrevious = 0x01 << 0,
    Enable = 0x01 << 1,
}

// IntPinConfig register:
// Bits:     |     7     |     6     |        5      |         4        |      3     |          2        |     1     |     0    |
// Function: | INT1_ACTL | INT1_OPEN | INT1_LATCH_EN | INT_ANYRD_2CLEAR | ACTL_FSYNC | FSYNC_INT_MODE_EN | BYPASS_EN | reserved |
#[repr(u8)]
#[allow(dead_code)]
pub enum IntPinConfigBits {
    ByPassEnable = 0x01 << 1,
    FsyncIntModeEnable = 0x01 << 2,
    ActiveLowFsync = 0x01 << 3,
    IntAnyReadToClear = 0x01 << 4,
    Int1LatchEnable = 0x01 << 5,
    Int1Open = 0x01 << 6,
    Int1ActiveLow = 0x01 << 7,
}

// IntEnable and IntStatus registers share the layout of the motion bits:
// Bits:     |      7     |    6:4   |      3     |       2      |       1      |      0     |
// Function: | REG_WOF_EN | reserved | WOM_INT_EN | PLL_RDY_EN   | DMP_INT1_EN  | I2C_MST_EN |
#[repr(u8)]
#[allow(dead_code)]
pub enum IntEnableBits {
    WakeOnMotion = 0x01 << 3,
}

// IntEnable1 / IntStatus1 registers:
// Bits:      |    7:1   |         0         |
// Function:  | reserved | RAW_DATA_0_RDY_EN |
#[repr(u8)]
#[allow(dead_code)]
pub enum IntEnable1Bits {
    RawData0Ready = 0x01 << 0,
}

// Accel full scale range in G's (plus or minus)
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelFullScaleSel {
    Gpm2 = 0x00,
    Gpm4 = 0x01,
    Gpm8 = 0x02,
    Gpm16 = 0x03,
}

impl AccelFullScaleSel {
    pub const fn lsb_per_g(self) -> i32 {
        match self {
            Self::Gpm2 => 16384,
            Self::Gpm4 => 8192,
            Self::Gpm8 => 4096,
            Self::Gpm16 => 2048,
        }
    }
}

// Accel digital low pass filter config
// Format is dAbwB_nXbwY - A is integer part of 3db BW, B is fraction. X is integer part of nyquist bandwidth, Y is fraction
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelDLPFSel {
    D246bwN265bw = 0x00,
    D246bwN265bw1 = 0x01,
    D111bw4N136bw = 0x02,
    D50bw4N68bw8 = 0x03,
    D23bw9N34bw4 = 0x04,
    D11bw5N17bw = 0x05,
    D5bw7N8bw3 = 0x06,
    D473bwN499bw = 0x07,
    Disable = 0xFF,
}

// Constants
pub const ICM_20948_WHO_AM_I: u8 = 0xEA;
pub const ACCEL_DATA_NUM_BYTES: usize = 6;
// output data rate is 1125 Hz / (1 + div), 12 bit divider
pub const MAX_ACCEL_SAMPLE_RATE_DIV: u16 = 0x0FFF;
pub const WOM_THRESHOLD_MG_PER_LSB: u16 = 4;
pub const MAX_WOM_THRESHOLD_MG: u16 = 255 * WOM_THRESHOLD_MG_PER_LSB;
pub const RESET_DELAY_MS: u32 = 10;
