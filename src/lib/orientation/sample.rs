/// One accelerometer reading in sensor raw units.
///
/// `disturbed` is set when the sensor reported motion (tap, vibration,
/// wake-on-motion) while this sample was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub disturbed: bool,
}

impl RawSample {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self {
            x,
            y,
            z,
            disturbed: false,
        }
    }

    pub fn disturbed(x: i16, y: i16, z: i16) -> Self {
        Self {
            x,
            y,
            z,
            disturbed: true,
        }
    }

    pub fn axes(&self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }

    // at most 3 * 32768^2, which fits in u32
    pub fn magnitude_sq(&self) -> u32 {
        self.axes()
            .iter()
            .map(|&v| (v as i32 * v as i32) as u32)
            .sum()
    }
}

/// Why a sample did not update the estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejection {
    Disturbed,
    AxisLimit,
    MagnitudeWindow,
    // filtered vector too short to normalize
    Degenerate,
}
