use super::sample::{RawSample, Rejection};
use crate::error::Error;

/// Smoothing strength, the shift `a` of the per-axis filters.
///
/// Five presets, 0 (no smoothing) to 4 (heaviest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterStrength(u8);

impl FilterStrength {
    pub const MAX: u8 = 4;
    pub const DEFAULT: FilterStrength = FilterStrength(3);

    pub fn new(shift: u8) -> Result<Self, Error> {
        if shift > Self::MAX {
            return Err(Error::FilterStrength(shift));
        }
        Ok(Self(shift))
    }

    pub fn shift(self) -> u8 {
        self.0
    }

    // next preset, wrapping back to none after the heaviest
    pub fn next(self) -> Self {
        if self.0 >= Self::MAX {
            Self(0)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl Default for FilterStrength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for FilterStrength {
    type Error = Error;
    fn try_from(shift: u8) -> Result<Self, Error> {
        Self::new(shift)
    }
}

/// Accepted range of a raw sample's magnitude squared, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagnitudeWindow {
    pub min_sq: u32,
    pub max_sq: u32,
}

impl MagnitudeWindow {
    pub fn contains(&self, magnitude_sq: u32) -> bool {
        magnitude_sq >= self.min_sq && magnitude_sq <= self.max_sq
    }
}

/// Sensor calibration for outlier rejection.
///
/// The defaults are tuned for a sensor reporting milli-g (1g ~ 1000): any
/// axis beyond 1.2g, or a total magnitude outside 0.8g..=1.2g, means the
/// device is moving. Other sensors need their own values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EstimatorConfig {
    axis_limit: u16,
    window: Option<MagnitudeWindow>,
}

impl EstimatorConfig {
    pub const DEFAULT_AXIS_LIMIT: u16 = 1200;
    pub const DEFAULT_WINDOW: MagnitudeWindow = MagnitudeWindow {
        min_sq: 640_000,
        max_sq: 1_440_000,
    };

    /// `axis_limit` also bounds the filter input, so it may not exceed
    /// `i16::MAX`.
    pub fn new(axis_limit: u16, window: Option<MagnitudeWindow>) -> Result<Self, Error> {
        if axis_limit == 0 || axis_limit > i16::MAX as u16 {
            return Err(Error::AxisLimit(axis_limit));
        }
        if let Some(w) = window {
            if w.min_sq > w.max_sq {
                return Err(Error::MagnitudeWindow {
                    min_sq: w.min_sq,
                    max_sq: w.max_sq,
                });
            }
        }
        Ok(Self { axis_limit, window })
    }

    pub fn axis_limit(&self) -> u16 {
        self.axis_limit
    }

    pub fn window(&self) -> Option<MagnitudeWindow> {
        self.window
    }

    /// Rejection reason for `sample`, if any. Does not look at filter state.
    pub fn check(&self, sample: &RawSample) -> Result<(), Rejection> {
        if sample.disturbed {
            return Err(Rejection::Disturbed);
        }
        let limit = self.axis_limit as i32;
        if sample.axes().iter().any(|&v| (v as i32).abs() > limit) {
            return Err(Rejection::AxisLimit);
        }
        match self.window {
            Some(w) if !w.contains(sample.magnitude_sq()) => Err(Rejection::MagnitudeWindow),
            _ => Ok(()),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            axis_limit: Self::DEFAULT_AXIS_LIMIT,
            window: Some(Self::DEFAULT_WINDOW),
        }
    }
}
