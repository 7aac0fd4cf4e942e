use core::fmt;

use log::{debug, trace};

use super::config::{EstimatorConfig, FilterStrength};
use super::sample::{RawSample, Rejection};
use crate::error::Error;
use crate::filtering::shift::ShiftFilter;
use crate::math::{fixed_acos, integer_sqrt, Q10};

/// Unit gravity direction in the sensor frame.
///
/// Each component is in [-1.0, 1.0] and `x² + y² + z² ≈ 1` up to Q10
/// rounding. `z` is 1.0 when the device lies face up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NormalizedVector {
    pub x: Q10,
    pub y: Q10,
    pub z: Q10,
}

/// Angle from vertical in tenths of a degree, 0..=1800.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltAngle(u16);

impl TiltAngle {
    pub const MAX: u16 = 1800;

    pub fn from_tenths(tenths: u16) -> Self {
        Self(tenths.min(Self::MAX))
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    // whole degrees, truncated
    pub fn degrees(self) -> u16 {
        self.0 / 10
    }
}

impl fmt::Display for TiltAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}\u{00B0}", self.0 / 10, self.0 % 10)
    }
}

/// Gravity direction and tilt from a stream of accelerometer samples.
///
/// Samples pass outlier rejection, a shift filter per axis, normalization
/// and a table arccosine. Rejected samples leave every piece of state as it
/// was, so the published output freezes instead of jumping.
pub struct OrientationEstimator {
    axes: [ShiftFilter<i64>; 3],
    strength: FilterStrength,
    config: EstimatorConfig,
    last: Option<(NormalizedVector, TiltAngle)>,
}

impl OrientationEstimator {
    pub fn new(config: EstimatorConfig, strength: FilterStrength) -> Self {
        Self {
            axes: [ShiftFilter::new(), ShiftFilter::new(), ShiftFilter::new()],
            strength,
            config,
            last: None,
        }
    }

    /// Estimator with the default calibration and the given preset.
    pub fn with_strength(shift: u8) -> Result<Self, Error> {
        Ok(Self::new(
            EstimatorConfig::default(),
            FilterStrength::new(shift)?,
        ))
    }

    /// Feeds one sample. Returns the new estimate, or `None` when the sample
    /// was rejected and the previous estimate still stands.
    pub fn ingest(&mut self, sample: RawSample) -> Option<(NormalizedVector, TiltAngle)> {
        if let Err(reason) = self.config.check(&sample) {
            trace!("sample {:?} rejected: {:?}", sample.axes(), reason);
            return None;
        }

        // The axis limit keeps |input| <= 2^15 << 10, so the accumulators
        // stay below 2^(25 + shift) and the squares below 2^53.
        let shift = self.strength.shift();
        // committed only once the magnitude is usable
        let mut axes = self.axes;
        let mut filtered = [0i64; 3];
        for ((out, filter), raw) in filtered.iter_mut().zip(&mut axes).zip(sample.axes()) {
            let input = Q10::from_int(raw as i32).to_bits() as i64;
            *out = filter.apply(input, shift);
        }

        // sqrt of a sum of Q10 squares is already Q10
        let magnitude_sq: u64 = filtered.iter().map(|&v| v.unsigned_abs().pow(2)).sum();
        let magnitude = integer_sqrt(magnitude_sq) as i64;
        if magnitude < Q10::ONE.to_bits() as i64 {
            trace!("sample {:?} rejected: {:?}", sample.axes(), Rejection::Degenerate);
            return None;
        }

        let vector = NormalizedVector {
            x: Q10::ratio(filtered[0], magnitude)?,
            y: Q10::ratio(filtered[1], magnitude)?,
            z: Q10::ratio(filtered[2], magnitude)?,
        };
        let tilt = TiltAngle::from_tenths(fixed_acos(vector.z.abs()) as u16);

        self.axes = axes;
        self.last = Some((vector, tilt));
        self.last
    }

    /// Changes smoothing without clearing filter history. The output
    /// settles to the new response within a few samples.
    pub fn set_filter_strength(&mut self, strength: FilterStrength) {
        debug!("filter strength {} -> {}", self.strength.shift(), strength.shift());
        self.strength = strength;
    }

    pub fn filter_strength(&self) -> FilterStrength {
        self.strength
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Rejection reason `sample` would get from [`Self::ingest`], short of
    /// the degenerate-magnitude check that needs the filter output.
    pub fn check(&self, sample: &RawSample) -> Result<(), Rejection> {
        self.config.check(sample)
    }

    /// Last published estimate, `None` before the first accepted sample.
    pub fn last(&self) -> Option<(NormalizedVector, TiltAngle)> {
        self.last
    }

    pub fn vector(&self) -> Option<NormalizedVector> {
        self.last.map(|(vector, _)| vector)
    }

    pub fn tilt(&self) -> Option<TiltAngle> {
        self.last.map(|(_, tilt)| tilt)
    }

    pub fn reset(&mut self) {
        for filter in self.axes.iter_mut() {
            filter.reset();
        }
        self.last = None;
    }

    #[cfg(test)]
    fn filter_states(&self) -> [i64; 3] {
        [
            self.axes[0].state(),
            self.axes[1].state(),
            self.axes[2].state(),
        ]
    }
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default(), FilterStrength::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::MagnitudeWindow;

    fn unwindowed(shift: u8) -> OrientationEstimator {
        OrientationEstimator::new(
            EstimatorConfig::new(1200, None).unwrap(),
            FilterStrength::new(shift).unwrap(),
        )
    }

    #[test]
    fn nothing_published_before_first_sample() {
        let est = OrientationEstimator::default();
        assert_eq!(est.last(), None);
        assert_eq!(est.vector(), None);
        assert_eq!(est.tilt(), None);
    }

    #[test]
    fn flat_device_is_level() {
        let mut est = OrientationEstimator::with_strength(3).unwrap();
        let (vector, tilt) = est.ingest(RawSample::new(0, 0, 1000)).unwrap();
        assert_eq!(vector.x, Q10::ZERO);
        assert_eq!(vector.y, Q10::ZERO);
        assert_eq!(vector.z, Q10::ONE);
        assert_eq!(tilt.tenths(), 0);
    }

    #[test]
    fn face_down_measures_from_the_other_pole() {
        let mut est = OrientationEstimator::with_strength(0).unwrap();
        let (vector, tilt) = est.ingest(RawSample::new(0, 0, -1000)).unwrap();
        assert_eq!(vector.z, -Q10::ONE);
        assert_eq!(tilt.tenths(), 0);
    }

    #[test]
    fn forty_five_degrees() {
        let mut est = OrientationEstimator::with_strength(0).unwrap();
        let (vector, tilt) = est.ingest(RawSample::new(707, 0, 707)).unwrap();
        assert!((vector.x.to_bits() - 724).abs() <= 1);
        assert!((vector.z.to_bits() - 724).abs() <= 1);
        assert!((tilt.tenths() as i32 - 450).abs() <= 2, "{}", tilt.tenths());
    }

    #[test]
    fn disturbed_sample_changes_nothing() {
        let mut est = OrientationEstimator::with_strength(2).unwrap();
        est.ingest(RawSample::new(300, 0, 950));
        let states = est.filter_states();
        let last = est.last();

        assert_eq!(est.ingest(RawSample::disturbed(0, 1000, 0)), None);
        assert_eq!(est.filter_states(), states);
        assert_eq!(est.last(), last);
    }

    #[test]
    fn over_limit_sample_changes_nothing() {
        let mut est = OrientationEstimator::with_strength(2).unwrap();
        est.ingest(RawSample::new(0, 0, 1000));
        let states = est.filter_states();

        assert_eq!(est.ingest(RawSample::new(0, 0, 1300)), None);
        assert_eq!(est.ingest(RawSample::new(1500, 0, 0)), None);
        assert_eq!(est.filter_states(), states);
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let mut est = unwindowed(0);
        assert_eq!(est.ingest(RawSample::new(0, 0, 0)), None);
        assert_eq!(est.last(), None);
    }

    #[test]
    fn sub_unit_magnitude_is_degenerate() {
        // one raw count filtered by 2^4 is below one raw unit
        let mut est = unwindowed(4);
        assert_eq!(est.ingest(RawSample::new(0, 0, 1)), None);
        assert_eq!(est.last(), None);
    }

    #[test]
    fn degenerate_keeps_previous_estimate() {
        let mut est = unwindowed(0);
        let first = est.ingest(RawSample::new(0, 0, 1000));
        assert!(first.is_some());
        let states = est.filter_states();
        assert_eq!(est.ingest(RawSample::new(0, 0, 0)), None);
        assert_eq!(est.last(), first);
        assert_eq!(est.filter_states(), states);
    }

    #[test]
    fn degenerate_sample_leaves_filters_untouched() {
        // settle heavily smoothed, then drop to pass-through so a zero
        // sample alone makes the filtered magnitude vanish
        let mut est = unwindowed(2);
        for _ in 0..50 {
            est.ingest(RawSample::new(0, 0, 1000));
        }
        est.set_filter_strength(FilterStrength::new(0).unwrap());
        let states = est.filter_states();
        let settled = est.last();

        assert_eq!(est.ingest(RawSample::new(0, 0, 0)), None);
        assert_eq!(est.filter_states(), states);
        assert_eq!(est.last(), settled);

        // the next good sample continues from the settled history
        let (vector, _) = est.ingest(RawSample::new(0, 0, 1000)).unwrap();
        assert_eq!(vector.z, Q10::ONE);
    }

    #[test]
    fn strength_change_keeps_history() {
        let mut est = OrientationEstimator::with_strength(1).unwrap();
        est.ingest(RawSample::new(0, 0, 1000));
        let states = est.filter_states();
        est.set_filter_strength(FilterStrength::new(4).unwrap());
        assert_eq!(est.filter_states(), states);
        assert_eq!(est.filter_strength().shift(), 4);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut est = OrientationEstimator::default();
        est.ingest(RawSample::new(0, 0, 1000));
        est.reset();
        assert_eq!(est.last(), None);
        assert_eq!(est.filter_states(), [0, 0, 0]);
    }

    #[test]
    fn check_reports_reason_without_mutating() {
        let window = MagnitudeWindow {
            min_sq: 640_000,
            max_sq: 1_440_000,
        };
        let est = OrientationEstimator::new(
            EstimatorConfig::new(1200, Some(window)).unwrap(),
            FilterStrength::DEFAULT,
        );
        assert_eq!(est.check(&RawSample::new(0, 0, 100)), Err(Rejection::MagnitudeWindow));
        assert_eq!(est.check(&RawSample::new(0, 0, 1000)), Ok(()));
        assert_eq!(est.filter_states(), [0, 0, 0]);
    }

    #[test]
    fn tilt_formats_with_one_decimal() {
        assert_eq!(TiltAngle::from_tenths(123).to_string(), "12.3\u{00B0}");
        assert_eq!(TiltAngle::from_tenths(0).to_string(), "0.0\u{00B0}");
        assert_eq!(TiltAngle::from_tenths(5000).to_string(), "180.0\u{00B0}");
        assert_eq!(TiltAngle::from_tenths(905).degrees(), 90);
    }
}
