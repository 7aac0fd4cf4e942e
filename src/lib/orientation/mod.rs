mod config;
mod estimator;
mod sample;

pub use config::{EstimatorConfig, FilterStrength, MagnitudeWindow};
pub use estimator::{NormalizedVector, OrientationEstimator, TiltAngle};
pub use sample::{RawSample, Rejection};
