#![cfg_attr(not(test), no_std)]

pub mod display;
pub mod drivers;
pub mod error;
pub mod filtering;
pub mod math;
pub mod orientation;

pub use error::Error;
pub use math::{fixed_acos, integer_sqrt, Q10};
pub use orientation::{
    EstimatorConfig, FilterStrength, MagnitudeWindow, NormalizedVector, OrientationEstimator,
    RawSample, Rejection, TiltAngle,
};
