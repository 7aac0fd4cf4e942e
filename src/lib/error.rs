use core::fmt;

/// Configuration errors. Sample rejection is not an error; see
/// [`crate::Rejection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // shift outside the supported presets
    FilterStrength(u8),
    // per-axis limit of zero, or wider than an i16 sample
    AxisLimit(u16),
    MagnitudeWindow { min_sq: u32, max_sq: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilterStrength(shift) => write!(f, "filter strength {} out of range", shift),
            Self::AxisLimit(limit) => write!(f, "axis limit {} out of range", limit),
            Self::MagnitudeWindow { min_sq, max_sq } => {
                write!(f, "magnitude window {}..={} is empty", min_sq, max_sq)
            }
        }
    }
}
