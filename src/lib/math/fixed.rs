use core::ops::{Add, Mul, Neg, Sub};

/// Number of fractional bits in a [`Q10`].
pub const FRAC_BITS: u32 = 10;

/// Signed fixed-point value with 10 fractional bits (`1.0 == 1024`).
///
/// The scale lives in the type so that values in different scales cannot be
/// mixed by accident. Arithmetic wraps like the underlying `i32` in release
/// builds; callers keep operands within the documented ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Q10(i32);

impl Q10 {
    pub const SCALE: i32 = 1 << FRAC_BITS;
    pub const ZERO: Q10 = Q10(0);
    pub const ONE: Q10 = Q10(Self::SCALE);

    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> i32 {
        self.0
    }

    // value must fit in 21 integer bits
    pub const fn from_int(value: i32) -> Self {
        Self(value << FRAC_BITS)
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Fixed-point division `num / den`, both operands in the same scale.
    ///
    /// Returns `None` when `den` is zero or the quotient does not fit.
    pub fn ratio(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let q = (num << FRAC_BITS) / den;
        i32::try_from(q).ok().map(Self)
    }

    /// Multiplies by an integer extent and drops the fraction, truncating
    /// toward zero.
    pub fn scale(self, extent: i32) -> i32 {
        ((self.0 as i64 * extent as i64) / Self::SCALE as i64) as i32
    }
}

impl Add for Q10 {
    type Output = Q10;
    fn add(self, rhs: Q10) -> Q10 {
        Q10(self.0 + rhs.0)
    }
}

impl Sub for Q10 {
    type Output = Q10;
    fn sub(self, rhs: Q10) -> Q10 {
        Q10(self.0 - rhs.0)
    }
}

impl Neg for Q10 {
    type Output = Q10;
    fn neg(self) -> Q10 {
        Q10(-self.0)
    }
}

impl Mul for Q10 {
    type Output = Q10;
    fn mul(self, rhs: Q10) -> Q10 {
        Q10(((self.0 as i64 * rhs.0 as i64) >> FRAC_BITS) as i32)
    }
}
