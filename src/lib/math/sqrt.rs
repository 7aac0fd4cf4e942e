use num_traits::{PrimInt, Unsigned};

/// Floor of the square root of `n`, bit by bit.
///
/// Uses only shifts, comparisons, additions and subtractions. The trial value
/// `root + bit` never exceeds `n`'s width, so every unsigned width works up to
/// its maximum. The loop runs at most `bits / 2` times.
pub fn integer_sqrt<T>(n: T) -> T
where
    T: PrimInt + Unsigned,
{
    if n.is_zero() {
        return n;
    }

    // highest power of four not above n
    let width = T::zero().count_zeros();
    let msb = width - 1 - n.leading_zeros();
    let mut bit = T::one() << (msb & !1) as usize;

    let mut rem = n;
    let mut root = T::zero();
    while !bit.is_zero() {
        let trial = root + bit;
        if rem >= trial {
            rem = rem - trial;
            root = (root >> 1) + bit;
        } else {
            root = root >> 1;
        }
        bit = bit >> 2;
    }
    root
}
