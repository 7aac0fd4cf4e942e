use super::acos_table::ACOS_TABLE;
use super::fixed::Q10;

/// Fixed-point inverse cosine in tenths of a degree, 0..=1800.
///
/// Inputs at or beyond +/-1.0 clamp to 0 and 1800. Negative inputs use
/// `acos(-x) = 180° - acos(x)`, so only [0, 1) is tabulated.
pub fn fixed_acos(x: Q10) -> i16 {
    let bits = x.to_bits();
    let last = ACOS_TABLE.len() as i32 - 1;
    if bits > last {
        0
    } else if bits < -last {
        1800
    } else if bits >= 0 {
        ACOS_TABLE[bits as usize]
    } else {
        1800 - ACOS_TABLE[(-bits) as usize]
    }
}
