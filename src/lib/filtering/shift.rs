use num_traits::{PrimInt, Signed};

/// One-pole IIR low-pass filter using shifts only.
///
/// Computes `y[n] = (1 - 2^-a) * y[n-1] + 2^-a * x[n]` by keeping the output
/// scaled up by `2^a` in the accumulator:
///
/// ```text
/// state = state - (state >> a) + input
/// output = state >> a
/// ```
///
/// A larger shift `a` lowers the cutoff. `a == 0` passes input straight
/// through. The steady-state gain is exactly 1.
///
/// There is no overflow check. The accumulator reaches about
/// `|input| * 2^a`, so callers must bound the input for the chosen
/// `ItemT` and shift.
#[derive(Clone, Copy)]
pub struct ShiftFilter<ItemT> {
    state: ItemT,
}
impl<ItemT> ShiftFilter<ItemT>
where
    ItemT: PrimInt + Signed,
{
    pub fn new() -> ShiftFilter<ItemT> {
        ShiftFilter::default()
    }

    pub fn reset(&mut self) {
        self.state = ItemT::zero();
    }

    pub fn apply(&mut self, input: ItemT, shift: u8) -> ItemT {
        let shift = shift as usize;
        self.state = self.state - (self.state >> shift) + input;
        self.state >> shift
    }

    // raw accumulator, scaled by 2^shift relative to the output
    pub fn state(&self) -> ItemT {
        self.state
    }
}

impl<ItemT> Default for ShiftFilter<ItemT>
where
    ItemT: PrimInt + Signed,
{
    fn default() -> ShiftFilter<ItemT> {
        ShiftFilter {
            state: ItemT::zero(),
        }
    }
}
