// Integer-only numerics: no FPU on the target, and results must not depend on
// the float implementation.

mod acos;
mod acos_table;
mod fixed;
mod sqrt;

pub use acos::fixed_acos;
pub use fixed::{Q10, FRAC_BITS};
pub use sqrt::integer_sqrt;
