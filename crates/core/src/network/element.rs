//! Element trait for per-node accumulator values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign};

/// Trait for types that can be stored in a per-node accumulator array
/// (drainage area, discharge).
///
/// Implemented for `f32` and `f64`. Both accumulators of one pass share
/// the same element type.
pub trait FlowElement:
    Copy
    + Clone
    + Debug
    + PartialOrd
    + PartialEq
    + NumCast
    + Zero
    + Add<Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
{
    /// Whether the value is finite (not NaN or infinite)
    fn is_finite_value(self) -> bool;

    /// Clamp negative values to zero.
    ///
    /// NaN is passed through unchanged.
    #[inline]
    fn floor_at_zero(self) -> Self {
        if self < Self::zero() {
            Self::zero()
        } else {
            self
        }
    }

    /// Convert from f64, `None` if the value does not fit
    fn from_f64(value: f64) -> Option<Self> {
        NumCast::from(value)
    }
}

macro_rules! impl_flow_element_float {
    ($t:ty) => {
        impl FlowElement for $t {
            #[inline]
            fn is_finite_value(self) -> bool {
                self.is_finite()
            }
        }
    };
}

impl_flow_element_float!(f32);
impl_flow_element_float!(f64);
