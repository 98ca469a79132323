use std::ops::Shl;

use num_traits::{AsPrimitive, PrimInt};

/// Trait for types which can act as indices within an array (or an array-like structure).
///
/// Index buffers are generic over this so that meshes can be emitted with 16-bit or 32-bit
/// indices.
pub trait ArrayIndex:
    PrimInt
    + AsPrimitive<usize>
    + AsPrimitive<u32>
    + Shl<Self, Output = Self>
    + std::fmt::Debug
    + 'static
{
    /// Convert a `usize` into this index type, or `None` if it doesn't fit.
    #[inline]
    fn from_usize(value: usize) -> Option<Self> {
        <Self as num_traits::NumCast>::from(value)
    }

    /// Widen this index to a `usize`.
    #[inline]
    fn as_usize(self) -> usize {
        AsPrimitive::<usize>::as_(self)
    }

    /// Convert this index to a `u32`, as used by interchange formats.
    #[inline]
    fn as_u32(self) -> u32 {
        AsPrimitive::<u32>::as_(self)
    }

    /// The largest number of elements addressable by this index type.
    #[inline]
    fn max_len() -> usize {
        // `max_value() + 1` elements, saturated to what a usize can hold
        AsPrimitive::<usize>::as_(<Self as num_traits::Bounded>::max_value()).saturating_add(1)
    }
}
impl<P> ArrayIndex for P where
    P: PrimInt
        + AsPrimitive<usize>
        + AsPrimitive<u32>
        + Shl<Self, Output = Self>
        + std::fmt::Debug
        + 'static
{
}
