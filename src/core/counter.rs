use crate::core::Width;
use crate::st::backing_array::Element;

/// Operations the store performs on an integer cell, independent of its width.
pub trait Counter
    : Element + num::Unsigned + num::Bounded + num::NumAssignOps + PartialOrd<Self> + Copy
    {
    /// Counter as a f64.
    fn as_f64(&self) -> f64;
    /// Counter as a u64.
    fn as_u64(&self) -> u64;
    /// Keeps the low bits of `value`; callers check the ceiling first.
    fn truncate_from_u64(value: u64) -> Self;
    fn word_size() -> u8;
    fn width() -> Width;

    #[inline(always)]
    fn max_count() -> u64 {
        Self::max_value().as_u64()
    }
}

macro_rules! impl_counter {
    ($t:ty, $width:expr) => {
        impl Counter for $t {
            #[inline(always)]
            fn as_f64(&self) -> f64 {
                *self as f64
            }
            #[inline(always)]
            fn as_u64(&self) -> u64 {
                *self as u64
            }
            #[inline(always)]
            fn truncate_from_u64(value: u64) -> $t {
                value as $t
            }
            #[inline(always)]
            fn word_size() -> u8 {
                std::mem::size_of::<$t>() as u8
            }
            #[inline(always)]
            fn width() -> Width {
                $width
            }
        }
    };
}

impl_counter!(u8, Width::W1);
impl_counter!(u16, Width::W2);
impl_counter!(u32, Width::W4);
impl_counter!(u64, Width::W8);
