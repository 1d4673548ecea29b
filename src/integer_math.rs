//! Integer bit-math used to size kernel launches and device allocations.

use std::ops::{Add, BitAnd, Div, Mul, Sub};

/// Primitive integers the helpers below accept.
pub trait Integer:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + BitAnd<Output = Self>
{
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    fn leading_zeros(self) -> u32;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn from_u32(v: u32) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl Integer for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn leading_zeros(self) -> u32 {
                <$t>::leading_zeros(self)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn from_u32(v: u32) -> Self {
                v as $t
            }
        }
    )*};
}

impl_integer!(u8, u16, u32, u64, usize, i32, i64);

/// Count of leading zero bits; `BITS` for zero.
#[inline]
pub fn clz<I: Integer>(x: I) -> I {
    I::from_u32(x.leading_zeros())
}

/// True for zero and for exact powers of two.
#[inline]
pub fn is_power_of_2<I: Integer>(x: I) -> bool {
    x & x.wrapping_sub(I::ONE) == I::ZERO
}

#[inline]
pub fn is_odd<I: Integer>(x: I) -> bool {
    x & I::ONE == I::ONE
}

/// Floor of log2. Zero is outside the domain.
#[inline]
pub fn log2<I: Integer>(x: I) -> I {
    I::from_u32(I::BITS - 1) - clz(x)
}

/// Log2 rounded up to the nearest integer.
#[inline]
pub fn log2_ri<I: Integer>(x: I) -> I {
    let result = log2(x);
    if is_power_of_2(x) {
        result
    } else {
        result + I::ONE
    }
}

/// `x / y` rounded towards +infinity, e.g. the number of tiles covering `x` items.
#[inline]
pub fn divide_ri<I: Integer>(x: I, y: I) -> I {
    (x + (y - I::ONE)) / y
}

/// `x / y` rounded towards zero.
#[inline]
pub fn divide_rz<I: Integer>(x: I, y: I) -> I {
    x / y
}

/// Round `x` up to the next multiple of `y`.
#[inline]
pub fn round_i<I: Integer>(x: I, y: I) -> I {
    y * divide_ri(x, y)
}

/// Round `x` down to a multiple of `y`.
#[inline]
pub fn round_z<I: Integer>(x: I, y: I) -> I {
    y * divide_rz(x, y)
}
