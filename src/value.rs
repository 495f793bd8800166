//! Bounded signed integers with hardware (two's complement, wraparound) arithmetic.

use std::fmt;
use std::ops::{Add, Mul};

use proptest::arbitrary::Arbitrary;
use proptest::strategy::{Map, Strategy};

/// A fixed-width signed integer as seen by a register: every operation wraps
/// modulo `2^BITS` instead of overflowing.
pub trait Numeric: Copy + Eq + fmt::Debug + fmt::Display + Default {
    const ZERO: Self;
    const MIN: Self;
    const MAX: Self;
    /// Width of the value on a signal wire.
    const BITS: u32;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn to_i64(self) -> i64;
    fn from_i64_wrapping(value: i64) -> Self;
}

macro_rules! impl_numeric {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const ZERO: Self = 0;
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const BITS: u32 = <$ty>::BITS;

                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$ty>::wrapping_mul(self, rhs)
                }

                fn to_i64(self) -> i64 {
                    self as i64
                }

                fn from_i64_wrapping(value: i64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_numeric!(i8, i16, i32, i64);

/// 9-bit signed value, range `-256..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct S9(i16);

impl S9 {
    const WIDTH: u32 = 9;
    const SHIFT: u32 = i16::BITS - Self::WIDTH;

    /// Truncates `value` to its low 9 bits and sign-extends.
    pub const fn new(value: i16) -> Self {
        Self((value << Self::SHIFT) >> Self::SHIFT)
    }

    pub const fn get(self) -> i16 {
        self.0
    }
}

impl Numeric for S9 {
    const ZERO: Self = S9(0);
    const MIN: Self = S9(-256);
    const MAX: Self = S9(255);
    const BITS: u32 = S9::WIDTH;

    fn wrapping_add(self, rhs: Self) -> Self {
        S9::new(self.0.wrapping_add(rhs.0))
    }

    fn wrapping_mul(self, rhs: Self) -> Self {
        // Low 9 bits of the product only depend on the low 9 bits of the operands.
        S9::new(self.0.wrapping_mul(rhs.0))
    }

    fn to_i64(self) -> i64 {
        self.0 as i64
    }

    fn from_i64_wrapping(value: i64) -> Self {
        S9::new(value as i16)
    }
}

impl Add for S9 {
    type Output = S9;

    fn add(self, rhs: S9) -> S9 {
        self.wrapping_add(rhs)
    }
}

impl Mul for S9 {
    type Output = S9;

    fn mul(self, rhs: S9) -> S9 {
        self.wrapping_mul(rhs)
    }
}

impl fmt::Display for S9 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<S9> for i16 {
    fn from(value: S9) -> i16 {
        value.0
    }
}

impl Arbitrary for S9 {
    type Parameters = ();
    type Strategy = Map<std::ops::RangeInclusive<i16>, fn(i16) -> S9>;

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (S9::MIN.0..=S9::MAX.0).prop_map(S9::new as fn(i16) -> S9)
    }
}
