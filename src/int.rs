//! Conversions between `BFloat16` and the primitive integer types.

use crate::bf16::BFloat16;
use crate::convert::round_to_nearest_even;
use log::trace;

mod private {
    pub trait Sealed {}
}

/// A primitive integer type that `BFloat16` converts to and from.
///
/// Implemented for every built-in signed and unsigned integer; it cannot be
/// implemented outside this crate.
pub trait Integer: private::Sealed + Copy {
    /// Width of the type in bits.
    const BITS: u32;
    /// Whether the type is signed.
    const SIGNED: bool;

    /// Sign and magnitude of the value.
    #[doc(hidden)]
    fn to_sign_magnitude(self) -> (bool, u128);

    /// Saturating conversion from f64, truncating toward zero. NaN gives 0.
    #[doc(hidden)]
    fn saturating_from_f64(value: f64) -> Self;
}

macro_rules! impl_integer {
    (signed: $($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Integer for $t {
                const BITS: u32 = <$t>::BITS;
                const SIGNED: bool = true;

                #[inline]
                fn to_sign_magnitude(self) -> (bool, u128) {
                    (self < 0, self.unsigned_abs() as u128)
                }

                #[inline]
                fn saturating_from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
    (unsigned: $($t:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Integer for $t {
                const BITS: u32 = <$t>::BITS;
                const SIGNED: bool = false;

                #[inline]
                fn to_sign_magnitude(self) -> (bool, u128) {
                    (false, self as u128)
                }

                #[inline]
                fn saturating_from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer!(signed: i8, i16, i32, i64, i128, isize);
impl_integer!(unsigned: u8, u16, u32, u64, u128, usize);

impl BFloat16 {
    /// Round an integer to the nearest bf16, ties to even.
    ///
    /// Magnitudes at or above `MAX + ulp/2` (only reachable from `i128` and
    /// `u128`) become infinity.
    pub fn from_int<T: Integer>(value: T) -> BFloat16 {
        let (negative, magnitude) = value.to_sign_magnitude();
        if magnitude == 0 {
            return BFloat16::ZERO;
        }
        let top = u128::BITS - 1 - magnitude.leading_zeros();
        let (result, status) = round_to_nearest_even(negative, top as i32, magnitude, top);
        if result.is_infinite() {
            trace!("integer magnitude {magnitude} rounded to infinity ({status:?})");
        }
        result
    }

    /// Convert an integer only if it is representable without rounding.
    pub fn from_int_exact<T: Integer>(value: T) -> Option<BFloat16> {
        let (negative, magnitude) = value.to_sign_magnitude();
        if magnitude == 0 {
            return Some(BFloat16::ZERO);
        }
        let top = u128::BITS - 1 - magnitude.leading_zeros();
        let (result, status) = round_to_nearest_even(negative, top as i32, magnitude, top);
        status.is_exact().then_some(result)
    }

    /// Convert to an integer, truncating toward zero and saturating at the
    /// integer type's bounds. NaN converts to 0.
    #[inline]
    pub fn to_int<T: Integer>(self) -> T {
        T::saturating_from_f64(self.to_f64())
    }

    /// Convert to an integer only if `self` is a whole number within the
    /// integer type's range.
    pub fn to_int_exact<T: Integer>(self) -> Option<T> {
        let value = self.to_f64();
        if !value.is_finite() || value.trunc() != value {
            return None;
        }
        // Range bounds are powers of two and exact in f64.
        let (low, high) = if T::SIGNED {
            let half = 2f64.powi(T::BITS as i32 - 1);
            (-half, half)
        } else {
            (0.0, 2f64.powi(T::BITS as i32))
        };
        if value < low || value >= high {
            return None;
        }
        Some(T::saturating_from_f64(value))
    }
}

macro_rules! impl_from_small_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BFloat16 {
                /// Every value of this type is exactly representable.
                #[inline]
                fn from(value: $t) -> BFloat16 {
                    BFloat16::from_int(value)
                }
            }
        )*
    };
}

impl_from_small_int!(u8, i8);
