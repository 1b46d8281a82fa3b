//! Arithmetic on `BFloat16`.
//!
//! Every operation widens its operands to f32, computes there, and rounds the
//! result back once:
//!
//! ```text
//! a ⊕ b == BFloat16::from_f32(a.to_f32() ⊕ b.to_f32())
//! ```
//!
//! f32 carries more than twice bf16's precision plus two bits, so for `+`,
//! `-`, `*`, `/` and `sqrt` the double rounding is innocuous and the result is
//! the correctly rounded bf16 value.
//!
//! Fused multiply-add is the exception: it is computed in f64, where the
//! product of two bf16 values is exact, and the sum is rounded to odd before
//! the final rounding so the whole operation rounds exactly once.

use crate::bf16::{BFloat16, Sign};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

/// Rules for rounding to an integral value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoundingRule {
    /// Nearest integer; halfway cases away from zero (`f32::round`).
    ToNearestOrAwayFromZero,
    /// Nearest integer; halfway cases to the even neighbour.
    ToNearestOrEven,
    /// Toward positive infinity (`ceil`).
    Up,
    /// Toward negative infinity (`floor`).
    Down,
    /// Toward zero (`trunc`).
    TowardZero,
    /// Away from zero.
    AwayFromZero,
}

// ============================================================================
// Operator traits
// ============================================================================

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for BFloat16 {
            type Output = BFloat16;

            #[inline]
            fn $method(self, rhs: BFloat16) -> BFloat16 {
                BFloat16::from_f32(self.to_f32() $op rhs.to_f32())
            }
        }

        impl $trait<&BFloat16> for BFloat16 {
            type Output = BFloat16;

            #[inline]
            fn $method(self, rhs: &BFloat16) -> BFloat16 {
                self $op *rhs
            }
        }

        impl $trait<BFloat16> for &BFloat16 {
            type Output = BFloat16;

            #[inline]
            fn $method(self, rhs: BFloat16) -> BFloat16 {
                *self $op rhs
            }
        }

        impl $trait<&BFloat16> for &BFloat16 {
            type Output = BFloat16;

            #[inline]
            fn $method(self, rhs: &BFloat16) -> BFloat16 {
                *self $op *rhs
            }
        }

        impl $assign_trait for BFloat16 {
            #[inline]
            fn $assign_method(&mut self, rhs: BFloat16) {
                *self = *self $op rhs;
            }
        }

        impl $assign_trait<&BFloat16> for BFloat16 {
            #[inline]
            fn $assign_method(&mut self, rhs: &BFloat16) {
                *self = *self $op *rhs;
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, +);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, -);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, *);
impl_binary_op!(Div, div, DivAssign, div_assign, /);
// Truncating remainder, like `f32 % f32`. See `BFloat16::remainder` for the
// IEEE 754 remainder.
impl_binary_op!(Rem, rem, RemAssign, rem_assign, %);

impl Neg for BFloat16 {
    type Output = BFloat16;

    #[inline(always)]
    fn neg(self) -> BFloat16 {
        // Toggle the sign bit; no upcast needed.
        BFloat16::from_bits(self.to_bits() ^ BFloat16::SIGN_MASK)
    }
}

impl Neg for &BFloat16 {
    type Output = BFloat16;

    #[inline(always)]
    fn neg(self) -> BFloat16 {
        -*self
    }
}

impl Sum for BFloat16 {
    fn sum<I: Iterator<Item = BFloat16>>(iter: I) -> BFloat16 {
        iter.fold(BFloat16::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a BFloat16> for BFloat16 {
    fn sum<I: Iterator<Item = &'a BFloat16>>(iter: I) -> BFloat16 {
        iter.copied().sum()
    }
}

impl Product for BFloat16 {
    fn product<I: Iterator<Item = BFloat16>>(iter: I) -> BFloat16 {
        iter.fold(BFloat16::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a BFloat16> for BFloat16 {
    fn product<I: Iterator<Item = &'a BFloat16>>(iter: I) -> BFloat16 {
        iter.copied().product()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 2^n as an f64, for `n` inside the normal f64 exponent range.
#[inline]
fn exp2i(n: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&n));
    f64::from_bits(((n + 1023) as u64) << 52)
}

/// Error-free transformation of `a + b` (Knuth's TwoSum).
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let sum = a + b;
    let b_virtual = sum - a;
    let a_virtual = sum - b_virtual;
    let err = (a - a_virtual) + (b - b_virtual);
    (sum, err)
}

/// Round `a + b` to odd: if the sum is inexact, pick the neighbour with an
/// odd last bit. Rounding that to a format at least two bits narrower gives
/// the same answer as rounding the exact sum directly.
fn add_round_to_odd(a: f64, b: f64) -> f64 {
    let (sum, err) = two_sum(a, b);
    if err == 0.0 || !sum.is_finite() || sum.to_bits() & 1 == 1 {
        return sum;
    }
    let bits = sum.to_bits();
    let toward_larger_magnitude = (err > 0.0) == (sum > 0.0);
    f64::from_bits(if toward_larger_magnitude { bits + 1 } else { bits - 1 })
}

macro_rules! impl_unary_f32 {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        impl BFloat16 {
            $(
                $(#[$meta])*
                #[inline]
                pub fn $name(self) -> BFloat16 {
                    BFloat16::from_f32(self.to_f32().$name())
                }
            )*
        }
    };
}

impl_unary_f32! {
    /// Square root. Negative inputs other than `-0` give NaN.
    sqrt,
    /// `1 / self`.
    recip,
    /// `e^self`.
    exp,
    /// `2^self`.
    exp2,
    /// Natural logarithm.
    ln,
    /// Base-2 logarithm.
    log2,
    /// Base-10 logarithm.
    log10,
    sin,
    cos,
    tan,
    tanh,
}

// ============================================================================
// Arithmetic methods
// ============================================================================

impl BFloat16 {
    /// Absolute value: clears the sign bit, NaN included.
    #[inline(always)]
    pub const fn abs(self) -> BFloat16 {
        BFloat16::from_bits(self.to_bits() & !BFloat16::SIGN_MASK)
    }

    /// Same as [`BFloat16::abs`].
    #[inline(always)]
    pub const fn magnitude(self) -> BFloat16 {
        self.abs()
    }

    /// `self` with the sign of `sign`.
    #[inline(always)]
    pub const fn copysign(self, sign: BFloat16) -> BFloat16 {
        BFloat16::from_bits(
            (self.to_bits() & !BFloat16::SIGN_MASK) | (sign.to_bits() & BFloat16::SIGN_MASK),
        )
    }

    /// `1.0` for positive values (`+0` included), `-1.0` for negative, NaN for NaN.
    pub fn signum(self) -> BFloat16 {
        if self.is_nan() {
            self
        } else {
            BFloat16::ONE.copysign(self)
        }
    }

    /// Raise to a floating point power.
    #[inline]
    pub fn powf(self, n: BFloat16) -> BFloat16 {
        BFloat16::from_f32(self.to_f32().powf(n.to_f32()))
    }

    /// Raise to an integer power.
    #[inline]
    pub fn powi(self, n: i32) -> BFloat16 {
        BFloat16::from_f32(self.to_f32().powi(n))
    }

    /// Signed step from `self` to `other`, `other - self`.
    #[inline]
    pub fn distance_to(self, other: BFloat16) -> BFloat16 {
        other - self
    }

    /// `self` moved by `n`, `self + n`.
    #[inline]
    pub fn advanced_by(self, n: BFloat16) -> BFloat16 {
        self + n
    }

    /// Fused multiply-add: `(self * a) + b` with a single rounding.
    pub fn mul_add(self, a: BFloat16, b: BFloat16) -> BFloat16 {
        let product = self.to_f64() * a.to_f64();
        let addend = b.to_f64();
        if !product.is_finite() || !addend.is_finite() {
            // Specials (inf - inf, NaN) follow plain IEEE semantics.
            return BFloat16::from_f64(product + addend);
        }
        BFloat16::from_f64(add_round_to_odd(product, addend))
    }

    /// Fused multiply-add: `a * b + c` with a single rounding.
    #[inline]
    pub fn fma(a: BFloat16, b: BFloat16, c: BFloat16) -> BFloat16 {
        a.mul_add(b, c)
    }

    /// Replace `self` with `self + lhs * rhs`, rounded once.
    #[inline]
    pub fn add_product(&mut self, lhs: BFloat16, rhs: BFloat16) {
        *self = lhs.mul_add(rhs, *self);
    }

    /// IEEE 754 remainder: `self - n * other` where `n` is `self / other`
    /// rounded to the nearest integer, ties to even.
    ///
    /// The result is always exact. `x.remainder(0)` and `inf.remainder(y)` are NaN.
    pub fn remainder(self, other: BFloat16) -> BFloat16 {
        let (x, y) = (self.to_f64(), other.to_f64());
        if x.is_nan() || y.is_nan() || x.is_infinite() || y == 0.0 {
            return BFloat16::from_f64(f64::NAN);
        }
        if y.is_infinite() {
            return self;
        }

        let divisor = y.abs();
        // Reducing modulo 2|y| keeps the parity of the quotient visible.
        let mut r = x.abs() % (2.0 * divisor);
        let mut odd = false;
        if r >= divisor {
            r -= divisor;
            odd = true;
        }
        let half = 0.5 * divisor;
        if r > half || (r == half && odd) {
            r -= divisor;
        }
        BFloat16::from_f64(if x.is_sign_negative() { -r } else { r })
    }

    /// Replace `self` with `self.remainder(other)`.
    #[inline]
    pub fn form_remainder(&mut self, other: BFloat16) {
        *self = self.remainder(other);
    }

    /// Round to an integral value using `rule`.
    pub fn round(self, rule: RoundingRule) -> BFloat16 {
        let x = self.to_f32();
        let rounded = match rule {
            RoundingRule::ToNearestOrAwayFromZero => x.round(),
            RoundingRule::ToNearestOrEven => x.round_ties_even(),
            RoundingRule::Up => x.ceil(),
            RoundingRule::Down => x.floor(),
            RoundingRule::TowardZero => x.trunc(),
            RoundingRule::AwayFromZero => {
                if x.is_sign_negative() {
                    x.floor()
                } else {
                    x.ceil()
                }
            }
        };
        BFloat16::from_f32(rounded)
    }

    /// Nearest integer, halfway cases away from zero (`f32::round`).
    #[inline]
    pub fn round_half_away(self) -> BFloat16 {
        self.round(RoundingRule::ToNearestOrAwayFromZero)
    }

    /// Nearest integer, halfway cases to even.
    #[inline]
    pub fn round_ties_even(self) -> BFloat16 {
        self.round(RoundingRule::ToNearestOrEven)
    }

    #[inline]
    pub fn floor(self) -> BFloat16 {
        self.round(RoundingRule::Down)
    }

    #[inline]
    pub fn ceil(self) -> BFloat16 {
        self.round(RoundingRule::Up)
    }

    #[inline]
    pub fn trunc(self) -> BFloat16 {
        self.round(RoundingRule::TowardZero)
    }

    /// Fractional part, `self - self.trunc()`.
    #[inline]
    pub fn fract(self) -> BFloat16 {
        BFloat16::from_f32(self.to_f32().fract())
    }

    /// Split into integral and fractional parts, both carrying `self`'s sign
    /// for finite inputs.
    pub fn modf(self) -> (BFloat16, BFloat16) {
        let integral = self.trunc();
        if self.is_infinite() {
            return (integral, BFloat16::ZERO.copysign(self));
        }
        (integral, (self - integral).copysign(self))
    }

    /// NaN-ignoring minimum, like `f32::min`.
    pub fn min(self, other: BFloat16) -> BFloat16 {
        if self.is_nan() || other.is_less(self) {
            other
        } else {
            self
        }
    }

    /// NaN-ignoring maximum, like `f32::max`.
    pub fn max(self, other: BFloat16) -> BFloat16 {
        if self.is_nan() || self.is_less(other) {
            other
        } else {
            self
        }
    }

    /// NaN-propagating minimum; `-0` is less than `+0`.
    pub fn minimum(self, other: BFloat16) -> BFloat16 {
        if self.is_nan() || other.is_nan() {
            return BFloat16::NAN;
        }
        if self.is_less(other) || (self.is_equal(other) && self.is_sign_negative()) {
            self
        } else {
            other
        }
    }

    /// NaN-propagating maximum; `+0` is greater than `-0`.
    pub fn maximum(self, other: BFloat16) -> BFloat16 {
        if self.is_nan() || other.is_nan() {
            return BFloat16::NAN;
        }
        if other.is_less(self) || (self.is_equal(other) && self.is_sign_positive()) {
            self
        } else {
            other
        }
    }

    /// Restrict to `[min, max]`. NaN passes through.
    pub fn clamp(self, min: BFloat16, max: BFloat16) -> BFloat16 {
        if self.is_less(min) {
            min
        } else if max.is_less(self) {
            max
        } else {
            self
        }
    }

    // ------------------------------------------------------------------------
    // Decomposition
    // ------------------------------------------------------------------------

    /// Unbiased exponent of the value, with subnormals normalized.
    ///
    /// Returns `i32::MAX` for infinities and NaN and `i32::MIN` for zeros.
    pub fn exponent(self) -> i32 {
        if !self.is_finite() {
            return i32::MAX;
        }
        if self.is_zero() {
            return i32::MIN;
        }
        let provisional = self.exponent_bits() as i32 - BFloat16::EXPONENT_BIAS;
        if self.is_normal() {
            return provisional;
        }
        provisional + 1 - self.subnormal_shift() as i32
    }

    /// The significand scaled into `[1, 2)` with a positive sign.
    ///
    /// NaN is returned unchanged; zeros and infinities keep their exponent
    /// field with a cleared significand.
    pub fn significand(self) -> BFloat16 {
        if self.is_nan() {
            return self;
        }
        let bias = BFloat16::EXPONENT_BIAS as u16;
        if self.is_normal() {
            return BFloat16::from_parts(Sign::Plus, bias, self.significand_bits());
        }
        if self.is_subnormal() {
            let shifted = self.significand_bits() << self.subnormal_shift();
            return BFloat16::from_parts(Sign::Plus, bias, shifted);
        }
        BFloat16::from_parts(Sign::Plus, self.exponent_bits(), 0)
    }

    /// Shift that moves a subnormal's leading one up to the implicit bit.
    #[inline]
    fn subnormal_shift(self) -> u32 {
        let log2 = 15 - self.significand_bits().leading_zeros();
        BFloat16::SIGNIFICAND_BITS - log2
    }

    /// Build `(-1)^sign × significand × 2^exponent`, rounding once.
    ///
    /// A negative `significand` flips the resulting sign again.
    pub fn from_sign_exponent_significand(sign: Sign, exponent: i32, significand: BFloat16) -> BFloat16 {
        let signed = match sign {
            Sign::Plus => significand,
            Sign::Minus => -significand,
        };
        if !signed.is_finite() || signed.is_zero() {
            return signed;
        }
        // Any bf16 times 2^±400 is still an exact f64; past that the result
        // has long since saturated to zero or infinity.
        let scale = exp2i(exponent.clamp(-400, 400));
        BFloat16::from_f64(signed.to_f64() * scale)
    }

    /// The power of two with the same sign and exponent as `self`.
    ///
    /// NaN for non-finite inputs; zero for zeros.
    pub fn binade(self) -> BFloat16 {
        if !self.is_finite() {
            return BFloat16::NAN;
        }
        if self.is_zero() {
            return self;
        }
        if self.is_normal() {
            return BFloat16::from_bits(self.to_bits() & (BFloat16::SIGN_MASK | BFloat16::EXPONENT_MASK));
        }
        BFloat16::from_f64(exp2i(self.exponent())).copysign(self)
    }

    /// Unit in the last place: the gap between `|self|` and the next larger
    /// magnitude. NaN for non-finite inputs.
    pub fn ulp(self) -> BFloat16 {
        if !self.is_finite() {
            return BFloat16::NAN;
        }
        let exponent = self.exponent_bits().max(1);
        if exponent > BFloat16::SIGNIFICAND_BITS as u16 {
            BFloat16::from_parts(Sign::Plus, exponent - BFloat16::SIGNIFICAND_BITS as u16, 0)
        } else {
            BFloat16::from_bits(1 << (exponent - 1))
        }
    }

    /// Number of significant fractional bits, or -1 for zero, infinity and NaN.
    pub fn significand_width(self) -> i32 {
        let significand = self.significand_bits();
        let trailing = significand.trailing_zeros() as i32;
        if self.is_normal() {
            if significand == 0 {
                return 0;
            }
            return BFloat16::SIGNIFICAND_BITS as i32 - trailing;
        }
        if self.is_subnormal() {
            let leading = significand.leading_zeros() as i32;
            return 16 - (trailing + leading + 1);
        }
        -1
    }
}

// ============================================================================
// Tests
// ============================================================================
