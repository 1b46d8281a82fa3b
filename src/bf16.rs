//! The `BFloat16` scalar type and its bit-level codec.
//!
//! `BFloat16` is the top 16 bits of an IEEE 754 single-precision float:
//! - 1 sign bit
//! - 8 exponent bits (same width and bias as f32)
//! - 7 significand bits (vs 23 for f32)
//!
//! # Layout
//!
//! ```text
//! f32:  SEEEEEEE EMMMMMMM MMMMMMMM MMMMMMMM
//! bf16: SEEEEEEE EMMMMMMM
//! ```
//! where S=sign, E=exponent, M=significand.
//!
//! Every one of the 65536 bit patterns is a valid value. This module only
//! deals with packing, unpacking and classifying those patterns; conversions
//! live in [`crate::convert`] and arithmetic in [`crate::arith`].

use serde::{Deserialize, Serialize};
use std::num::FpCategory;

/// The sign of a [`BFloat16`] value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    /// Sign bit clear.
    Plus,
    /// Sign bit set.
    Minus,
}

impl Sign {
    #[inline(always)]
    const fn bit(self) -> u16 {
        match self {
            Sign::Plus => 0,
            Sign::Minus => 1,
        }
    }
}

/// 16-bit brain floating point number.
///
/// # Storage
///
/// The raw bits are stored as a `u16`, interpreted as the upper 16 bits of
/// the IEEE 754 f32 representation.
///
/// # Equality
///
/// `PartialEq` follows IEEE 754 rather than comparing bits: `-0 == +0` and
/// NaN is unequal to everything, itself included. Use [`BFloat16::to_bits`]
/// when a bitwise comparison is wanted.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct BFloat16(u16);

impl BFloat16 {
    /// Number of exponent bits.
    pub const EXPONENT_BITS: u32 = 8;

    /// Number of stored significand bits (excluding the implicit leading bit).
    pub const SIGNIFICAND_BITS: u32 = 7;

    /// Exponent bias.
    pub const EXPONENT_BIAS: i32 = 127;

    /// Number of significant binary digits, implicit bit included.
    pub const MANTISSA_DIGITS: u32 = 8;

    /// Approximate number of significant decimal digits.
    pub const DIGITS: u32 = 2;

    /// The radix of the internal representation.
    pub const RADIX: u32 = 2;

    /// One greater than the minimum normal power of two exponent.
    pub const MIN_EXP: i32 = -125;

    /// One greater than the maximum finite power of two exponent.
    pub const MAX_EXP: i32 = 128;

    /// Minimum `x` such that `10^x` is a normal value.
    pub const MIN_10_EXP: i32 = -37;

    /// Maximum `x` such that `10^x` is finite.
    pub const MAX_10_EXP: i32 = 38;

    /// Whether subnormal encodings are honoured rather than flushed to zero.
    pub const SUPPORTS_SUBNORMALS: bool = true;

    pub(crate) const SIGN_MASK: u16 = 0x8000;
    pub(crate) const EXPONENT_MASK: u16 = 0x7F80;
    pub(crate) const SIGNIFICAND_MASK: u16 = 0x007F;
    pub(crate) const QUIET_NAN_MASK: u16 = 0x0040;
    pub(crate) const EXPONENT_FIELD_MAX: u16 = 0x00FF;

    /// 0.0
    pub const ZERO: Self = Self(0x0000);

    /// -0.0
    pub const NEG_ZERO: Self = Self(0x8000);

    /// 1.0
    pub const ONE: Self = Self(0x3F80);

    /// -1.0
    pub const NEG_ONE: Self = Self(0xBF80);

    /// Positive infinity.
    pub const INFINITY: Self = Self(0x7F80);

    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self(0xFF80);

    /// Canonical quiet NaN.
    pub const NAN: Self = Self(0x7FC0);

    /// A signaling NaN (quiet bit clear, sign set).
    pub const SIGNALING_NAN: Self = Self(0xFF81);

    /// Greatest finite value, about 3.39e38.
    pub const MAX: Self = Self(0x7F7F);

    /// Least finite value, `-MAX`.
    pub const MIN: Self = Self(0xFF7F);

    /// Smallest positive normal value, 2^-126.
    pub const MIN_POSITIVE: Self = Self(0x0080);

    /// Smallest positive subnormal value, 2^-133.
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x0001);

    /// Distance between 1.0 and the next larger value, 2^-7.
    pub const EPSILON: Self = Self(0x3C00);

    /// π rounded to nearest (3.140625).
    pub const PI: Self = Self(0x4049);

    /// Euler's number rounded to nearest (2.71875).
    pub const E: Self = Self(0x402E);

    /// ln(2) rounded to nearest.
    pub const LN_2: Self = Self(0x3F31);

    /// √2 rounded to nearest.
    pub const SQRT_2: Self = Self(0x3FB5);

    /// Construct from raw bits.
    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Return the raw bits.
    #[inline(always)]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Assemble a value from its three fields.
    ///
    /// Each field is masked to its width before being shifted into place, so
    /// out-of-range field values never bleed into their neighbours.
    #[inline]
    pub const fn from_parts(sign: Sign, exponent_bits: u16, significand_bits: u16) -> Self {
        Self(
            (sign.bit() << 15)
                | ((exponent_bits & Self::EXPONENT_FIELD_MAX) << Self::SIGNIFICAND_BITS)
                | (significand_bits & Self::SIGNIFICAND_MASK),
        )
    }

    /// The sign field.
    #[inline(always)]
    pub const fn sign(self) -> Sign {
        if self.0 & Self::SIGN_MASK != 0 {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }

    /// The biased exponent field (bits 14–7).
    #[inline(always)]
    pub const fn exponent_bits(self) -> u16 {
        (self.0 & Self::EXPONENT_MASK) >> Self::SIGNIFICAND_BITS
    }

    /// The stored significand field (bits 6–0).
    #[inline(always)]
    pub const fn significand_bits(self) -> u16 {
        self.0 & Self::SIGNIFICAND_MASK
    }

    #[inline(always)]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & Self::SIGN_MASK != 0
    }

    #[inline(always)]
    pub const fn is_sign_positive(self) -> bool {
        !self.is_sign_negative()
    }

    /// True for both `+0` and `-0`.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 & !Self::SIGN_MASK == 0
    }

    #[inline(always)]
    pub const fn is_subnormal(self) -> bool {
        self.exponent_bits() == 0 && self.significand_bits() != 0
    }

    /// Neither zero, subnormal, infinite nor NaN.
    #[inline(always)]
    pub const fn is_normal(self) -> bool {
        let exp = self.exponent_bits();
        exp != 0 && exp != Self::EXPONENT_FIELD_MAX
    }

    #[inline(always)]
    pub const fn is_finite(self) -> bool {
        self.0 & Self::EXPONENT_MASK != Self::EXPONENT_MASK
    }

    #[inline(always)]
    pub const fn is_infinite(self) -> bool {
        self.0 & !Self::SIGN_MASK == Self::EXPONENT_MASK
    }

    #[inline(always)]
    pub const fn is_nan(self) -> bool {
        self.0 & !Self::SIGN_MASK > Self::EXPONENT_MASK
    }

    /// A NaN whose quiet bit (the top significand bit) is clear.
    #[inline(always)]
    pub const fn is_signaling_nan(self) -> bool {
        self.is_nan() && self.0 & Self::QUIET_NAN_MASK == 0
    }

    /// Whether this encoding is the preferred one for its value.
    ///
    /// With subnormal support every encoding is canonical. Without it,
    /// subnormal patterns are non-canonical encodings of zero.
    #[inline(always)]
    pub const fn is_canonical(self) -> bool {
        Self::SUPPORTS_SUBNORMALS || !self.is_subnormal()
    }

    /// Returns the floating point category of the number.
    pub const fn classify(self) -> FpCategory {
        match (self.exponent_bits(), self.significand_bits()) {
            (0, 0) => FpCategory::Zero,
            (0, _) => FpCategory::Subnormal,
            (Self::EXPONENT_FIELD_MAX, 0) => FpCategory::Infinite,
            (Self::EXPONENT_FIELD_MAX, _) => FpCategory::Nan,
            _ => FpCategory::Normal,
        }
    }

    /// The same NaN with its quiet bit set. Non-NaN values pass through.
    #[inline(always)]
    pub(crate) const fn quieted(self) -> Self {
        if self.is_nan() {
            Self(self.0 | Self::QUIET_NAN_MASK)
        } else {
            self
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_field_projection() {
        // 1.0 in f32 = 0x3F800000, upper 16 bits = 0x3F80
        let one = BFloat16::ONE;
        assert_eq!(one.sign(), Sign::Plus);
        assert_eq!(one.exponent_bits(), 127);
        assert_eq!(one.significand_bits(), 0);

        let neg = BFloat16::from_bits(0xC0A0); // -5.0
        assert_eq!(neg.sign(), Sign::Minus);
        assert_eq!(neg.exponent_bits(), 129);
        assert_eq!(neg.significand_bits(), 0x20);
    }

    #[test_log::test]
    fn test_from_parts_reassembles_every_pattern() {
        for bits in 0..=u16::MAX {
            let x = BFloat16::from_bits(bits);
            let rebuilt = BFloat16::from_parts(x.sign(), x.exponent_bits(), x.significand_bits());
            assert_eq!(rebuilt.to_bits(), bits);
        }
    }

    #[test_log::test]
    fn test_from_parts_masks_fields() {
        let x = BFloat16::from_parts(Sign::Plus, 0x1FF, 0xFFFF);
        assert_eq!(x.to_bits(), 0x7FFF);
    }

    #[test_log::test]
    fn test_classification_of_specials() {
        assert!(BFloat16::ZERO.is_zero());
        assert!(BFloat16::NEG_ZERO.is_zero());
        assert!(BFloat16::NEG_ZERO.is_sign_negative());
        assert!(BFloat16::INFINITY.is_infinite());
        assert!(!BFloat16::INFINITY.is_nan());
        assert!(BFloat16::NAN.is_nan());
        assert!(!BFloat16::NAN.is_signaling_nan());
        assert!(BFloat16::SIGNALING_NAN.is_nan());
        assert!(BFloat16::SIGNALING_NAN.is_signaling_nan());
        assert!(BFloat16::MIN_POSITIVE_SUBNORMAL.is_subnormal());
        assert!(BFloat16::MIN_POSITIVE.is_normal());
        assert!(BFloat16::MAX.is_finite());
        assert_eq!(BFloat16::MAX.classify(), FpCategory::Normal);
        assert_eq!(BFloat16::from_bits(0x8003).classify(), FpCategory::Subnormal);
        assert_eq!(BFloat16::NEG_INFINITY.classify(), FpCategory::Infinite);
        assert_eq!(BFloat16::from_bits(0x7F81).classify(), FpCategory::Nan);
    }

    #[test_log::test]
    fn test_classes_partition_the_bit_space() {
        for bits in 0..=u16::MAX {
            let x = BFloat16::from_bits(bits);
            let classes = [x.is_zero(), x.is_subnormal(), x.is_normal(), x.is_infinite(), x.is_nan()];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "bits {bits:#06x}");
            assert!(x.is_canonical());
            assert_eq!(x.is_finite(), !x.is_infinite() && !x.is_nan());
        }
    }

    #[test_log::test]
    fn test_quieted() {
        assert_eq!(BFloat16::SIGNALING_NAN.quieted().to_bits(), 0xFFC1);
        assert_eq!(BFloat16::ONE.quieted().to_bits(), BFloat16::ONE.to_bits());
    }
}
