//! Conversions between `BFloat16` and the wider binary formats.
//!
//! Widening is exact: a bf16 pattern is the high half of an f32 pattern, so
//! `to_f32` is a shift and `to_f64` goes through f32.
//!
//! Narrowing rounds to nearest, ties to even. Both f32 and f64 sources share
//! one rounding core that works on the source's bit fields directly, so an
//! f64 is rounded exactly once rather than being squeezed through f32 first.

use crate::bf16::BFloat16;
use crate::status::Status;

/// Field layout of a binary IEEE 754 format wider than bf16.
pub(crate) trait WideFloat: Copy {
    const SIGNIFICAND_BITS: u32;
    const EXPONENT_BITS: u32;
    const EXPONENT_BIAS: i32;

    /// Raw bit pattern, zero-extended to 64 bits.
    fn raw_bits(self) -> u64;
}

impl WideFloat for f32 {
    const SIGNIFICAND_BITS: u32 = 23;
    const EXPONENT_BITS: u32 = 8;
    const EXPONENT_BIAS: i32 = 127;

    #[inline(always)]
    fn raw_bits(self) -> u64 {
        self.to_bits() as u64
    }
}

impl WideFloat for f64 {
    const SIGNIFICAND_BITS: u32 = 52;
    const EXPONENT_BITS: u32 = 11;
    const EXPONENT_BIAS: i32 = 1023;

    #[inline(always)]
    fn raw_bits(self) -> u64 {
        self.to_bits()
    }
}

/// Round a wide float to the nearest bf16, ties to even.
pub(crate) fn narrow<F: WideFloat>(value: F) -> (BFloat16, Status) {
    let bits = value.raw_bits();
    let sig_bits = F::SIGNIFICAND_BITS;
    let exponent_max = (1i32 << F::EXPONENT_BITS) - 1;

    let negative = (bits >> (sig_bits + F::EXPONENT_BITS)) & 1 == 1;
    let exponent_field = ((bits >> sig_bits) as i32) & exponent_max;
    let significand = bits & ((1u64 << sig_bits) - 1);
    let sign = if negative { BFloat16::SIGN_MASK } else { 0 };

    if exponent_field == exponent_max {
        if significand == 0 {
            return (BFloat16::from_bits(sign | BFloat16::EXPONENT_MASK), Status::empty());
        }
        // Keep the top payload bits and force the quiet bit.
        let payload = (significand >> (sig_bits - BFloat16::SIGNIFICAND_BITS)) as u16;
        let was_quiet = (significand >> (sig_bits - 1)) & 1 == 1;
        let status = if was_quiet { Status::empty() } else { Status::INVALID };
        let nan = sign | BFloat16::EXPONENT_MASK | BFloat16::QUIET_NAN_MASK | payload;
        return (BFloat16::from_bits(nan), status);
    }

    if exponent_field == 0 && significand == 0 {
        return (BFloat16::from_bits(sign), Status::empty());
    }

    // Normalize so the leading one sits at bit `sig_bits`.
    let (exponent, significand) = if exponent_field == 0 {
        let shift = significand.leading_zeros() - (63 - sig_bits);
        (1 - F::EXPONENT_BIAS - shift as i32, significand << shift)
    } else {
        (exponent_field - F::EXPONENT_BIAS, significand | (1u64 << sig_bits))
    };

    round_to_nearest_even(negative, exponent, significand as u128, sig_bits)
}

/// Round `significand × 2^(exponent - top)` to bf16.
///
/// `significand` must be nonzero with its leading one at bit `top`, so the
/// value being rounded is `1.f × 2^exponent`.
pub(crate) fn round_to_nearest_even(
    negative: bool,
    exponent: i32,
    significand: u128,
    top: u32,
) -> (BFloat16, Status) {
    let sign = if negative { BFloat16::SIGN_MASK } else { 0 };
    let biased = exponent + BFloat16::EXPONENT_BIAS;

    if biased >= BFloat16::EXPONENT_FIELD_MAX as i32 {
        let infinity = BFloat16::from_bits(sign | BFloat16::EXPONENT_MASK);
        return (infinity, Status::OVERFLOW | Status::INEXACT);
    }

    // Below the normal range the implicit one is shifted further right by
    // the exponent deficit.
    let tiny = biased < 1;
    let deficit = if tiny { 1 - biased } else { 0 };
    let shift = top as i32 - BFloat16::SIGNIFICAND_BITS as i32 + deficit;

    let (kept, round_up, inexact) = if shift <= 0 {
        (significand << (-shift) as u32, false, false)
    } else if shift >= u128::BITS as i32 {
        (0, false, true)
    } else {
        let shift = shift as u32;
        let kept = significand >> shift;
        let rest = significand & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        let round_up = rest > half || (rest == half && kept & 1 == 1);
        (kept, round_up, rest != 0)
    };

    // For normal results `kept` carries the implicit one at bit 7, so adding
    // it to `(biased - 1) << 7` yields the exponent field; a rounding carry
    // out of the significand bumps the exponent for free.
    let base = if tiny {
        0
    } else {
        ((biased - 1) as u16) << BFloat16::SIGNIFICAND_BITS
    };
    let magnitude = base + kept as u16 + round_up as u16;

    let mut status = Status::empty();
    if inexact {
        status |= Status::INEXACT;
        if tiny {
            status |= Status::UNDERFLOW;
        }
    }
    if magnitude >= BFloat16::EXPONENT_MASK {
        status |= Status::OVERFLOW;
        return (BFloat16::from_bits(sign | BFloat16::EXPONENT_MASK), status);
    }
    (BFloat16::from_bits(sign | magnitude), status)
}

impl BFloat16 {
    /// Round an f32 to the nearest bf16, ties to even.
    ///
    /// NaN stays NaN with its sign and top payload bits kept and the quiet
    /// bit forced on. Magnitudes at or above `MAX + ulp/2` become infinity;
    /// magnitudes below half the smallest subnormal become signed zero.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        narrow(value).0
    }

    /// Round an f64 to the nearest bf16, ties to even, in a single step.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        narrow(value).0
    }

    /// Like [`BFloat16::from_f32`], also reporting the exception flags raised.
    #[inline]
    pub fn from_f32_with_status(value: f32) -> (Self, Status) {
        narrow(value)
    }

    /// Like [`BFloat16::from_f64`], also reporting the exception flags raised.
    #[inline]
    pub fn from_f64_with_status(value: f64) -> (Self, Status) {
        narrow(value)
    }

    /// Convert an f32 only if it is representable without rounding.
    ///
    /// Passing NaN always yields `None`.
    pub fn from_f32_exact(value: f32) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let (result, status) = narrow(value);
        status.is_exact().then_some(result)
    }

    /// Convert an f64 only if it is representable without rounding.
    ///
    /// Passing NaN always yields `None`.
    pub fn from_f64_exact(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let (result, status) = narrow(value);
        status.is_exact().then_some(result)
    }

    /// Convert to f32 by zero-extending the significand.
    ///
    /// This is an exact conversion (no rounding occurs).
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        f32::from_bits((self.to_bits() as u32) << 16)
    }

    /// Convert to f64. Exact.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        f64::from(self.to_f32())
    }

    /// Widen to f32, refusing NaN.
    pub fn to_f32_exact(self) -> Option<f32> {
        (!self.is_nan()).then(|| self.to_f32())
    }

    /// Widen to f64, refusing NaN.
    pub fn to_f64_exact(self) -> Option<f64> {
        (!self.is_nan()).then(|| self.to_f64())
    }
}

impl From<BFloat16> for f32 {
    #[inline(always)]
    fn from(value: BFloat16) -> Self {
        value.to_f32()
    }
}

impl From<BFloat16> for f64 {
    #[inline(always)]
    fn from(value: BFloat16) -> Self {
        value.to_f64()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(value: f32) -> u16 {
        BFloat16::from_f32(value).to_bits()
    }

    #[test_log::test]
    fn test_from_f32_basics() {
        assert_eq!(BFloat16::from_f32(1.0).to_bits(), BFloat16::ONE.to_bits());
        assert_eq!(BFloat16::from_f32(-1.0).to_bits(), BFloat16::NEG_ONE.to_bits());
        assert_eq!(BFloat16::from_f32(0.0).to_bits(), 0x0000);
        assert_eq!(BFloat16::from_f32(-0.0).to_bits(), 0x8000);
        assert_eq!(BFloat16::from_f32(f32::INFINITY).to_bits(), 0x7F80);
        assert_eq!(BFloat16::from_f32(f32::NEG_INFINITY).to_bits(), 0xFF80);
        assert!(BFloat16::from_f32(f32::NAN).is_nan());
    }

    #[test_log::test]
    fn test_ties_to_even() {
        // Between 128 and 256 consecutive bf16 values are one apart.
        assert_eq!(bits_of(250.5), bits_of(250.0));
        assert_eq!(bits_of(251.5), bits_of(252.0));
        assert_eq!(bits_of(252.5), bits_of(252.0));
        assert_eq!(bits_of(250.51), bits_of(251.0));
    }

    #[test_log::test]
    fn test_carry_into_exponent() {
        // 255.5 ties up to the even 256.0, crossing a binade.
        assert_eq!(bits_of(255.5), bits_of(256.0));
        assert_eq!(BFloat16::from_f32(255.5).exponent_bits(), 135);
    }

    #[test_log::test]
    fn test_overflow_threshold() {
        let max = BFloat16::MAX.to_f32();
        assert_eq!(BFloat16::from_f32(max).to_bits(), 0x7F7F);

        let just_above = f32::from_bits(0x7F7F_7FFF);
        assert_eq!(BFloat16::from_f32(just_above).to_bits(), 0x7F7F);

        let threshold = f32::from_bits(0x7F7F_8000);
        let (result, status) = BFloat16::from_f32_with_status(threshold);
        assert!(result.is_infinite());
        assert!(status.contains(Status::OVERFLOW | Status::INEXACT));

        assert!(BFloat16::from_f32(-f32::MAX).is_infinite());
        assert!(BFloat16::from_f32(-f32::MAX).is_sign_negative());
    }

    #[test_log::test]
    fn test_subnormal_rounding() {
        let tiny = f32::from_bits(0x0001_0000);
        assert_eq!(BFloat16::from_f32(tiny).to_bits(), 0x0001);
        assert_eq!(BFloat16::from_f32(5.0 * tiny).to_bits(), 0x0005);

        // Half the smallest subnormal ties to even zero; a hair more rounds up.
        assert_eq!(bits_of(f32::from_bits(0x0000_8000)), 0x0000);
        assert_eq!(bits_of(f32::from_bits(0x0000_8001)), 0x0001);
        assert_eq!(bits_of(f32::from_bits(0x8000_0001)), 0x8000);

        let (zero, status) = BFloat16::from_f32_with_status(f32::from_bits(1));
        assert_eq!(zero.to_bits(), 0);
        assert!(status.contains(Status::UNDERFLOW | Status::INEXACT));
    }

    #[test_log::test]
    fn test_largest_subnormal_rounds_to_min_positive() {
        // 0x007F_8000 is halfway between the largest subnormal and 2^-126.
        assert_eq!(bits_of(f32::from_bits(0x007F_8000)), 0x0080);
        assert_eq!(bits_of(f32::from_bits(0x007F_7FFF)), 0x007F);
    }

    #[test_log::test]
    fn test_nan_payload_and_sign() {
        let (nan, status) = BFloat16::from_f32_with_status(f32::from_bits(0xFFA0_0001));
        assert!(nan.is_nan());
        assert!(nan.is_sign_negative());
        assert!(!nan.is_signaling_nan());
        assert_eq!(nan.to_bits(), 0xFFE0);
        assert!(status.contains(Status::INVALID));

        let (quiet, status) = BFloat16::from_f32_with_status(f32::NAN);
        assert_eq!(quiet.to_bits(), BFloat16::NAN.to_bits());
        assert!(status.is_empty());
    }

    #[test_log::test]
    fn test_from_f64_rounds_once() {
        // 1 + 2^-8 + 2^-40 is just above a tie. Going through f32 would drop
        // the 2^-40 term and tie down to 1.0.
        let value = 1.0 + 2f64.powi(-8) + 2f64.powi(-40);
        assert_eq!(BFloat16::from_f64(value).to_bits(), 0x3F81);
        assert_eq!(BFloat16::from_f32(value as f32).to_bits(), 0x3F80);
    }

    #[test_log::test]
    fn test_from_f64_extremes() {
        assert_eq!(BFloat16::from_f64(f64::MIN_POSITIVE).to_bits(), 0x0000);
        assert_eq!(BFloat16::from_f64(-f64::MIN_POSITIVE).to_bits(), 0x8000);
        assert!(BFloat16::from_f64(f64::MAX).is_infinite());
        assert_eq!(BFloat16::from_f64(2f64.powi(-133)).to_bits(), 0x0001);
        assert_eq!(BFloat16::from_f64(BFloat16::MAX.to_f64()).to_bits(), 0x7F7F);
    }

    #[test_log::test]
    fn test_exact_conversions() {
        assert_eq!(BFloat16::from_f32_exact(1.5).map(BFloat16::to_bits), Some(0x3FC0));
        assert!(BFloat16::from_f32_exact(1.0 + f32::EPSILON).is_none());
        assert!(BFloat16::from_f32_exact(f32::NAN).is_none());
        assert!(BFloat16::from_f32_exact(f32::INFINITY).is_some());
        assert!(BFloat16::from_f64_exact(0.1).is_none());
        assert!(BFloat16::from_f64_exact(1e300).is_none());

        assert_eq!(BFloat16::ONE.to_f32_exact(), Some(1.0));
        assert_eq!(BFloat16::NAN.to_f64_exact(), None);
    }

    #[test_log::test]
    fn test_widening() {
        assert_eq!(f32::from(BFloat16::ONE), 1.0);
        assert_eq!(f64::from(BFloat16::from_bits(0xC0A0)), -5.0);
        assert_eq!(BFloat16::from_bits(0x0001).to_f32().to_bits(), 0x0001_0000);
        assert_eq!(BFloat16::NEG_ZERO.to_f64().to_bits(), (-0.0f64).to_bits());
    }
}
