//! Conversion tests over the whole bf16 bit space.
//!
//! Every 16-bit pattern is a value, so most properties here are checked
//! exhaustively rather than sampled.

use bfloat16::{BFloat16, Status};

// ============================================================================
// Codec
// ============================================================================

#[test]
fn bits_should_round_trip_for_every_pattern() {
    for bits in 0..=u16::MAX {
        assert_eq!(BFloat16::from_bits(bits).to_bits(), bits);
    }
}

#[test]
fn widening_should_place_bits_in_the_high_half() {
    for bits in 0..=u16::MAX {
        let x = BFloat16::from_bits(bits);
        assert_eq!(x.to_f32().to_bits(), (bits as u32) << 16);
    }
    assert_eq!(BFloat16::from_bits(1).to_f32().to_bits(), 0x0001_0000);
}

// ============================================================================
// Narrowing
// ============================================================================

#[test]
fn narrowing_should_invert_widening_for_every_non_nan() {
    for bits in 0..=u16::MAX {
        let x = BFloat16::from_bits(bits);
        if x.is_nan() {
            continue;
        }
        let (from_f32, status) = BFloat16::from_f32_with_status(x.to_f32());
        assert_eq!(from_f32.to_bits(), bits, "f32 path, {bits:#06x}");
        assert_eq!(status, Status::empty(), "{bits:#06x}");
        assert_eq!(BFloat16::from_f64(x.to_f64()).to_bits(), bits, "f64 path, {bits:#06x}");
    }
}

#[test]
fn narrowing_should_keep_nan_class_and_sign() {
    for bits in 0..=u16::MAX {
        let x = BFloat16::from_bits(bits);
        if !x.is_nan() {
            continue;
        }
        for back in [BFloat16::from_f32(x.to_f32()), BFloat16::from_f64(x.to_f64())] {
            assert!(back.is_nan(), "{bits:#06x}");
            assert_eq!(back.sign(), x.sign(), "{bits:#06x}");
            assert!(!back.is_signaling_nan(), "{bits:#06x}");
        }
    }
}

#[test]
fn narrowing_should_round_ties_to_even() {
    let cases = [
        (250.49, 250.0),
        (250.50, 250.0),
        (250.51, 251.0),
        (251.49, 251.0),
        (251.50, 252.0),
        (251.51, 252.0),
        (252.49, 252.0),
        (252.50, 252.0),
        (252.51, 253.0),
    ];
    for (input, expected) in cases {
        assert_eq!(
            BFloat16::from_f32(input).to_bits(),
            BFloat16::from_f32(expected).to_bits(),
            "{input}"
        );
        assert_eq!(
            BFloat16::from_f64(input as f64).to_bits(),
            BFloat16::from_f32(expected).to_bits(),
            "{input} via f64"
        );
    }
}

#[test]
fn narrowing_should_flush_below_half_the_smallest_subnormal() {
    assert_eq!(BFloat16::from_f32(f32::from_bits(0x0000_0001)).to_bits(), 0x0000);
    assert_eq!(BFloat16::from_f32(f32::from_bits(0x8000_0001)).to_bits(), 0x8000);
    assert_eq!(BFloat16::from_f32(f32::from_bits(0x0001_0000)).to_bits(), 0x0001);
    // Exactly half the smallest subnormal is a tie with zero.
    assert_eq!(BFloat16::from_f32(f32::from_bits(0x0000_8000)).to_bits(), 0x0000);
    assert_eq!(BFloat16::from_f32(f32::from_bits(0x0000_8001)).to_bits(), 0x0001);
    let (_, status) = BFloat16::from_f64_with_status(1e-300);
    assert_eq!(status, Status::INEXACT | Status::UNDERFLOW);
}

#[test]
fn narrowing_should_saturate_only_past_the_overflow_threshold() {
    // MAX + ulp/2 is the threshold; anything below rounds to MAX.
    let max = BFloat16::MAX.to_f32().to_bits();
    let (below, status) = BFloat16::from_f32_with_status(f32::from_bits(max + 0x7FFF));
    assert_eq!(below, BFloat16::MAX);
    assert_eq!(status, Status::INEXACT);
    let (at, status) = BFloat16::from_f32_with_status(f32::from_bits(max + 0x8000));
    assert_eq!(at, BFloat16::INFINITY);
    assert_eq!(status, Status::INEXACT | Status::OVERFLOW);
    assert_eq!(BFloat16::from_f32(f32::MIN), BFloat16::NEG_INFINITY);
    assert_eq!(BFloat16::from_f64(f64::MAX), BFloat16::INFINITY);
    assert_eq!(BFloat16::from_f64(-1e300), BFloat16::NEG_INFINITY);
}

#[test]
fn narrowing_should_match_a_reference_rounding_for_sampled_f32() {
    // Reference: pick whichever neighbour is closer in f64, ties to even bits.
    for raw in (0..=u32::MAX).step_by(9973) {
        let value = f32::from_bits(raw);
        if !value.is_finite() {
            continue;
        }
        let got = BFloat16::from_f32(value);
        let truncated = BFloat16::from_bits((raw >> 16) as u16);
        let candidates = [truncated, truncated.next_up(), truncated.next_down()];
        let distance = |x: BFloat16| (x.to_f64() - value as f64).abs();
        let best = candidates
            .iter()
            .copied()
            .filter(|x| x.is_finite())
            .map(distance)
            .fold(f64::INFINITY, f64::min);
        if got.is_finite() {
            assert_eq!(distance(got), best, "{raw:#010x}");
        } else {
            // Only values at or past MAX + ulp/2 may overflow.
            let threshold = BFloat16::MAX.to_f64() + BFloat16::MAX.ulp().to_f64() / 2.0;
            assert!((value as f64).abs() >= threshold, "{raw:#010x}");
        }
    }
}

// ============================================================================
// Exact conversions
// ============================================================================

#[test]
fn exact_conversions_should_refuse_rounding_and_nan() {
    assert_eq!(BFloat16::from_f32_exact(1.5), Some(BFloat16::from_f32(1.5)));
    assert_eq!(BFloat16::from_f32_exact(1.0 + f32::EPSILON), None);
    assert_eq!(BFloat16::from_f64_exact(0.1), None);
    assert_eq!(BFloat16::from_f64_exact(f64::INFINITY), Some(BFloat16::INFINITY));
    assert_eq!(BFloat16::from_f32_exact(f32::NAN), None);
    assert_eq!(BFloat16::NAN.to_f32_exact(), None);
    assert_eq!(BFloat16::MAX.to_f64_exact(), Some(BFloat16::MAX.to_f64()));
}
