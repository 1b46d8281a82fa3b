//! Round trips through text and serde formats.

use bfloat16::{AtomicBFloat16, BFloat16, BFloat16x8, Error};
use std::sync::atomic::Ordering;

#[test]
fn display_should_round_trip_every_non_nan() {
    for bits in 0..=u16::MAX {
        let x = BFloat16::from_bits(bits);
        if x.is_nan() {
            continue;
        }
        let text = x.to_string();
        let back: BFloat16 = text.parse().unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(back.to_bits(), bits, "{text}");

        let debug = format!("{x:?}");
        assert_eq!(debug.parse::<BFloat16>().map(BFloat16::to_bits), Ok(bits), "{debug}");
    }
}

#[test]
fn nan_text_should_keep_its_sign() {
    for nan in [BFloat16::NAN, -BFloat16::NAN, BFloat16::SIGNALING_NAN] {
        let back: BFloat16 = nan.to_string().parse().unwrap();
        assert!(back.is_nan());
        assert_eq!(back.sign(), nan.sign());
    }
}

#[test]
fn parse_errors_should_carry_the_input() {
    match "one".parse::<BFloat16>() {
        Err(Error::Parse { input }) => assert_eq!(input, "one"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn json_should_round_trip_every_finite_value() {
    for bits in (0..=u16::MAX).step_by(13) {
        let x = BFloat16::from_bits(bits);
        if !x.is_finite() {
            continue;
        }
        let json = serde_json::to_string(&x).unwrap();
        let back: BFloat16 = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_bits(), bits, "{json}");
    }
}

#[test]
fn json_should_accept_strings_for_non_finite_values() {
    let values: Vec<BFloat16> = serde_json::from_str(r#"["inf", "-Infinity", "nan", 1, -0.5]"#).unwrap();
    assert_eq!(values[0], BFloat16::INFINITY);
    assert_eq!(values[1], BFloat16::NEG_INFINITY);
    assert!(values[2].is_nan());
    assert_eq!(values[3], BFloat16::ONE);
    assert_eq!(values[4], BFloat16::from_f32(-0.5));
}

#[test]
fn json_should_reject_finite_values_past_max() {
    assert!(serde_json::from_str::<BFloat16>("1e39").is_err());
    assert!(serde_json::from_str::<BFloat16>("3.4e38").is_err());
    let x: BFloat16 = serde_json::from_str("3.3895e38").unwrap();
    assert_eq!(x, BFloat16::MAX);
}

#[test]
fn vectors_and_atomics_should_compose_with_scalars() {
    let v = BFloat16x8::splat(BFloat16::from_f32(0.5));
    let total: BFloat16 = v.iter().sum();
    assert_eq!(total, BFloat16::from_f32(4.0));

    let acc = AtomicBFloat16::default();
    for lane in &v {
        acc.fetch_add(*lane, Ordering::Relaxed);
    }
    assert_eq!(acc.into_inner(), total);
}
