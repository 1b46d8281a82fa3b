//! `serde` support.
//!
//! A `BFloat16` serializes as its widened f32. Deserialization accepts any
//! number, and strings for formats (like JSON) that can't carry non-finite
//! floats, rounding once to the nearest bf16. Finite inputs beyond `MAX`
//! are rejected rather than silently saturated to infinity.
//!
//! serde_json writes NaN and both infinities as `null`, which reads back as
//! NaN. Store non-finite values as strings (`"inf"`) to keep them exact.

use crate::bf16::BFloat16;
use crate::error::Error;
use core::fmt;
use log::debug;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for BFloat16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.to_f32())
    }
}

impl<'de> Deserialize<'de> for BFloat16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(BFloat16Visitor)
        } else {
            deserializer.deserialize_f32(BFloat16Visitor)
        }
    }
}

/// Narrow `value`, refusing finite magnitudes that would overflow.
fn checked_from_f64(value: f64) -> Result<BFloat16, Error> {
    if value.is_finite() && value.abs() > BFloat16::MAX.to_f64() {
        debug!("rejecting out-of-range bfloat16 value {value}");
        return Err(Error::OutOfRange { value });
    }
    Ok(BFloat16::from_f64(value))
}

struct BFloat16Visitor;

impl<'de> Visitor<'de> for BFloat16Visitor {
    type Value = BFloat16;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number within the bfloat16 range, or \"inf\"/\"nan\"")
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<BFloat16, E> {
        checked_from_f64(f64::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BFloat16, E> {
        checked_from_f64(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BFloat16, E> {
        Ok(BFloat16::from_int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BFloat16, E> {
        Ok(BFloat16::from_int(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<BFloat16, E> {
        Ok(BFloat16::from_int(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<BFloat16, E> {
        // MAX is 0xFF << 120, exact as an integer. Anything above it is out of
        // range even when it would round back down to MAX.
        if v > BFloat16::MAX.to_f64() as u128 {
            debug!("rejecting out-of-range bfloat16 value {v}");
            return Err(E::custom(Error::OutOfRange { value: v as f64 }));
        }
        Ok(BFloat16::from_int(v))
    }

    /// Formats without non-finite floats (serde_json) write NaN and the
    /// infinities as `null`; read it back as NaN.
    fn visit_unit<E: de::Error>(self) -> Result<BFloat16, E> {
        Ok(BFloat16::NAN)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BFloat16, E> {
        v.parse().map_err(E::custom)
    }
}
