//! Text formatting and parsing.
//!
//! Finite values print exactly like the widened f32, which is the shortest
//! decimal that reads back as the same f32 and therefore as the same bf16.

use crate::bf16::BFloat16;
use crate::error::Error;
use core::fmt;
use core::str::FromStr;
use log::trace;

impl fmt::Display for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.pad(if self.is_sign_negative() { "-nan" } else { "nan" });
        }
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl fmt::Debug for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.pad(if self.is_sign_negative() { "-nan" } else { "nan" });
        }
        fmt::Debug::fmt(&self.to_f32(), f)
    }
}

impl fmt::LowerExp for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerExp::fmt(&self.to_f32(), f)
    }
}

impl fmt::UpperExp for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperExp::fmt(&self.to_f32(), f)
    }
}

impl FromStr for BFloat16 {
    type Err = Error;

    /// Parse a decimal literal, `inf`, `infinity` or `nan` (any case, with an
    /// optional sign), rounding once to the nearest bf16.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.parse().map_err(|err| {
            trace!("rejecting bfloat16 literal {s:?}: {err}");
            Error::Parse { input: s.to_owned() }
        })?;
        let x = BFloat16::from_f64(value);
        if x.is_nan() {
            let nan = BFloat16::NAN;
            return Ok(if s.starts_with('-') { -nan } else { nan });
        }
        Ok(x)
    }
}
