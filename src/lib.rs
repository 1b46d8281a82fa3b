//! A 16-bit "brain" floating point type.
//!
//! [`BFloat16`] keeps f32's sign bit and full 8-bit exponent but only 7
//! significand bits, so it covers f32's dynamic range at half the storage.
//! Conversions from wider floats (and integers) round to nearest, ties to
//! even, with correct subnormal and overflow handling. Arithmetic is
//! performed in f32 and rounded once back to bf16.
//!
//! ```
//! use bfloat16::BFloat16;
//!
//! let x = BFloat16::from_f32(3.14159);
//! assert_eq!(x, BFloat16::PI);
//! assert_eq!(x.to_bits(), 0x4049);
//! assert_eq!((x * BFloat16::from_f32(2.0)).to_f32(), 6.28125);
//! ```

pub mod arith;
pub mod atomic;
pub mod bf16;
pub mod cmp;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod inspect;
pub mod int;
pub mod serialize;
pub mod simd;
pub mod status;

pub use arith::RoundingRule;
pub use atomic::AtomicBFloat16;
pub use bf16::{BFloat16, Sign};
pub use error::{Error, Result};
pub use int::Integer;
pub use simd::{BFloat16x16, BFloat16x2, BFloat16x32, BFloat16x4, BFloat16x64, BFloat16x8};
pub use status::Status;
