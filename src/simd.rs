//! Packed vectors of `BFloat16` lanes.
//!
//! These are storage types: a fixed-size lane array with the alignment a
//! SIMD register load expects. Arithmetic is lane-wise and follows the same
//! single-rounding rule as the scalar operators.

use crate::bf16::BFloat16;
use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

macro_rules! impl_lane_op {
    ($name:ident, $trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for $name {
            type Output = $name;

            #[inline]
            fn $method(self, rhs: $name) -> $name {
                let mut out = self;
                out.$assign_method(rhs);
                out
            }
        }

        impl $assign_trait for $name {
            #[inline]
            fn $assign_method(&mut self, rhs: $name) {
                for (lane, other) in self.0.iter_mut().zip(rhs.0) {
                    *lane = *lane $op other;
                }
            }
        }
    };
}

macro_rules! bf16_vector {
    ($(#[$meta:meta])* $name:ident, $lanes:literal, $align:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq)]
        #[repr(C, align($align))]
        pub struct $name([BFloat16; $lanes]);

        impl $name {
            /// Number of lanes.
            pub const LANES: usize = $lanes;

            /// All lanes `+0`.
            #[inline]
            pub const fn new() -> Self {
                Self([BFloat16::ZERO; $lanes])
            }

            /// Every lane set to `value`.
            #[inline]
            pub const fn splat(value: BFloat16) -> Self {
                Self([value; $lanes])
            }

            #[inline]
            pub const fn from_array(lanes: [BFloat16; $lanes]) -> Self {
                Self(lanes)
            }

            #[inline]
            pub const fn to_array(self) -> [BFloat16; $lanes] {
                self.0
            }

            /// Build from raw lane bit patterns.
            pub fn from_bits(bits: [u16; $lanes]) -> Self {
                Self(bits.map(BFloat16::from_bits))
            }

            /// Raw lane bit patterns.
            pub fn as_bits(&self) -> [u16; $lanes] {
                self.0.map(BFloat16::to_bits)
            }

            /// Round each f32 lane to bf16.
            pub fn from_f32_array(values: [f32; $lanes]) -> Self {
                Self(values.map(BFloat16::from_f32))
            }

            /// Widen each lane to f32.
            pub fn to_f32_array(self) -> [f32; $lanes] {
                self.0.map(BFloat16::to_f32)
            }

            /// Lane `index`.
            ///
            /// # Panics
            ///
            /// Panics if `index >= LANES`.
            #[inline]
            pub fn get(&self, index: usize) -> BFloat16 {
                self.0[index]
            }

            /// Overwrite lane `index`.
            ///
            /// # Panics
            ///
            /// Panics if `index >= LANES`.
            #[inline]
            pub fn set(&mut self, index: usize, value: BFloat16) {
                self.0[index] = value;
            }

            pub fn iter(&self) -> core::slice::Iter<'_, BFloat16> {
                self.0.iter()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Index<usize> for $name {
            type Output = BFloat16;

            #[inline]
            fn index(&self, index: usize) -> &BFloat16 {
                &self.0[index]
            }
        }

        impl IndexMut<usize> for $name {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut BFloat16 {
                &mut self.0[index]
            }
        }

        impl From<[BFloat16; $lanes]> for $name {
            fn from(lanes: [BFloat16; $lanes]) -> Self {
                Self(lanes)
            }
        }

        impl From<$name> for [BFloat16; $lanes] {
            fn from(vector: $name) -> Self {
                vector.0
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a BFloat16;
            type IntoIter = core::slice::Iter<'a, BFloat16>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl Neg for $name {
            type Output = $name;

            fn neg(self) -> $name {
                Self(self.0.map(|lane| -lane))
            }
        }

        impl_lane_op!($name, Add, add, AddAssign, add_assign, +);
        impl_lane_op!($name, Sub, sub, SubAssign, sub_assign, -);
        impl_lane_op!($name, Mul, mul, MulAssign, mul_assign, *);
        impl_lane_op!($name, Div, div, DivAssign, div_assign, /);
    };
}

bf16_vector!(
    /// Two `BFloat16` lanes, 4-byte aligned.
    BFloat16x2, 2, 4
);
bf16_vector!(
    /// Four `BFloat16` lanes, 8-byte aligned.
    BFloat16x4, 4, 8
);
bf16_vector!(
    /// Eight `BFloat16` lanes, 16-byte aligned.
    BFloat16x8, 8, 16
);
bf16_vector!(
    /// Sixteen `BFloat16` lanes, 16-byte aligned.
    BFloat16x16, 16, 16
);
bf16_vector!(
    /// Thirty-two `BFloat16` lanes, 16-byte aligned.
    BFloat16x32, 32, 16
);
bf16_vector!(
    /// Sixty-four `BFloat16` lanes, 16-byte aligned.
    BFloat16x64, 64, 16
);
