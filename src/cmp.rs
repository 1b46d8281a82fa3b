//! Ordering, equality and hashing for `BFloat16`.
//!
//! All comparisons are decoded straight from the bit patterns. For two
//! non-NaN values the order of the magnitudes is the order of the low 15
//! bits, so no widening is needed.

use crate::bf16::BFloat16;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

impl BFloat16 {
    /// IEEE 754 equality: `+0 == -0`, NaN equals nothing.
    #[inline]
    pub const fn is_equal(self, other: BFloat16) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        let (a, b) = (self.to_bits(), other.to_bits());
        a == b || (a | b) & !BFloat16::SIGN_MASK == 0
    }

    /// IEEE 754 less-than. False whenever either side is NaN.
    #[inline]
    pub const fn is_less(self, other: BFloat16) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        let (a, b) = (self.to_bits(), other.to_bits());
        match (self.is_sign_negative(), other.is_sign_negative()) {
            (false, false) => a < b,
            (true, true) => a > b,
            // Mixed signs: only the zeros tie.
            (true, false) => (a | b) & !BFloat16::SIGN_MASK != 0,
            (false, true) => false,
        }
    }

    /// IEEE 754 less-than-or-equal. False whenever either side is NaN.
    #[inline]
    pub const fn is_less_or_equal(self, other: BFloat16) -> bool {
        self.is_less(other) || self.is_equal(other)
    }

    /// IEEE 754 `totalOrder`, matching [`f32::total_cmp`].
    ///
    /// Orders `-NaN < -inf < ... < -0 < +0 < ... < +inf < +NaN`.
    #[inline]
    pub fn total_cmp(&self, other: &BFloat16) -> Ordering {
        // Flip the magnitude bits of negatives so signed integer order matches.
        let key = |x: &BFloat16| {
            let bits = x.to_bits() as i16;
            bits ^ ((((bits >> 15) as u16) >> 1) as i16)
        };
        key(self).cmp(&key(other))
    }

    /// The least value greater than `self`.
    ///
    /// NaN gives a quiet NaN, `+inf` stays `+inf`, both zeros step to the
    /// smallest positive subnormal and `-inf` steps to `MIN`.
    pub const fn next_up(self) -> BFloat16 {
        if self.is_nan() {
            return self.quieted();
        }
        let bits = self.to_bits();
        if bits == BFloat16::INFINITY.to_bits() {
            return self;
        }
        if self.is_zero() {
            return BFloat16::MIN_POSITIVE_SUBNORMAL;
        }
        if self.is_sign_negative() {
            BFloat16::from_bits(bits - 1)
        } else {
            BFloat16::from_bits(bits + 1)
        }
    }

    /// The greatest value less than `self`. Mirror image of [`BFloat16::next_up`].
    pub const fn next_down(self) -> BFloat16 {
        let flipped = BFloat16::from_bits(self.to_bits() ^ BFloat16::SIGN_MASK);
        let up = flipped.next_up();
        BFloat16::from_bits(up.to_bits() ^ BFloat16::SIGN_MASK)
    }
}

impl PartialEq for BFloat16 {
    #[inline]
    fn eq(&self, other: &BFloat16) -> bool {
        self.is_equal(*other)
    }
}

impl PartialOrd for BFloat16 {
    fn partial_cmp(&self, other: &BFloat16) -> Option<Ordering> {
        if self.is_less(*other) {
            Some(Ordering::Less)
        } else if other.is_less(*self) {
            Some(Ordering::Greater)
        } else if self.is_equal(*other) {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &BFloat16) -> bool {
        self.is_less(*other)
    }

    #[inline]
    fn le(&self, other: &BFloat16) -> bool {
        self.is_less_or_equal(*other)
    }

    #[inline]
    fn gt(&self, other: &BFloat16) -> bool {
        other.is_less(*self)
    }

    #[inline]
    fn ge(&self, other: &BFloat16) -> bool {
        other.is_less_or_equal(*self)
    }
}

impl Hash for BFloat16 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // -0 and +0 compare equal, so they must hash alike.
        let bits = if self.is_zero() { 0 } else { self.to_bits() };
        bits.hash(state);
    }
}
