//! Atomic `BFloat16` storage.
//!
//! The value lives in an `AtomicU16` under its raw bit pattern, so loads and
//! stores are lock-free wherever 16-bit atomics are. Compare-and-exchange
//! compares bit patterns, not numeric values: `-0` does not match `+0`, and a
//! NaN matches an identical NaN.

use crate::bf16::BFloat16;
use core::fmt;
use core::sync::atomic::{AtomicU16, Ordering};

#[inline(always)]
const fn to_atomic_bits(value: BFloat16) -> u16 {
    value.to_bits()
}

#[inline(always)]
const fn from_atomic_bits(bits: u16) -> BFloat16 {
    BFloat16::from_bits(bits)
}

/// A `BFloat16` that can be shared between threads.
#[repr(transparent)]
pub struct AtomicBFloat16 {
    bits: AtomicU16,
}

impl AtomicBFloat16 {
    pub const fn new(value: BFloat16) -> Self {
        Self {
            bits: AtomicU16::new(to_atomic_bits(value)),
        }
    }

    #[inline]
    pub fn load(&self, order: Ordering) -> BFloat16 {
        from_atomic_bits(self.bits.load(order))
    }

    #[inline]
    pub fn store(&self, value: BFloat16, order: Ordering) {
        self.bits.store(to_atomic_bits(value), order);
    }

    /// Store `value`, returning the previous value.
    #[inline]
    pub fn swap(&self, value: BFloat16, order: Ordering) -> BFloat16 {
        from_atomic_bits(self.bits.swap(to_atomic_bits(value), order))
    }

    /// Store `new` if the current bit pattern equals `current`'s.
    pub fn compare_exchange(
        &self,
        current: BFloat16,
        new: BFloat16,
        success: Ordering,
        failure: Ordering,
    ) -> Result<BFloat16, BFloat16> {
        self.bits
            .compare_exchange(to_atomic_bits(current), to_atomic_bits(new), success, failure)
            .map(from_atomic_bits)
            .map_err(from_atomic_bits)
    }

    /// Like [`AtomicBFloat16::compare_exchange`], but may fail spuriously.
    pub fn compare_exchange_weak(
        &self,
        current: BFloat16,
        new: BFloat16,
        success: Ordering,
        failure: Ordering,
    ) -> Result<BFloat16, BFloat16> {
        self.bits
            .compare_exchange_weak(to_atomic_bits(current), to_atomic_bits(new), success, failure)
            .map(from_atomic_bits)
            .map_err(from_atomic_bits)
    }

    /// Apply `f` until it returns `None` or the update lands; see
    /// [`AtomicU16::fetch_update`].
    pub fn fetch_update<F>(
        &self,
        set_order: Ordering,
        fetch_order: Ordering,
        mut f: F,
    ) -> Result<BFloat16, BFloat16>
    where
        F: FnMut(BFloat16) -> Option<BFloat16>,
    {
        self.bits
            .fetch_update(set_order, fetch_order, |bits| {
                f(from_atomic_bits(bits)).map(to_atomic_bits)
            })
            .map(from_atomic_bits)
            .map_err(from_atomic_bits)
    }

    /// Add `value`, rounding once, and return the previous value.
    pub fn fetch_add(&self, value: BFloat16, order: Ordering) -> BFloat16 {
        self.fetch_apply(order, |current| current + value)
    }

    /// Subtract `value`, rounding once, and return the previous value.
    pub fn fetch_sub(&self, value: BFloat16, order: Ordering) -> BFloat16 {
        self.fetch_apply(order, |current| current - value)
    }

    /// Store the NaN-ignoring maximum and return the previous value.
    pub fn fetch_max(&self, value: BFloat16, order: Ordering) -> BFloat16 {
        self.fetch_apply(order, |current| current.max(value))
    }

    /// Store the NaN-ignoring minimum and return the previous value.
    pub fn fetch_min(&self, value: BFloat16, order: Ordering) -> BFloat16 {
        self.fetch_apply(order, |current| current.min(value))
    }

    fn fetch_apply(&self, order: Ordering, mut f: impl FnMut(BFloat16) -> BFloat16) -> BFloat16 {
        // A failed exchange only reads, so its ordering drops the release half.
        let fetch_order = match order {
            Ordering::Release => Ordering::Relaxed,
            Ordering::AcqRel => Ordering::Acquire,
            other => other,
        };
        match self.fetch_update(order, fetch_order, |current| Some(f(current))) {
            Ok(previous) | Err(previous) => previous,
        }
    }

    pub fn into_inner(self) -> BFloat16 {
        from_atomic_bits(self.bits.into_inner())
    }

    pub fn get_mut(&mut self) -> &mut BFloat16 {
        // SAFETY: `BFloat16` is `repr(transparent)` over `u16`, and
        // `AtomicU16` has the same size and alignment as `u16`. The exclusive
        // borrow rules out concurrent access.
        unsafe { &mut *(self.bits.get_mut() as *mut u16 as *mut BFloat16) }
    }
}

impl Default for AtomicBFloat16 {
    fn default() -> Self {
        Self::new(BFloat16::ZERO)
    }
}

impl From<BFloat16> for AtomicBFloat16 {
    fn from(value: BFloat16) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for AtomicBFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.load(Ordering::Relaxed), f)
    }
}
