// src/status.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// IEEE 754 exception flags raised while rounding a value into `BFloat16`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Status: u8 {
        /// The result differs from the exact value.
        const INEXACT = 1 << 0;
        /// The exact result was tiny (below the normal range) and inexact.
        const UNDERFLOW = 1 << 1;
        /// The rounded result exceeded the finite range and became infinite.
        const OVERFLOW = 1 << 2;
        /// A signaling NaN was consumed.
        const INVALID = 1 << 3;
    }
}

impl Status {
    /// True when the conversion lost no information.
    #[inline]
    pub fn is_exact(self) -> bool {
        !self.contains(Status::INEXACT)
    }
}
