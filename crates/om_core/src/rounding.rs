//! Integer-first one-decimal percents with banker's rounding (half-to-even).
//!
//! - Pure integer math; no floats anywhere.
//! - Deterministic across OS/arch.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `round(100 * num / den, 1)` expressed in tenths of a percent.
/// Returns `None` when `den == 0`.
pub fn percent_one_decimal_tenths(num: u64, den: u64) -> Option<u64> {
    if den == 0 {
        return None;
    }
    let scaled = u128::from(num) * 1000;
    let den = u128::from(den);
    let q = scaled / den;
    let r = scaled % den;
    // Compare 2r vs den without overflow.
    let twice = r * 2;
    let rounded = if twice > den || (twice == den && q % 2 == 1) { q + 1 } else { q };
    Some(rounded as u64)
}

/// A percent held as tenths, e.g. `409` ⇒ `40.9`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Percent1dp(u64);

impl Percent1dp {
    pub fn from_ratio(num: u64, den: u64) -> Option<Self> {
        percent_one_decimal_tenths(num, den).map(Percent1dp)
    }

    #[inline]
    pub fn from_tenths(tenths: u64) -> Self { Percent1dp(tenths) }

    #[inline]
    pub fn tenths(self) -> u64 { self.0 }
}

impl fmt::Display for Percent1dp {
    /// `40.9`, no percent sign; renderers add their own suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn rounds_to_one_decimal() {
        // 92 / 225 = 40.888…%
        assert_eq!(Percent1dp::from_ratio(92, 225).unwrap().to_string(), "40.9");
        // 26 / 70 = 37.142…%
        assert_eq!(Percent1dp::from_ratio(26, 70).unwrap().to_string(), "37.1");
        assert_eq!(Percent1dp::from_ratio(1, 1).unwrap().to_string(), "100.0");
        assert_eq!(Percent1dp::from_ratio(0, 5).unwrap().to_string(), "0.0");
        assert!(Percent1dp::from_ratio(1, 0).is_none());
    }

    #[test]
    fn ties_go_to_even_tenth() {
        // 1/16 = 6.25% -> 6.2 ; 3/16 = 18.75% -> 18.8
        assert_eq!(percent_one_decimal_tenths(1, 16), Some(62));
        assert_eq!(percent_one_decimal_tenths(3, 16), Some(188));
    }
}
