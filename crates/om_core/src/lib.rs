//! om_core: Core types, filter domains, ordering helpers, and one-decimal percents.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! board (`om_io`, `om_pipeline`, `om_report`, `om_cli`).
//!
//! - Canonical rows: `MedalRecord`, `MedalTable`, `MedalType`, `MedalCounts`
//! - Filter domains: `YearRange`, `TopN`, `FilterParams` (+ `ParameterError`)
//! - Source digest newtype: `SourceDigest`
//! - Integer-first one-decimal percents
//! - Stable (grouping-order preserving) top-N selection
//!
//! Serialization derives are gated behind `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod determinism;
pub mod params;
pub mod records;
pub mod rounding;

pub use params::{FilterParams, ParameterError, TopN, YearRange, DEFAULT_MIN_MEDALS};
pub use records::{MedalCounts, MedalRecord, MedalTable, MedalType};
pub use rounding::Percent1dp;

pub mod errors {
    use alloc::string::String;
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidHex,
        UnknownMedalType(String),
        PlaceholderCountry(String),
        DuplicateKey { country: String, year: i32 },
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidHex => write!(f, "invalid hex"),
                CoreError::UnknownMedalType(s) => {
                    write!(f, "unknown medal type '{s}' (expected Golds|Silvers|Bronzes|Medals)")
                }
                CoreError::PlaceholderCountry(s) => write!(f, "placeholder country '{s}'"),
                CoreError::DuplicateKey { country, year } => {
                    write!(f, "duplicate row for ({country}, {year})")
                }
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids {
    //! Digest newtype for the loaded source file.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    fn is_lower_hex_len(s: &str, n: usize) -> bool {
        s.len() == n && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// 64-hex lowercase SHA-256 of the raw source bytes.
    #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
    pub struct SourceDigest(String);

    impl SourceDigest {
        pub fn as_str(&self) -> &str { &self.0 }

        /// First 12 hex chars, for log lines.
        pub fn short(&self) -> &str { &self.0[..12] }
    }

    impl fmt::Display for SourceDigest {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl FromStr for SourceDigest {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            if is_lower_hex_len(s, 64) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidHex) }
        }
    }

    impl TryFrom<String> for SourceDigest {
        type Error = CoreError;
        fn try_from(s: String) -> Result<Self, Self::Error> {
            if is_lower_hex_len(&s, 64) { Ok(Self(s)) } else { Err(CoreError::InvalidHex) }
        }
    }

    impl From<SourceDigest> for String {
        fn from(d: SourceDigest) -> Self { d.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::ids::SourceDigest;
    use core::str::FromStr;

    #[test]
    fn source_digest_requires_lower_hex64() {
        let ok = "a".repeat(64);
        let d = SourceDigest::from_str(&ok).unwrap();
        assert_eq!(d.short(), "aaaaaaaaaaaa");
        assert!(SourceDigest::from_str(&"A".repeat(64)).is_err());
        assert!(SourceDigest::from_str("abc").is_err());
    }
}
