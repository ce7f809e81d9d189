//! Filter parameters and their validated domains.
//!
//! Every query is built from immutable `FilterParams`. Malformed inputs
//! (inverted year range, zero top-N, years outside the data) fail fast here
//! with `ParameterError`, so the aggregation views themselves stay total.

use alloc::collections::BTreeSet;
use alloc::string::String;
use core::fmt;
use core::num::NonZeroUsize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::records::MedalType;

/// Minimum total medals for the gold-conversion view.
pub const DEFAULT_MIN_MEDALS: u64 = 20;

/* ------------------------------------ Errors ------------------------------------ */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterError {
    InvertedYearRange { min: i32, max: i32 },
    ZeroTopN,
    YearNotInDomain(i32),
    EmptyYearDomain,
    TopNOutOfBounds { n: usize, min: usize, max: usize },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::InvertedYearRange { min, max } => {
                write!(f, "year range is inverted: {min} > {max}")
            }
            ParameterError::ZeroTopN => write!(f, "top-N must be a positive integer"),
            ParameterError::YearNotInDomain(y) => write!(f, "year {y} is not present in the data"),
            ParameterError::EmptyYearDomain => write!(f, "the table has no years to filter on"),
            ParameterError::TopNOutOfBounds { n, min, max } => {
                write!(f, "top-N {n} outside allowed range {min}..={max}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParameterError {}

/* ----------------------------------- YearRange ----------------------------------- */

/// Inclusive `[min, max]`; invariant `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, ParameterError> {
        if min > max {
            return Err(ParameterError::InvertedYearRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Whole span of a year domain (first..=last).
    pub fn spanning(years: &BTreeSet<i32>) -> Result<Self, ParameterError> {
        match (years.first(), years.last()) {
            (Some(&lo), Some(&hi)) => Ok(Self { min: lo, max: hi }),
            _ => Err(ParameterError::EmptyYearDomain),
        }
    }

    #[inline]
    pub fn min(&self) -> i32 { self.min }
    #[inline]
    pub fn max(&self) -> i32 { self.max }

    #[inline]
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/* ------------------------------------- TopN ------------------------------------- */

/// Positive ranking bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopN(NonZeroUsize);

impl TopN {
    pub fn new(n: usize) -> Result<Self, ParameterError> {
        NonZeroUsize::new(n).map(TopN).ok_or(ParameterError::ZeroTopN)
    }

    #[inline]
    pub fn get(self) -> usize { self.0.get() }

    /// Slider-style bounds check (`min..=max`).
    pub fn within(self, min: usize, max: usize) -> Result<Self, ParameterError> {
        let n = self.get();
        if n < min || n > max {
            return Err(ParameterError::TopNOutOfBounds { n, min, max });
        }
        Ok(self)
    }
}

/* ---------------------------------- FilterParams ---------------------------------- */

/// One user interaction's worth of filters. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterParams {
    year_range: YearRange,
    top_n: TopN,
    spotlight: BTreeSet<String>,
    medal_type: MedalType,
}

impl FilterParams {
    pub fn new<I, S>(year_range: YearRange, top_n: TopN, spotlight: I, medal_type: MedalType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            year_range,
            top_n,
            spotlight: spotlight.into_iter().map(Into::into).collect(),
            medal_type,
        }
    }

    #[inline]
    pub fn year_range(&self) -> YearRange { self.year_range }
    #[inline]
    pub fn top_n(&self) -> TopN { self.top_n }
    #[inline]
    pub fn spotlight(&self) -> &BTreeSet<String> { &self.spotlight }
    #[inline]
    pub fn medal_type(&self) -> MedalType { self.medal_type }

    /// Both range bounds must be years that occur in the data.
    pub fn check_year_domain(&self, years: &BTreeSet<i32>) -> Result<(), ParameterError> {
        if years.is_empty() {
            return Err(ParameterError::EmptyYearDomain);
        }
        for y in [self.year_range.min, self.year_range.max] {
            if !years.contains(&y) {
                return Err(ParameterError::YearNotInDomain(y));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn year_range_rejects_inversion() {
        assert_eq!(
            YearRange::new(2016, 2012),
            Err(ParameterError::InvertedYearRange { min: 2016, max: 2012 })
        );
        let r = YearRange::new(2012, 2016).unwrap();
        assert!(r.contains(2012) && r.contains(2016) && !r.contains(2020));
    }

    #[test]
    fn top_n_must_be_positive_and_in_bounds() {
        assert_eq!(TopN::new(0), Err(ParameterError::ZeroTopN));
        let n = TopN::new(35).unwrap();
        assert!(n.within(5, 30).is_err());
        assert_eq!(TopN::new(10).unwrap().within(5, 30).unwrap().get(), 10);
    }

    #[test]
    fn year_domain_check() {
        let years: BTreeSet<i32> = [2008, 2012, 2016].into_iter().collect();
        let ok = FilterParams::new(
            YearRange::new(2008, 2016).unwrap(),
            TopN::new(3).unwrap(),
            Vec::<String>::new(),
            MedalType::Medals,
        );
        assert!(ok.check_year_domain(&years).is_ok());

        let bad = FilterParams::new(
            YearRange::new(2008, 2014).unwrap(),
            TopN::new(3).unwrap(),
            ["USA"],
            MedalType::Golds,
        );
        assert_eq!(bad.check_year_domain(&years), Err(ParameterError::YearNotInDomain(2014)));
        assert!(bad.spotlight().contains("USA"));
    }

    #[test]
    fn spanning_uses_first_and_last_year() {
        let years: BTreeSet<i32> = [1896, 1900, 2016].into_iter().collect();
        let r = YearRange::spanning(&years).unwrap();
        assert_eq!((r.min(), r.max()), (1896, 2016));
        assert_eq!(YearRange::spanning(&BTreeSet::new()), Err(ParameterError::EmptyYearDomain));
    }
}
