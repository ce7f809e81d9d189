//! Canonical medal rows and the in-memory table.
//!
//! A `MedalTable` only ever holds rows that passed cleaning: trimmed,
//! non-placeholder `country`, integer `year`, required `medals`, and a unique
//! `(country, year)` key. The loader in `om_io` is the usual way in; tests and
//! embedders can go through `MedalTable::new`, which re-checks the invariants.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Country spellings that stand for "no value" in the source file (compared lowercase).
pub const PLACEHOLDER_COUNTRIES: [&str; 4] = ["nan", "none", "", "n/a"];

/// True when a trimmed country name is one of the placeholder spellings.
pub fn is_placeholder_country(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    PLACEHOLDER_COUNTRIES.iter().any(|p| *p == lower)
}

/* ---------------------------------- MedalType ---------------------------------- */

/// Column selector for rank-based views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MedalType {
    Golds,
    Silvers,
    Bronzes,
    Medals,
}

impl MedalType {
    /// Source column header.
    pub fn column(self) -> &'static str {
        match self {
            MedalType::Golds => "Golds",
            MedalType::Silvers => "Silvers",
            MedalType::Bronzes => "Bronzes",
            MedalType::Medals => "Medals",
        }
    }
}

impl Default for MedalType {
    fn default() -> Self {
        MedalType::Medals
    }
}

impl fmt::Display for MedalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for MedalType {
    type Err = CoreError;

    /// Accepts the column name or its singular form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "golds" | "gold" => Ok(MedalType::Golds),
            "silvers" | "silver" => Ok(MedalType::Silvers),
            "bronzes" | "bronze" => Ok(MedalType::Bronzes),
            "medals" | "medal" | "total" => Ok(MedalType::Medals),
            _ => Err(CoreError::UnknownMedalType(s.to_string())),
        }
    }
}

/* --------------------------------- MedalCounts --------------------------------- */

/// Summed counts for one group (country, year, decade...). `u64` so sums never overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedalCounts {
    pub golds: u64,
    pub silvers: u64,
    pub bronzes: u64,
    pub medals: u64,
}

impl MedalCounts {
    #[inline]
    pub fn get(&self, t: MedalType) -> u64 {
        match t {
            MedalType::Golds => self.golds,
            MedalType::Silvers => self.silvers,
            MedalType::Bronzes => self.bronzes,
            MedalType::Medals => self.medals,
        }
    }

    #[inline]
    pub fn add(&mut self, rec: &MedalRecord) {
        self.golds += u64::from(rec.golds);
        self.silvers += u64::from(rec.silvers);
        self.bronzes += u64::from(rec.bronzes);
        self.medals += u64::from(rec.medals);
    }
}

/* --------------------------------- MedalRecord --------------------------------- */

/// One row of the canonical table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedalRecord {
    pub country: String,
    pub year: i32,
    /// Per-year rank; absent when the source cell was empty or non-numeric.
    pub rank: Option<u32>,
    pub golds: u32,
    pub silvers: u32,
    pub bronzes: u32,
    pub medals: u32,
}

impl MedalRecord {
    #[inline]
    pub fn count(&self, t: MedalType) -> u64 {
        u64::from(match t {
            MedalType::Golds => self.golds,
            MedalType::Silvers => self.silvers,
            MedalType::Bronzes => self.bronzes,
            MedalType::Medals => self.medals,
        })
    }

    /// floor(year / 10) * 10
    #[inline]
    pub fn decade(&self) -> i32 {
        self.year.div_euclid(10) * 10
    }

    /// `medals == golds + silvers + bronzes`
    pub fn is_consistent(&self) -> bool {
        u64::from(self.golds) + u64::from(self.silvers) + u64::from(self.bronzes)
            == u64::from(self.medals)
    }
}

/* ---------------------------------- MedalTable ---------------------------------- */

/// Canonical, read-only table. Row order is the source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MedalTable {
    rows: Vec<MedalRecord>,
}

impl MedalTable {
    /// Build a table, re-checking the canonical invariants.
    pub fn new(rows: Vec<MedalRecord>) -> Result<Self, CoreError> {
        let mut seen: BTreeSet<(&str, i32)> = BTreeSet::new();
        for r in &rows {
            if r.country != r.country.trim() || is_placeholder_country(&r.country) {
                return Err(CoreError::PlaceholderCountry(r.country.clone()));
            }
            if !seen.insert((r.country.as_str(), r.year)) {
                return Err(CoreError::DuplicateKey { country: r.country.clone(), year: r.year });
            }
        }
        Ok(Self { rows })
    }

    /// Subset constructor for derived tables; rows come from an already valid table.
    pub(crate) fn from_valid_rows(rows: Vec<MedalRecord>) -> Self {
        Self { rows }
    }

    /// Keep rows matching `pred`, preserving order.
    pub fn retain_rows<F: FnMut(&MedalRecord) -> bool>(&self, mut pred: F) -> MedalTable {
        MedalTable::from_valid_rows(self.rows.iter().filter(|r| pred(r)).cloned().collect())
    }

    #[inline]
    pub fn rows(&self) -> &[MedalRecord] { &self.rows }
    #[inline]
    pub fn len(&self) -> usize { self.rows.len() }
    #[inline]
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MedalRecord> { self.rows.iter() }

    /// Distinct years, ascending.
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    /// Distinct countries, ascending.
    pub fn countries(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }

    /// (min, max) year, or None for an empty table.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    pub fn total(&self, t: MedalType) -> u64 {
        self.rows.iter().map(|r| r.count(t)).sum()
    }

    /// Per-country sums, keyed in ascending country order (the grouping order).
    pub fn totals_by_country(&self) -> BTreeMap<&str, MedalCounts> {
        let mut out: BTreeMap<&str, MedalCounts> = BTreeMap::new();
        for r in &self.rows {
            out.entry(r.country.as_str()).or_default().add(r);
        }
        out
    }
}

impl<'a> IntoIterator for &'a MedalTable {
    type Item = &'a MedalRecord;
    type IntoIter = core::slice::Iter<'a, MedalRecord>;
    fn into_iter(self) -> Self::IntoIter { self.rows.iter() }
}
