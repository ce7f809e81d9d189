//! crates/om_report/src/variant.rs
//! The two dashboard presentations over one engine: settings + palette.

use std::fmt;
use std::str::FromStr;

use om_core::{MedalTable, MedalType, ParameterError, TopN, DEFAULT_MIN_MEDALS};
use om_pipeline::EngineOptions;
use serde::{Deserialize, Serialize};

/// Countries pre-selected for the trend view when present in the data.
pub const DEFAULT_SPOTLIGHT: [&str; 5] = ["United States", "China", "United Kingdom", "Germany", "Australia"];

pub const DEFAULT_TOP_N: usize = 10;
pub const HEATMAP_SIZE: usize = 20;
pub const SHARE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Dark GitHub palette; six charts plus raw data.
    #[default]
    Classic,
    /// Slate palette; adds share-of-total and gold conversion, drops zero-Bronze bubbles.
    Slate,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Slate => "slate",
        }
    }

    /// Inclusive slider bounds for top-N.
    pub fn top_n_bounds(self) -> (usize, usize) {
        match self {
            Variant::Classic => (5, 30),
            Variant::Slate => (5, 25),
        }
    }

    pub fn default_top_n(self) -> usize {
        DEFAULT_TOP_N
    }

    pub fn default_medal_type(self) -> MedalType {
        MedalType::Medals
    }

    /// Validate a requested top-N against this variant's slider.
    pub fn top_n(self, n: usize) -> Result<TopN, ParameterError> {
        let (min, max) = self.top_n_bounds();
        TopN::new(n)?.within(min, max)
    }

    /// `DEFAULT_SPOTLIGHT` filtered to countries present in `table`, in that order.
    pub fn default_spotlight(self, table: &MedalTable) -> Vec<String> {
        let present = table.countries();
        DEFAULT_SPOTLIGHT.iter().filter(|c| present.contains(**c)).map(|c| c.to_string()).collect()
    }

    pub fn engine_options(self, min_medals: Option<u64>) -> EngineOptions {
        let slate = self == Variant::Slate;
        EngineOptions {
            min_medals: min_medals.unwrap_or(DEFAULT_MIN_MEDALS),
            scatter_excludes_zero_bronzes: slate,
            heatmap_size: HEATMAP_SIZE,
            share_size: SHARE_SIZE,
            include_share_of_total: slate,
            include_gold_conversion: slate,
        }
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            Variant::Classic => &CLASSIC,
            Variant::Slate => &SLATE,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "slate" => Ok(Variant::Slate),
            other => Err(format!("unknown variant '{other}' (expected classic|slate)")),
        }
    }
}

/* ---------------------------------- Theme ---------------------------------- */

/// CSS colors for one presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub gold: &'static str,
    pub silver: &'static str,
    pub bronze: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub card: &'static str,
    pub sidebar: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub grid: &'static str,
}

pub const CLASSIC: Theme = Theme {
    gold: "#FFD700",
    silver: "#C0C0C0",
    bronze: "#CD7F32",
    accent: "#58a6ff",
    background: "#0d1117",
    card: "#21262d",
    sidebar: "#161b22",
    text: "#f0f6fc",
    muted: "#8b949e",
    grid: "#30363d",
};

pub const SLATE: Theme = Theme {
    gold: "#FBBF24",
    silver: "#94A3B8",
    bronze: "#D97706",
    accent: "#38BDF8",
    background: "#0f172a",
    card: "#1e293b",
    sidebar: "#1e293b",
    text: "#f8fafc",
    muted: "#94a3b8",
    grid: "#334155",
};
