use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::StoryError;

/// Ordinal income category.
///
/// Parsed case-insensitively everywhere: CSV cells, JSON and URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IncomeTier {
    Low,
    Middle,
    High,
}

impl IncomeTier {
    /// Tiers in stacking order, bottom to top
    pub const ALL: [IncomeTier; 3] = [IncomeTier::Low, IncomeTier::Middle, IncomeTier::High];

    /// Label shown in legends and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            IncomeTier::Low => "Lower Class",
            IncomeTier::Middle => "Middle Class",
            IncomeTier::High => "Upper Class",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            IncomeTier::Low => 0,
            IncomeTier::Middle => 1,
            IncomeTier::High => 2,
        }
    }
}

impl Display for IncomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncomeTier::Low => write!(f, "Low"),
            IncomeTier::Middle => write!(f, "Middle"),
            IncomeTier::High => write!(f, "High"),
        }
    }
}

impl FromStr for IncomeTier {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(IncomeTier::Low),
            "middle" => Ok(IncomeTier::Middle),
            "high" => Ok(IncomeTier::High),
            _ => Err(StoryError::ValidationError(format!("Unknown income tier: {}", s))),
        }
    }
}

impl<'de> Deserialize<'de> for IncomeTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The fixed set of races offered by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    White,
    Black,
    Hispanic,
    Asian,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::White, Race::Black, Race::Hispanic, Race::Asian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Race::White => "White",
            Race::Black => "Black",
            Race::Hispanic => "Hispanic",
            Race::Asian => "Asian",
        }
    }
}

impl Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Race {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Race::ALL
            .iter()
            .copied()
            .find(|race| race.as_str() == s)
            .ok_or_else(|| StoryError::ValidationError(format!("Unknown race: {}", s)))
    }
}

/// Tier share of the population for a single year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeByYear {
    pub year: i32,
    pub income_tier: IncomeTier,
    pub percent_population: f64,
}

/// Tier share of a race's population for a single year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeByRace {
    pub race: String,
    pub year: i32,
    pub income_tier: IncomeTier,
    pub percent_population: f64,
}

/// Cost of living index against median income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostVsWages {
    pub year: i32,
    pub cost_index: f64,
    pub median_income: f64,
}

/// Tier share of a state's population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeByState {
    pub state: String,
    pub income_tier: IncomeTier,
    pub percent_population: f64,
}

/// Individual household observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub household_id: u32,
    pub year: i32,
    pub state: String,
    pub race: String,
    pub household_income: f64,
    pub income_class: String,
    pub cost_of_living_index: f64,
}

/// Rows that carry a tier share
pub trait TierRow {
    fn tier(&self) -> IncomeTier;
    fn share(&self) -> f64;
}

impl TierRow for IncomeByYear {
    fn tier(&self) -> IncomeTier {
        self.income_tier
    }
    fn share(&self) -> f64 {
        self.percent_population
    }
}

impl TierRow for IncomeByRace {
    fn tier(&self) -> IncomeTier {
        self.income_tier
    }
    fn share(&self) -> f64 {
        self.percent_population
    }
}

impl TierRow for IncomeByState {
    fn tier(&self) -> IncomeTier {
        self.income_tier
    }
    fn share(&self) -> f64 {
        self.percent_population
    }
}

/// The five source tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    IncomeByYear,
    IncomeByRace,
    CostVsWages,
    IncomeByState,
    Household,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::IncomeByYear,
        TableKind::IncomeByRace,
        TableKind::CostVsWages,
        TableKind::IncomeByState,
        TableKind::Household,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::IncomeByYear => "income_distribution.csv",
            TableKind::IncomeByRace => "race_income_distribution.csv",
            TableKind::CostVsWages => "cost_vs_wages.csv",
            TableKind::IncomeByState => "state_income_distribution.csv",
            TableKind::Household => "household_data.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::IncomeByYear => "income_by_year",
            TableKind::IncomeByRace => "income_by_race",
            TableKind::CostVsWages => "cost_vs_wages",
            TableKind::IncomeByState => "income_by_state",
            TableKind::Household => "household",
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
