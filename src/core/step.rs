use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::core::error::StoryError;
use crate::data::records::Race;

/// Sentinel selector value comparing every race
pub const ALL_RACES: &str = "All";

/// Current value of the race selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RaceSelection {
    #[default]
    All,
    Race(Race),
}

impl Display for RaceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceSelection::All => f.write_str(ALL_RACES),
            RaceSelection::Race(race) => f.write_str(race.as_str()),
        }
    }
}

impl FromStr for RaceSelection {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_RACES {
            Ok(RaceSelection::All)
        } else {
            s.parse::<Race>().map(RaceSelection::Race)
        }
    }
}

impl Serialize for RaceSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A narrative scene the chart canvas can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "race", rename_all = "snake_case")]
pub enum Scene {
    /// Empty canvas with no title
    Cleared,
    /// Stacked tier areas across every year
    IncomeOverTime,
    /// Tier bars per race, or one race over time
    RaceComparison(RaceSelection),
    /// Median income against cost of living on two axes
    Divergence,
}

impl Scene {
    /// The race selector is only shown while races are compared
    pub fn selector_visible(&self) -> bool {
        matches!(self, Scene::RaceComparison(_))
    }

    /// Short name used for metric labels and logs
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Cleared => "cleared",
            Scene::IncomeOverTime => "income_over_time",
            Scene::RaceComparison(_) => "race_comparison",
            Scene::Divergence => "divergence",
        }
    }
}

/// Map a step to its scene. Unknown steps clear the canvas.
pub fn dispatch(step: i64, race: RaceSelection) -> Scene {
    match step {
        1 => Scene::IncomeOverTime,
        2 => Scene::RaceComparison(race),
        3 => Scene::Divergence,
        _ => Scene::Cleared,
    }
}

/// Parse a marker's step attribute the way `parseInt(value, 10)` does:
/// leading whitespace, an optional sign, then as many digits as present.
pub fn parse_step_attr(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
