//! Pivot tables reshaping raw rows into the layouts the charts stack.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::records::{CostVsWages, IncomeByRace, IncomeByYear, IncomeTier, TierRow};

/// Percent (0-100) of the population in each tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TierShares {
    pub low: f64,
    pub middle: f64,
    pub high: f64,
}

impl TierShares {
    /// First row per tier wins; tiers without a row stay at zero
    pub fn from_rows<'a, R, I>(rows: I) -> Self
    where
        R: TierRow + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut shares = [None; 3];
        for row in rows {
            let slot = &mut shares[row.tier().index()];
            if slot.is_none() {
                *slot = Some(row.share() * 100.0);
            }
        }
        Self {
            low: shares[0].unwrap_or(0.0),
            middle: shares[1].unwrap_or(0.0),
            high: shares[2].unwrap_or(0.0),
        }
    }

    pub fn get(&self, tier: IncomeTier) -> f64 {
        match tier {
            IncomeTier::Low => self.low,
            IncomeTier::Middle => self.middle,
            IncomeTier::High => self.high,
        }
    }

    /// Lower and upper bound of each tier when stacked bottom to top
    pub fn stacked(&self) -> [(f64, f64); 3] {
        let mut base = 0.0;
        let mut layers = [(0.0, 0.0); 3];
        for tier in IncomeTier::ALL {
            let top = base + self.get(tier);
            layers[tier.index()] = (base, top);
            base = top;
        }
        layers
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearShares {
    pub year: i32,
    pub shares: TierShares,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceYearShares {
    pub race: String,
    pub year: i32,
    pub shares: TierShares,
}

/// One entry per distinct year, ascending
pub fn shares_by_year(rows: &[IncomeByYear]) -> Vec<YearShares> {
    let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();
    years
        .into_iter()
        .map(|year| YearShares {
            year,
            shares: TierShares::from_rows(rows.iter().filter(|r| r.year == year)),
        })
        .collect()
}

/// Every race and year combination, race-major, in the order given
pub fn race_comparison(rows: &[IncomeByRace], races: &[&str], years: &[i32]) -> Vec<RaceYearShares> {
    let mut out = Vec::with_capacity(races.len() * years.len());
    for &race in races {
        for &year in years {
            out.push(RaceYearShares {
                race: race.to_string(),
                year,
                shares: TierShares::from_rows(
                    rows.iter().filter(|r| r.race == race && r.year == year),
                ),
            });
        }
    }
    out
}

/// Distinct years recorded for one race, ascending
pub fn race_over_time(rows: &[IncomeByRace], race: &str) -> Vec<YearShares> {
    let years: BTreeSet<i32> = rows.iter().filter(|r| r.race == race).map(|r| r.year).collect();
    years
        .into_iter()
        .map(|year| YearShares {
            year,
            shares: TierShares::from_rows(rows.iter().filter(|r| r.race == race && r.year == year)),
        })
        .collect()
}

/// Cost rows ordered by year
pub fn cost_series(rows: &[CostVsWages]) -> Vec<CostVsWages> {
    let mut series = rows.to_vec();
    series.sort_by_key(|r| r.year);
    series
}
