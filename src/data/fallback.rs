//! Built-in sample rows used when no table could be loaded.

use chrono::Utc;

use crate::data::records::{CostVsWages, IncomeByRace, IncomeByState, IncomeByYear, IncomeTier};
use crate::data::snapshot::DataSnapshot;

use IncomeTier::{High, Low, Middle};

const INCOME_BY_YEAR: [(i32, IncomeTier, f64); 18] = [
    (1970, Low, 0.509),
    (1970, Middle, 0.475),
    (1970, High, 0.016),
    (1980, Low, 0.258),
    (1980, Middle, 0.431),
    (1980, High, 0.311),
    (1990, Low, 0.398),
    (1990, Middle, 0.52),
    (1990, High, 0.082),
    (2000, Low, 0.25),
    (2000, Middle, 0.566),
    (2000, High, 0.184),
    (2010, Low, 0.378),
    (2010, Middle, 0.461),
    (2010, High, 0.161),
    (2020, Low, 0.239),
    (2020, Middle, 0.522),
    (2020, High, 0.239),
];

const INCOME_BY_RACE: [(&str, i32, IncomeTier, f64); 24] = [
    ("White", 1970, Low, 0.338),
    ("White", 1970, Middle, 0.423),
    ("White", 1970, High, 0.239),
    ("White", 2020, Low, 0.214),
    ("White", 2020, Middle, 0.498),
    ("White", 2020, High, 0.288),
    ("Black", 1970, Low, 0.251),
    ("Black", 1970, Middle, 0.502),
    ("Black", 1970, High, 0.247),
    ("Black", 2020, Low, 0.237),
    ("Black", 2020, Middle, 0.426),
    ("Black", 2020, High, 0.337),
    ("Hispanic", 1970, Low, 0.456),
    ("Hispanic", 1970, Middle, 0.478),
    ("Hispanic", 1970, High, 0.066),
    ("Hispanic", 2020, Low, 0.389),
    ("Hispanic", 2020, Middle, 0.445),
    ("Hispanic", 2020, High, 0.166),
    ("Asian", 1970, Low, 0.234),
    ("Asian", 1970, Middle, 0.567),
    ("Asian", 1970, High, 0.199),
    ("Asian", 2020, Low, 0.189),
    ("Asian", 2020, Middle, 0.523),
    ("Asian", 2020, High, 0.288),
];

const COST_VS_WAGES: [(i32, f64, f64); 6] = [
    (1970, 103.7, 20171.4),
    (1980, 117.6, 23280.2),
    (1990, 151.7, 26237.0),
    (2000, 171.6, 32611.7),
    (2010, 195.8, 35690.8),
    (2020, 222.6, 39814.3),
];

const INCOME_BY_STATE: [(&str, IncomeTier, f64); 12] = [
    ("CA", Low, 0.31),
    ("CA", Middle, 0.462),
    ("CA", High, 0.228),
    ("TX", Low, 0.362),
    ("TX", Middle, 0.546),
    ("TX", High, 0.092),
    ("NY", Low, 0.305),
    ("NY", Middle, 0.577),
    ("NY", High, 0.117),
    ("FL", Low, 0.468),
    ("FL", Middle, 0.424),
    ("FL", High, 0.108),
];

/// Snapshot built from the sample rows. Households stay empty.
pub fn sample_snapshot() -> DataSnapshot {
    DataSnapshot {
        income_by_year: INCOME_BY_YEAR
            .iter()
            .map(|&(year, income_tier, percent_population)| IncomeByYear {
                year,
                income_tier,
                percent_population,
            })
            .collect(),
        income_by_race: INCOME_BY_RACE
            .iter()
            .map(|&(race, year, income_tier, percent_population)| IncomeByRace {
                race: race.to_string(),
                year,
                income_tier,
                percent_population,
            })
            .collect(),
        cost_vs_wages: COST_VS_WAGES
            .iter()
            .map(|&(year, cost_index, median_income)| CostVsWages {
                year,
                cost_index,
                median_income,
            })
            .collect(),
        income_by_state: INCOME_BY_STATE
            .iter()
            .map(|&(state, income_tier, percent_population)| IncomeByState {
                state: state.to_string(),
                income_tier,
                percent_population,
            })
            .collect(),
        households: Vec::new(),
        loaded_at: Utc::now(),
        used_fallback: true,
    }
}
