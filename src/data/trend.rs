use serde::Serialize;

use crate::data::records::{IncomeByYear, IncomeTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increased,
    Decreased,
}

/// How one tier's share moved across the whole series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub tier: IncomeTier,
    pub start_year: i32,
    pub start_percent: f64,
    pub end_year: i32,
    pub end_percent: f64,
    /// End minus start, in percentage points
    pub change: f64,
    pub direction: Direction,
    /// |change / start| as a percentage; absent when the start share is zero
    pub relative_change: Option<f64>,
    pub peak_year: i32,
    pub peak_percent: f64,
    pub lowest_year: i32,
    pub lowest_percent: f64,
}

/// Summarise a tier of the income-by-year table; `None` when the tier has no rows
pub fn trend_summary(rows: &[IncomeByYear], tier: IncomeTier) -> Option<TrendSummary> {
    let mut series: Vec<(i32, f64)> = rows
        .iter()
        .filter(|r| r.income_tier == tier)
        .map(|r| (r.year, r.percent_population * 100.0))
        .collect();
    series.sort_by_key(|&(year, _)| year);

    let &(start_year, start_percent) = series.first()?;
    let &(end_year, end_percent) = series.last()?;
    let change = end_percent - start_percent;

    // first occurrence wins on ties
    let mut peak = series[0];
    let mut lowest = series[0];
    for &point in &series[1..] {
        if point.1 > peak.1 {
            peak = point;
        }
        if point.1 < lowest.1 {
            lowest = point;
        }
    }

    Some(TrendSummary {
        tier,
        start_year,
        start_percent,
        end_year,
        end_percent,
        change,
        direction: if change > 0.0 { Direction::Increased } else { Direction::Decreased },
        relative_change: if start_percent != 0.0 {
            Some((change / start_percent * 100.0).abs())
        } else {
            None
        },
        peak_year: peak.0,
        peak_percent: peak.1,
        lowest_year: lowest.0,
        lowest_percent: lowest.1,
    })
}

impl TrendSummary {
    /// Plain-text report of the trend
    pub fn report(&self) -> String {
        let direction = match self.direction {
            Direction::Increased => "increased",
            Direction::Decreased => "decreased",
        };
        let mut text = format!(
            "{} Tier Detailed Analysis:\n\n\
             {}: {:.1}%\n\
             {}: {:.1}%\n\
             Peak: {:.1}% in {}\n\
             Lowest: {:.1}% in {}\n\
             Net Change: {:.1}% {}",
            self.tier,
            self.start_year,
            self.start_percent,
            self.end_year,
            self.end_percent,
            self.peak_percent,
            self.peak_year,
            self.lowest_percent,
            self.lowest_year,
            self.change.abs(),
            direction,
        );
        if let Some(relative) = self.relative_change {
            text.push_str(&format!(
                "\n\nThis represents a {:.1}% relative change over {} years.",
                relative,
                self.end_year - self.start_year
            ));
        }
        text
    }
}
