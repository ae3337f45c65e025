use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::data::records::{TableKind, TierRow};
use crate::data::snapshot::DataSnapshot;

/// A grouping whose tier shares do not add up to one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSumIssue {
    pub table: TableKind,
    pub group: String,
    pub sum: f64,
}

fn audit_groups<'a, R, F>(
    table: TableKind,
    rows: &'a [R],
    key: F,
    tolerance: f64,
    issues: &mut Vec<TierSumIssue>,
) where
    R: TierRow,
    F: Fn(&'a R) -> String,
{
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        *sums.entry(key(row)).or_insert(0.0) += row.share();
    }
    for (group, sum) in sums {
        if (sum - 1.0).abs() > tolerance {
            issues.push(TierSumIssue { table, group, sum });
        }
    }
}

/// Report groupings whose shares deviate from 1 by more than `tolerance`.
///
/// Nothing is rejected; the source data is rendered as-is.
pub fn audit_tier_sums(snapshot: &DataSnapshot, tolerance: f64) -> Vec<TierSumIssue> {
    let mut issues = Vec::new();
    audit_groups(
        TableKind::IncomeByYear,
        &snapshot.income_by_year,
        |r| r.year.to_string(),
        tolerance,
        &mut issues,
    );
    audit_groups(
        TableKind::IncomeByRace,
        &snapshot.income_by_race,
        |r| format!("{} {}", r.race, r.year),
        tolerance,
        &mut issues,
    );
    audit_groups(
        TableKind::IncomeByState,
        &snapshot.income_by_state,
        |r| r.state.clone(),
        tolerance,
        &mut issues,
    );
    issues
}

/// Log every audit finding at warn level
pub fn log_issues(issues: &[TierSumIssue]) {
    for issue in issues {
        warn!(
            "Tier shares for {} {} sum to {:.3}",
            issue.table, issue.group, issue.sum
        );
    }
}
