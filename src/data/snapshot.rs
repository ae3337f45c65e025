use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::records::{
    CostVsWages, Household, IncomeByRace, IncomeByState, IncomeByYear, TableKind,
};

/// Immutable view of every loaded table
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    pub income_by_year: Vec<IncomeByYear>,
    pub income_by_race: Vec<IncomeByRace>,
    pub cost_vs_wages: Vec<CostVsWages>,
    pub income_by_state: Vec<IncomeByState>,
    pub households: Vec<Household>,
    /// When loading finished
    pub loaded_at: DateTime<Utc>,
    /// Whether the built-in sample rows replaced the source tables
    pub used_fallback: bool,
}

/// Row count for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCount {
    pub table: TableKind,
    pub file: &'static str,
    pub rows: usize,
}

impl DataSnapshot {
    pub fn empty() -> Self {
        Self {
            income_by_year: Vec::new(),
            income_by_race: Vec::new(),
            cost_vs_wages: Vec::new(),
            income_by_state: Vec::new(),
            households: Vec::new(),
            loaded_at: Utc::now(),
            used_fallback: false,
        }
    }

    pub fn rows(&self, table: TableKind) -> usize {
        match table {
            TableKind::IncomeByYear => self.income_by_year.len(),
            TableKind::IncomeByRace => self.income_by_race.len(),
            TableKind::CostVsWages => self.cost_vs_wages.len(),
            TableKind::IncomeByState => self.income_by_state.len(),
            TableKind::Household => self.households.len(),
        }
    }

    pub fn table_counts(&self) -> Vec<TableCount> {
        TableKind::ALL
            .iter()
            .map(|&table| TableCount {
                table,
                file: table.file_name(),
                rows: self.rows(table),
            })
            .collect()
    }

    /// True when every table is empty
    pub fn is_empty(&self) -> bool {
        TableKind::ALL.iter().all(|&table| self.rows(table) == 0)
    }
}

/// Lifecycle of the story data
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<DataSnapshot>),
    Failed(String),
}

/// Serializable phase of [`LoadState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Loaded(_) => LoadPhase::Loaded,
            LoadState::Failed(_) => LoadPhase::Failed,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<DataSnapshot>> {
        match self {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
