use chrono::Utc;
use csv::{ReaderBuilder, Trim};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;

use crate::core::error::StoryError;
use crate::data::fallback;
use crate::data::records::TableKind;
use crate::data::snapshot::DataSnapshot;
use crate::data::source::{DirectorySource, TableSource};

/// Parse CSV text into typed rows.
///
/// Header errors fail the table; rows that do not fit the record type are skipped.
pub fn parse_table<T: DeserializeOwned>(table: TableKind, text: &str) -> Result<Vec<T>, StoryError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    reader.headers()?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (index, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                // +2: one for the header, one for 1-based line numbers
                debug!("Skipping {} line {}: {}", table, index + 2, e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed rows in {}", skipped, table.file_name());
    }
    Ok(rows)
}

/// Fetch and parse one table; any failure leaves the table empty
async fn load_table<T>(source: &dyn TableSource, table: TableKind) -> Vec<T>
where
    T: DeserializeOwned + Send,
{
    let result = match source.fetch(table).await {
        Ok(text) => parse_table::<T>(table, &text),
        Err(e) => Err(e),
    };

    match result {
        Ok(rows) => {
            info!("{} loaded: {} records", table.file_name(), rows.len());
            rows
        }
        Err(e) => {
            error!("Failed to load {}: {}", table.file_name(), e);
            Vec::new()
        }
    }
}

/// Load all five tables concurrently.
///
/// When every table comes back empty the sample rows replace them wholesale.
pub async fn load_snapshot(source: &dyn TableSource) -> DataSnapshot {
    info!("Loading tables from {}", source.describe());

    let (income_by_year, income_by_race, cost_vs_wages, income_by_state, households) = futures::join!(
        load_table(source, TableKind::IncomeByYear),
        load_table(source, TableKind::IncomeByRace),
        load_table(source, TableKind::CostVsWages),
        load_table(source, TableKind::IncomeByState),
        load_table(source, TableKind::Household)
    );

    let snapshot = DataSnapshot {
        income_by_year,
        income_by_race,
        cost_vs_wages,
        income_by_state,
        households,
        loaded_at: Utc::now(),
        used_fallback: false,
    };

    if snapshot.is_empty() {
        warn!("No table could be loaded, using sample data");
        return fallback::sample_snapshot();
    }

    info!(
        "Data loaded: income={} race={} cost_wages={} state={} household={}",
        snapshot.income_by_year.len(),
        snapshot.income_by_race.len(),
        snapshot.cost_vs_wages.len(),
        snapshot.income_by_state.len(),
        snapshot.households.len(),
    );
    snapshot
}

/// Open the configured data directory and load every table
pub async fn bootstrap(data_dir: &std::path::Path) -> Result<DataSnapshot, StoryError> {
    let source = DirectorySource::open(data_dir)?;
    Ok(load_snapshot(&source).await)
}
