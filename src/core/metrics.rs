use log::debug;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::core::error::StoryError;
use crate::core::step::Scene;
use crate::data::snapshot::DataSnapshot;

/// Prometheus metrics for the story service
#[derive(Clone)]
pub struct StoryMetrics {
    registry: Registry,
    /// Steps that changed the active scene
    pub step_changes: IntCounter,
    /// Frames drawn, by scene
    pub renders: IntCounterVec,
    /// Frames served from the render cache
    pub cache_hits: IntCounter,
    /// Scenes that failed to draw
    pub render_failures: IntCounter,
    /// Rows loaded, by table
    pub table_rows: IntGaugeVec,
    /// Viewer sessions currently held
    pub active_sessions: IntGauge,
}

impl StoryMetrics {
    pub fn new() -> Result<Self, StoryError> {
        let registry = Registry::new_custom(Some("income_story".to_string()), None)?;

        let step_changes = IntCounter::new("step_changes_total", "Steps that changed the active scene")?;
        let renders = IntCounterVec::new(Opts::new("renders_total", "Frames drawn by scene"), &["scene"])?;
        let cache_hits = IntCounter::new("render_cache_hits_total", "Frames served from the render cache")?;
        let render_failures = IntCounter::new("render_failures_total", "Scenes that failed to draw")?;
        let table_rows = IntGaugeVec::new(Opts::new("table_rows", "Rows loaded per table"), &["table"])?;
        let active_sessions = IntGauge::new("active_sessions", "Viewer sessions currently held")?;

        registry.register(Box::new(step_changes.clone()))?;
        registry.register(Box::new(renders.clone()))?;
        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(render_failures.clone()))?;
        registry.register(Box::new(table_rows.clone()))?;
        registry.register(Box::new(active_sessions.clone()))?;

        Ok(Self {
            registry,
            step_changes,
            renders,
            cache_hits,
            render_failures,
            table_rows,
            active_sessions,
        })
    }

    pub fn record_render(&self, scene: Scene) {
        self.renders.with_label_values(&[scene.name()]).inc();
    }

    /// Publish the row count of every table in `snapshot`
    pub fn record_tables(&self, snapshot: &DataSnapshot) {
        for count in snapshot.table_counts() {
            debug!("Table {} has {} rows", count.table, count.rows);
            self.table_rows
                .with_label_values(&[count.table.name()])
                .set(count.rows as i64);
        }
    }

    /// Text exposition of every registered metric
    pub fn encode(&self) -> Result<String, StoryError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| StoryError::MetricsError(e.to_string()))
    }
}
