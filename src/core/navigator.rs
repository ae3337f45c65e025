//! The story navigator: a single consumer applying story events in order.
//!
//! Every event is sent over one bounded queue and answered over a oneshot
//! channel, so renders never overlap and each caller sees the state its own
//! event produced.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, error, info, warn};
use lru::LruCache;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::config::ChartConfig;
use crate::core::error::StoryError;
use crate::core::metrics::StoryMetrics;
use crate::core::step::{dispatch, parse_step_attr, RaceSelection, Scene};
use crate::core::tooltip::TooltipState;
use crate::data::snapshot::{DataSnapshot, LoadPhase, LoadState};
use crate::render::{self, ChartFrame};

/// Something that happened on the page or in the loader
#[derive(Debug, Clone)]
pub enum StoryEvent {
    /// A step marker crossed the centre of the viewport
    StepEntered { raw_step: String, marker: Option<usize> },
    RaceSelected(RaceSelection),
    /// Pointer position in chart pixels
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    DataLoaded(LoadState),
    /// Read the state without changing it
    Inspect,
}

/// Snapshot of the navigator after an event
#[derive(Debug, Clone, Serialize)]
pub struct StoryState {
    pub step: i64,
    pub active_marker: Option<usize>,
    pub race: RaceSelection,
    pub selector_visible: bool,
    pub phase: LoadPhase,
    pub frame: Arc<ChartFrame>,
    pub tooltip: TooltipState,
}

pub struct Navigator {
    data: LoadState,
    chart: ChartConfig,
    current_step: i64,
    active_marker: Option<usize>,
    race: RaceSelection,
    frame: Arc<ChartFrame>,
    tooltip: TooltipState,
    cache: LruCache<Scene, Arc<ChartFrame>>,
    metrics: Arc<StoryMetrics>,
}

impl Navigator {
    /// Start at step 0 with no data
    pub fn new(chart: ChartConfig, cache_capacity: usize, metrics: Arc<StoryMetrics>) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        let frame = draw_scene(Scene::Cleared, &DataSnapshot::empty(), &chart, &metrics);
        Self {
            data: LoadState::Loading,
            chart,
            current_step: 0,
            active_marker: None,
            race: RaceSelection::All,
            frame,
            tooltip: TooltipState::hidden(),
            cache: LruCache::new(capacity),
            metrics,
        }
    }

    pub fn scene(&self) -> Scene {
        dispatch(self.current_step, self.race)
    }

    pub fn state(&self) -> StoryState {
        StoryState {
            step: self.current_step,
            active_marker: self.active_marker,
            race: self.race,
            selector_visible: self.scene().selector_visible(),
            phase: self.data.phase(),
            frame: self.frame.clone(),
            tooltip: self.tooltip.clone(),
        }
    }

    /// Apply one event and report the resulting state
    pub fn apply(&mut self, event: StoryEvent) -> StoryState {
        match event {
            StoryEvent::StepEntered { raw_step, marker } => {
                self.active_marker = marker;
                match parse_step_attr(&raw_step) {
                    Some(step) if step != self.current_step => {
                        info!("Step {} -> {}", self.current_step, step);
                        self.current_step = step;
                        self.metrics.step_changes.inc();
                        self.update();
                    }
                    Some(_) => debug!("Step {} already active", self.current_step),
                    None => warn!("Ignoring unparseable step attribute {:?}", raw_step),
                }
            }
            StoryEvent::RaceSelected(race) => {
                info!("Race selection {} -> {}", self.race, race);
                self.race = race;
                self.update();
            }
            StoryEvent::PointerMoved { x, y } => {
                self.tooltip = TooltipState::hover(&self.frame.marks, x, y);
            }
            StoryEvent::PointerLeft => {
                self.tooltip = TooltipState::hidden();
            }
            StoryEvent::DataLoaded(data) => {
                info!("Story data is now {:?}", data.phase());
                self.data = data;
                self.cache.clear();
                self.update();
            }
            StoryEvent::Inspect => {}
        }
        self.state()
    }

    /// Redraw the current scene and hide the tooltip
    fn update(&mut self) {
        let scene = self.scene();
        self.frame = self.frame_for(scene);
        self.tooltip = TooltipState::hidden();
    }

    fn frame_for(&mut self, scene: Scene) -> Arc<ChartFrame> {
        let snapshot = match &self.data {
            LoadState::Failed(message) => {
                return Arc::new(render::render_error(scene, message, &self.chart));
            }
            LoadState::Loading => {
                return draw_scene(scene, &DataSnapshot::empty(), &self.chart, &self.metrics);
            }
            LoadState::Loaded(snapshot) => snapshot.clone(),
        };

        if let Some(frame) = self.cache.get(&scene) {
            self.metrics.cache_hits.inc();
            return frame.clone();
        }
        let frame = draw_scene(scene, &snapshot, &self.chart, &self.metrics);
        if frame.error.is_none() {
            self.cache.put(scene, frame.clone());
        }
        frame
    }
}

/// Render `scene`, falling back to the error frame
fn draw_scene(scene: Scene, data: &DataSnapshot, chart: &ChartConfig, metrics: &StoryMetrics) -> Arc<ChartFrame> {
    match render::render_scene(scene, data, chart) {
        Ok(frame) => {
            metrics.record_render(scene);
            Arc::new(frame)
        }
        Err(e) => {
            error!("Failed to render {}: {}", scene.name(), e);
            metrics.render_failures.inc();
            Arc::new(render::render_error(scene, &e.to_string(), chart))
        }
    }
}

struct Envelope {
    event: StoryEvent,
    reply: oneshot::Sender<StoryState>,
}

/// Cloneable sender for story events
#[derive(Clone)]
pub struct StoryHandle {
    sender: mpsc::Sender<Envelope>,
}

impl StoryHandle {
    /// Queue `event` and wait for the state it produced
    pub async fn send(&self, event: StoryEvent) -> Result<StoryState, StoryError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { event, reply })
            .await
            .map_err(|_| StoryError::ChannelError("Story navigator has stopped".to_string()))?;
        response
            .await
            .map_err(|_| StoryError::ChannelError("Story navigator dropped the reply".to_string()))
    }
}

/// Run `navigator` on its own task
pub fn spawn(mut navigator: Navigator, capacity: usize) -> (StoryHandle, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<Envelope>(capacity.max(1));
    let task = tokio::spawn(async move {
        debug!("Story navigator started");
        while let Some(Envelope { event, reply }) = receiver.recv().await {
            let state = navigator.apply(event);
            if reply.send(state).is_err() {
                debug!("Story event caller went away before the reply");
            }
        }
        debug!("Story navigator stopped");
    });
    (StoryHandle { sender }, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tooltip::MarkShape;
    use crate::data::fallback::sample_snapshot;
    use crate::data::records::Race;

    fn navigator() -> Navigator {
        let metrics = Arc::new(StoryMetrics::new().unwrap());
        let mut navigator = Navigator::new(ChartConfig::default(), 8, metrics);
        navigator.apply(StoryEvent::DataLoaded(LoadState::Loaded(Arc::new(sample_snapshot()))));
        navigator
    }

    fn step(raw: &str, marker: usize) -> StoryEvent {
        StoryEvent::StepEntered { raw_step: raw.to_string(), marker: Some(marker) }
    }

    // Test the initial state is the cleared canvas
    #[test]
    fn test_initial_state() {
        let metrics = Arc::new(StoryMetrics::new().unwrap());
        let navigator = Navigator::new(ChartConfig::default(), 8, metrics);
        let state = navigator.state();
        assert_eq!(state.step, 0);
        assert_eq!(state.phase, LoadPhase::Loading);
        assert!(state.frame.title.is_none());
        assert!(!state.selector_visible);
        assert!(!state.tooltip.visible);
    }

    // Test a new step dispatches once and duplicates are suppressed
    #[test]
    fn test_step_changes_dispatch_once() {
        let mut navigator = navigator();
        let first = navigator.apply(step("1", 1));
        assert_eq!(first.step, 1);
        assert_eq!(first.frame.title.as_deref(), Some(render::INCOME_TITLE));

        let again = navigator.apply(step("1", 1));
        assert_eq!(again.frame.id, first.frame.id);
        assert_eq!(navigator.metrics.step_changes.get(), 1);
    }

    // Test unparseable attributes never dispatch but still mark the marker active
    #[test]
    fn test_unparseable_step_ignored() {
        let mut navigator = navigator();
        let before = navigator.apply(step("3", 3));
        let after = navigator.apply(step("abc", 4));
        assert_eq!(after.step, 3);
        assert_eq!(after.active_marker, Some(4));
        assert_eq!(after.frame.id, before.frame.id);
    }

    // Test unknown steps clear the canvas
    #[test]
    fn test_out_of_range_step_clears() {
        let mut navigator = navigator();
        navigator.apply(step("3", 3));
        let state = navigator.apply(step("4", 4));
        assert_eq!(state.step, 4);
        assert!(state.frame.title.is_none());
        assert!(state.frame.marks.is_empty());
    }

    // Test the race selector re-renders the current step without moving it
    #[test]
    fn test_race_change_keeps_step() {
        let mut navigator = navigator();
        let all = navigator.apply(step("2", 2));
        assert!(all.selector_visible);
        assert_eq!(all.frame.marks.len(), 24);

        let asian = navigator.apply(StoryEvent::RaceSelected(RaceSelection::Race(Race::Asian)));
        assert_eq!(asian.step, 2);
        assert_eq!(asian.race, RaceSelection::Race(Race::Asian));
        assert_eq!(
            asian.frame.title.as_deref(),
            Some("Income Distribution for Asian Population: 1970-2020")
        );
        assert_eq!(asian.frame.marks.len(), 2);

        // Selecting a race on another step changes nothing visible
        navigator.apply(step("1", 1));
        let state = navigator.apply(StoryEvent::RaceSelected(RaceSelection::All));
        assert_eq!(state.step, 1);
        assert!(!state.selector_visible);
        assert_eq!(state.frame.title.as_deref(), Some(render::INCOME_TITLE));
    }

    // Test pointer hover shows the mark's content and re-rendering hides it
    #[test]
    fn test_tooltip_follows_pointer() {
        let mut navigator = navigator();
        let state = navigator.apply(step("3", 3));
        let (cx, cy) = match state.frame.marks[1].shape {
            MarkShape::Circle { cx, cy, .. } => (cx, cy),
            MarkShape::Rect { .. } => panic!("expected a point"),
        };

        let state = navigator.apply(StoryEvent::PointerMoved { x: cx + 1.0, y: cy });
        assert!(state.tooltip.visible);
        assert_eq!(state.tooltip.content.as_ref().unwrap().heading, "1980");
        assert_eq!(state.tooltip.left, cx + 11.0);

        let state = navigator.apply(StoryEvent::PointerLeft);
        assert!(!state.tooltip.visible);

        navigator.apply(StoryEvent::PointerMoved { x: cx, y: cy });
        let state = navigator.apply(step("1", 1));
        assert!(!state.tooltip.visible);
    }

    // Test loaded frames are reused until new data arrives
    #[test]
    fn test_render_cache() {
        let mut navigator = navigator();
        let first = navigator.apply(step("1", 1));
        navigator.apply(step("3", 3));
        let back = navigator.apply(step("1", 1));
        assert_eq!(back.frame.id, first.frame.id);
        assert_eq!(navigator.metrics.cache_hits.get(), 1);

        let reloaded = navigator.apply(StoryEvent::DataLoaded(LoadState::Loaded(Arc::new(sample_snapshot()))));
        assert_ne!(reloaded.frame.id, first.frame.id);
    }

    // Test a failed load turns every scene into the error frame
    #[test]
    fn test_failed_load_renders_error() {
        let mut navigator = navigator();
        navigator.apply(step("1", 1));
        let state = navigator.apply(StoryEvent::DataLoaded(LoadState::Failed("bad dir".to_string())));
        assert_eq!(state.phase, LoadPhase::Failed);
        assert_eq!(state.frame.error.as_deref(), Some("bad dir"));

        let state = navigator.apply(step("2", 2));
        assert_eq!(state.frame.error.as_deref(), Some("bad dir"));
    }

    // Test events sent through the handle are answered in order
    #[tokio::test]
    async fn test_spawned_navigator() {
        let metrics = Arc::new(StoryMetrics::new().unwrap());
        let navigator = Navigator::new(ChartConfig::default(), 4, metrics);
        let (handle, task) = spawn(navigator, 4);

        let state = handle.send(step("1", 1)).await.unwrap();
        assert_eq!(state.step, 1);
        assert_eq!(state.phase, LoadPhase::Loading);
        assert!(state.frame.marks.is_empty());

        let state = handle
            .send(StoryEvent::DataLoaded(LoadState::Loaded(Arc::new(sample_snapshot()))))
            .await
            .unwrap();
        assert_eq!(state.step, 1);
        assert_eq!(state.frame.marks.len(), 6);

        drop(handle);
        task.await.unwrap();
    }
}
