//! One navigator per viewer.
//!
//! Each browser is identified by a session cookie and owns its own step,
//! race, frame and tooltip. Sessions beyond `max_sessions` are evicted least
//! recently used first; dropping the last handle stops that navigator.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, info, warn};
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::core::config::{ChartConfig, StoryConfig};
use crate::core::metrics::StoryMetrics;
use crate::core::navigator::{self, Navigator, StoryEvent, StoryHandle};
use crate::data::snapshot::LoadState;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "story_session";

pub struct SessionRegistry {
    sessions: Mutex<LruCache<Uuid, StoryHandle>>,
    data: Arc<RwLock<LoadState>>,
    chart: ChartConfig,
    render_cache_capacity: usize,
    event_queue_capacity: usize,
    metrics: Arc<StoryMetrics>,
}

impl SessionRegistry {
    pub fn new(config: &StoryConfig, data: Arc<RwLock<LoadState>>, metrics: Arc<StoryMetrics>) -> Self {
        let capacity = NonZeroUsize::new(config.max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            data,
            chart: config.chart,
            render_cache_capacity: config.render_cache_capacity,
            event_queue_capacity: config.event_queue_capacity,
            metrics,
        }
    }

    /// The navigator for `id`, starting a new session when it is unknown or evicted
    pub async fn handle_for(&self, id: Option<Uuid>) -> (Uuid, StoryHandle) {
        let mut sessions = self.sessions.lock().await;
        if let Some(id) = id {
            if let Some(handle) = sessions.get(&id) {
                return (id, handle.clone());
            }
        }

        let id = Uuid::new_v4();
        let mut navigator = Navigator::new(self.chart, self.render_cache_capacity, self.metrics.clone());
        // Read under the sessions lock; the loader writes data before broadcasting
        let data = self.data.read().await.clone();
        if !matches!(data, LoadState::Loading) {
            navigator.apply(StoryEvent::DataLoaded(data));
        }
        let (handle, _task) = navigator::spawn(navigator, self.event_queue_capacity);

        if let Some((evicted, _)) = sessions.push(id, handle.clone()) {
            if evicted != id {
                debug!("Evicted story session {}", evicted);
            }
        }
        self.metrics.active_sessions.set(sessions.len() as i64);
        info!("Started story session {}", id);
        (id, handle)
    }

    /// Deliver `event` to every live session
    pub async fn broadcast(&self, event: StoryEvent) {
        let handles: Vec<(Uuid, StoryHandle)> = {
            let sessions = self.sessions.lock().await;
            sessions.iter().map(|(id, handle)| (*id, handle.clone())).collect()
        };
        for (id, handle) in handles {
            if let Err(e) = handle.send(event.clone()).await {
                warn!("Story session {} missed an event: {}", id, e);
            }
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
