use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

mod core;
mod data;
mod render;
mod web;

use crate::core::config::StoryConfig;
use crate::core::metrics::StoryMetrics;
use crate::core::navigator::StoryEvent;
use crate::core::session::SessionRegistry;
use crate::data::audit;
use crate::data::loader;
use crate::data::snapshot::LoadState;
use crate::web::server::{start_web_server, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    info!("Starting income story...");

    let config = StoryConfig::load().unwrap_or_else(|e| {
        warn!("Falling back to default configuration: {}", e);
        StoryConfig::default()
    });

    let metrics = match StoryMetrics::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(e) => {
            error!("Failed to register metrics: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    // Each viewer gets a navigator on first contact
    let load_state = Arc::new(RwLock::new(LoadState::Loading));
    let sessions = Arc::new(SessionRegistry::new(&config, load_state.clone(), metrics.clone()));
    info!("Story sessions initialized (max {})", config.max_sessions);

    // Load the tables in the background; the page is served meanwhile
    {
        let load_state = load_state.clone();
        let sessions = sessions.clone();
        let metrics = metrics.clone();
        let data_dir = config.data_dir.clone();
        let tolerance = config.tier_sum_tolerance;
        tokio::spawn(async move {
            let state = match loader::bootstrap(&data_dir).await {
                Ok(snapshot) => {
                    audit::log_issues(&audit::audit_tier_sums(&snapshot, tolerance));
                    metrics.record_tables(&snapshot);
                    LoadState::Loaded(Arc::new(snapshot))
                }
                Err(e) => {
                    error!("Error loading story data: {}", e);
                    LoadState::Failed(e.to_string())
                }
            };
            *load_state.write().await = state.clone();
            sessions.broadcast(StoryEvent::DataLoaded(state)).await;
        });
    }

    // Start the web interface
    let web_server_handle = tokio::spawn(start_web_server(
        config.clone(),
        AppState {
            sessions,
            data: load_state,
            metrics,
            tier_sum_tolerance: config.tier_sum_tolerance,
        },
    ));

    info!("Income story is now running. Press Ctrl+C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
    }

    info!("Shutting down income story...");

    // Wait for web server to finish
    match web_server_handle.await {
        Ok(Err(e)) => error!("Web server error: {}", e),
        Err(e) => error!("Error during web server shutdown: {:?}", e),
        Ok(Ok(())) => {}
    }

    info!("Income story shutdown complete");
    Ok(())
}
