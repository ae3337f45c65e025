//! Story core: configuration, errors, step dispatch, tooltips, the event-driven
//! navigator, viewer sessions and metrics.

pub mod config;
pub mod error;
pub mod metrics;
pub mod navigator;
pub mod session;
pub mod step;
pub mod tooltip;
