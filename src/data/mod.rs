//! Story data
//!
//! Typed records for the five source tables, the sources they are read from,
//! the loader that builds an immutable snapshot, and the derived views
//! (pivots, audit, trends) computed from it.

pub mod records;
pub mod source;
pub mod loader;
pub mod fallback;
pub mod snapshot;
pub mod pivot;
pub mod audit;
pub mod trend;
