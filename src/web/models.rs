use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::audit::TierSumIssue;
use crate::data::snapshot::{LoadPhase, TableCount};

/// A step marker entered the centre of the viewport
#[derive(Deserialize)]
pub struct StepRequest {
    /// Raw `data-step` attribute text
    pub step: String,
    pub marker: Option<usize>,
}

/// Race selector change
#[derive(Deserialize)]
pub struct RaceRequest {
    pub race: String,
}

/// Pointer position relative to the chart
#[derive(Deserialize)]
pub struct PointerRequest {
    pub x: f64,
    pub y: f64,
}

/// Generic response
#[derive(Serialize)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, error_code: &str) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.to_string(),
        }
    }
}

/// Data load status
#[derive(Serialize)]
pub struct StatusResponse {
    pub phase: LoadPhase,
    pub loaded_at: Option<DateTime<Utc>>,
    pub used_fallback: bool,
    pub tables: Vec<TableCount>,
    pub tier_sum_issues: Vec<TierSumIssue>,
    pub error: Option<String>,
    /// Viewer sessions currently held
    pub active_sessions: usize,
    pub version: String,
}
