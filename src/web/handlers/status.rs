use actix_web::{web, HttpResponse, Responder};
use log::error;

use crate::data::audit::audit_tier_sums;
use crate::data::records::IncomeTier;
use crate::data::snapshot::LoadState;
use crate::data::trend::trend_summary;
use crate::web::models::{ErrorResponse, GenericResponse, StatusResponse};
use crate::web::server::AppState;

/// Get the data load status
pub async fn get_status(data: web::Data<AppState>) -> impl Responder {
    let active_sessions = data.sessions.count().await;
    let load_state = data.data.read().await;

    let response = match &*load_state {
        LoadState::Loaded(snapshot) => StatusResponse {
            phase: load_state.phase(),
            loaded_at: Some(snapshot.loaded_at),
            used_fallback: snapshot.used_fallback,
            tables: snapshot.table_counts(),
            tier_sum_issues: audit_tier_sums(snapshot, data.tier_sum_tolerance),
            error: None,
            active_sessions,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        other => StatusResponse {
            phase: other.phase(),
            loaded_at: None,
            used_fallback: false,
            tables: Vec::new(),
            tier_sum_issues: Vec::new(),
            error: match other {
                LoadState::Failed(message) => Some(message.clone()),
                _ => None,
            },
            active_sessions,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    HttpResponse::Ok().json(response)
}

/// Get the trend summary for one tier of the income-by-year table
pub async fn get_trend(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let tier = match path.parse::<IncomeTier>() {
        Ok(tier) => tier,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string(), "INVALID_TIER"));
        }
    };

    let load_state = data.data.read().await;
    let summary = load_state
        .snapshot()
        .and_then(|snapshot| trend_summary(&snapshot.income_by_year, tier));

    match summary {
        Some(summary) => HttpResponse::Ok().json(GenericResponse {
            success: true,
            message: summary.report(),
            data: serde_json::to_value(&summary).ok(),
        }),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            format!("No income data for tier {}", tier),
            "NO_DATA",
        )),
    }
}

/// Prometheus text exposition
pub async fn get_metrics(data: web::Data<AppState>) -> impl Responder {
    match data.metrics.encode() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string(), "METRICS_UNAVAILABLE"))
        }
    }
}
