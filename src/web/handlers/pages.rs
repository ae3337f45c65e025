use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use handlebars::Handlebars;
use log::error;
use serde_json::json;

use crate::core::step::ALL_RACES;
use crate::data::records::Race;
use crate::web::server::AppState;

// Shared handlebars instance
lazy_static::lazy_static! {
    static ref HBS: Arc<Handlebars<'static>> = {
        let mut hbs = Handlebars::new();
        // Register templates
        if let Err(e) = hbs.register_template_string("index", include_str!("../templates/index.hbs")) {
            error!("Error registering index template: {}", e);
        }
        if let Err(e) = hbs.register_template_string("404", include_str!("../templates/404.hbs")) {
            error!("Error registering 404 template: {}", e);
        }
        Arc::new(hbs)
    };
}

/// Narrative sections, one per step marker
const SECTIONS: [(&str, &str, &str); 5] = [
    (
        "0",
        "The American Middle Class",
        "For decades the middle class defined American prosperity. Scroll to see how that picture has changed.",
    ),
    (
        "1",
        "A Shrinking Middle",
        "The share of households in the middle tier has eroded while the tiers on either side have grown.",
    ),
    (
        "2",
        "Unequal Ground",
        "The squeeze has not been felt evenly. Compare 1970 with 2020 across races, or pick one to follow it over time.",
    ),
    (
        "3",
        "The Great Divergence",
        "Median income has struggled to keep pace with the rising cost of living, through every major downturn.",
    ),
    (
        "4",
        "What Comes Next",
        "The numbers describe a structural shift, not a passing dip.",
    ),
];

/// Serve the narrative page
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let phase = data.data.read().await.phase();

    let sections: Vec<_> = SECTIONS
        .iter()
        .map(|(step, heading, body)| json!({ "step": step, "heading": heading, "body": body }))
        .collect();
    let mut races = vec![ALL_RACES];
    races.extend(Race::ALL.iter().map(|r| r.as_str()));

    let context = json!({
        "title": "The Disappearing Middle Class",
        "sections": sections,
        "races": races,
        "phase": phase,
        "version": env!("CARGO_PKG_VERSION"),
    });

    match HBS.render("index", &context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            error!("Template rendering error: {}", e);
            HttpResponse::InternalServerError().body(format!("Template error: {}", e))
        }
    }
}

/// Serve the 404 page
pub async fn not_found() -> impl Responder {
    let context = json!({
        "title": "Page Not Found | The Disappearing Middle Class",
    });

    match HBS.render("404", &context) {
        Ok(body) => HttpResponse::NotFound().content_type("text/html").body(body),
        Err(e) => {
            error!("Template rendering error: {}", e);
            HttpResponse::InternalServerError().body(format!("Template error: {}", e))
        }
    }
}
