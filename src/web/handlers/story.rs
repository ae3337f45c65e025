use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::error;
use uuid::Uuid;

use crate::core::navigator::{StoryEvent, StoryState};
use crate::core::session::SESSION_COOKIE;
use crate::core::step::RaceSelection;
use crate::web::models::{ErrorResponse, PointerRequest, RaceRequest, StepRequest};
use crate::web::server::AppState;

/// Send `event` to the caller's navigator and reply with `body` of the resulting state
async fn send_event<F, T>(req: &HttpRequest, data: &AppState, event: StoryEvent, body: F) -> HttpResponse
where
    F: FnOnce(StoryState) -> T,
    T: serde::Serialize,
{
    let session = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<Uuid>().ok());
    let (id, story) = data.sessions.handle_for(session).await;
    let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .finish();

    match story.send(event).await {
        Ok(state) => HttpResponse::Ok().cookie(cookie).json(body(state)),
        Err(e) => {
            error!("Story event failed: {}", e);
            HttpResponse::ServiceUnavailable()
                .cookie(cookie)
                .json(ErrorResponse::new(e.to_string(), "STORY_UNAVAILABLE"))
        }
    }
}

/// Get the current story state
pub async fn get_story(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    send_event(&req, &data, StoryEvent::Inspect, |state| state).await
}

/// A step marker reached the centre of the viewport
pub async fn enter_step(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<StepRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let event = StoryEvent::StepEntered {
        raw_step: body.step,
        marker: body.marker,
    };
    send_event(&req, &data, event, |state| state).await
}

/// Change the race selector
pub async fn select_race(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<RaceRequest>,
) -> impl Responder {
    let race = match body.race.parse::<RaceSelection>() {
        Ok(race) => race,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string(), "INVALID_RACE"));
        }
    };
    send_event(&req, &data, StoryEvent::RaceSelected(race), |state| state).await
}

/// Pointer moved over the chart; replies with the tooltip only
pub async fn pointer_moved(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<PointerRequest>,
) -> impl Responder {
    let event = StoryEvent::PointerMoved { x: body.x, y: body.y };
    send_event(&req, &data, event, |state| state.tooltip).await
}

/// Pointer left the chart
pub async fn pointer_left(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    send_event(&req, &data, StoryEvent::PointerLeft, |state| state.tooltip).await
}
