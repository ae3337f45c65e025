use std::path::PathBuf;
use std::sync::Arc;

use actix_files as fs;
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use tokio::sync::RwLock;

use crate::core::config::StoryConfig;
use crate::core::metrics::StoryMetrics;
use crate::core::session::SessionRegistry;
use crate::data::snapshot::LoadState;
use crate::web::handlers;

/// Start the web server for the story page and its API
pub async fn start_web_server(config: StoryConfig, app_state: AppState) -> std::io::Result<()> {
    info!("Starting web server on http://{}", config.bind_address);

    let app_state = web::Data::new(app_state);
    let static_dir = config.static_dir.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .service(static_files(static_dir.clone()))
            .configure(configure)
    })
    .bind(config.bind_address.as_str())?
    .run();

    server.await
}

/// Assets under /static; directories are never listed
pub fn static_files(dir: PathBuf) -> fs::Files {
    fs::Files::new("/static", dir)
}

/// Page and API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Story events
            .route("/story", web::get().to(handlers::story::get_story))
            .route("/step", web::post().to(handlers::story::enter_step))
            .route("/race", web::post().to(handlers::story::select_race))
            .route("/pointer", web::post().to(handlers::story::pointer_moved))
            .route("/pointer/leave", web::post().to(handlers::story::pointer_left))
            // Data
            .route("/status", web::get().to(handlers::status::get_status))
            .route("/trend/{tier}", web::get().to(handlers::status::get_trend)),
    )
    .route("/metrics", web::get().to(handlers::status::get_metrics))
    // Page routes
    .route("/", web::get().to(handlers::pages::index))
    // Default route for 404
    .default_service(web::get().to(handlers::pages::not_found));
}

/// Shared application state for web handlers
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub data: Arc<RwLock<LoadState>>,
    pub metrics: Arc<StoryMetrics>,
    pub tier_sum_tolerance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use actix_web::cookie::Cookie;

    use crate::core::session::SESSION_COOKIE;
    use crate::data::fallback::sample_snapshot;

    async fn app_state(loaded: bool) -> AppState {
        let metrics = Arc::new(StoryMetrics::new().unwrap());
        let load_state = if loaded {
            LoadState::Loaded(Arc::new(sample_snapshot()))
        } else {
            LoadState::Loading
        };
        let data = Arc::new(RwLock::new(load_state));
        let sessions = SessionRegistry::new(&StoryConfig::default(), data.clone(), metrics.clone());

        AppState {
            sessions: Arc::new(sessions),
            data,
            metrics,
            tier_sum_tolerance: 0.01,
        }
    }

    fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
            .unwrap()
    }

    // Test the narrative page lists every step and race
    #[actix_web::test]
    async fn test_index_page() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(true).await)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains(r#"id="chart""#));
        assert!(html.contains(r#"id="tooltip""#));
        assert!(html.contains(r#"id="race-selector""#));
        assert!(html.contains(r#"data-step="3""#));
        assert!(html.contains(r#"<option value="Hispanic">"#));
    }

    // Test step and race events drive the story state
    #[actix_web::test]
    async fn test_step_and_race() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(true).await)).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/step")
            .set_json(json!({ "step": "2", "marker": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = session_cookie(&resp);
        let state: Value = test::read_body_json(resp).await;
        assert_eq!(state["step"], 2);
        assert_eq!(state["active_marker"], 2);
        assert_eq!(state["selector_visible"], true);
        assert_eq!(state["race"], "All");
        assert_eq!(state["phase"], "loaded");
        assert!(state["frame"]["svg"].as_str().unwrap().contains("<svg"));

        let req = test::TestRequest::post()
            .uri("/api/race")
            .cookie(cookie.clone())
            .set_json(json!({ "race": "Hispanic" }))
            .to_request();
        let state: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(state["step"], 2);
        assert_eq!(state["race"], "Hispanic");
        assert_eq!(
            state["frame"]["title"],
            "Income Distribution for Hispanic Population: 1970-2020"
        );

        let req = test::TestRequest::post()
            .uri("/api/race")
            .cookie(cookie)
            .set_json(json!({ "race": "<script>" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "INVALID_RACE");
    }

    // Test each viewer's session keeps its own step and race
    #[actix_web::test]
    async fn test_viewers_do_not_share_state() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(true).await)).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/step")
            .set_json(json!({ "step": "2", "marker": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let viewer_a = session_cookie(&resp);
        assert!(viewer_a.http_only().unwrap_or(false));

        let req = test::TestRequest::post()
            .uri("/api/race")
            .cookie(viewer_a.clone())
            .set_json(json!({ "race": "Asian" }))
            .to_request();
        let state: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(state["race"], "Asian");

        // viewer B arrives without a cookie and starts from the beginning
        let req = test::TestRequest::get().uri("/api/story").to_request();
        let resp = test::call_service(&app, req).await;
        let viewer_b = session_cookie(&resp);
        assert_ne!(viewer_b.value(), viewer_a.value());
        let state: Value = test::read_body_json(resp).await;
        assert_eq!(state["step"], 0);
        assert_eq!(state["race"], "All");

        let req = test::TestRequest::post()
            .uri("/api/step")
            .cookie(viewer_b)
            .set_json(json!({ "step": "2", "marker": 2 }))
            .to_request();
        let state: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(state["race"], "All");
        assert_eq!(state["frame"]["title"], crate::render::RACE_COMPARISON_TITLE);

        // viewer A is untouched
        let req = test::TestRequest::get().uri("/api/story").cookie(viewer_a).to_request();
        let state: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(state["step"], 2);
        assert_eq!(state["race"], "Asian");

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["active_sessions"], 2);
    }

    // Test static assets are served and directories are not listed
    #[actix_web::test]
    async fn test_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("story.css"), "body { margin: 0; }").unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        let app = test::init_service(App::new().service(static_files(dir.path().to_path_buf()))).await;

        let req = test::TestRequest::get().uri("/static/story.css").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/static/img/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(!resp.status().is_success());
    }

    // Test pointer events return tooltip state
    #[actix_web::test]
    async fn test_pointer_leave_hides_tooltip() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(true).await)).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/pointer")
            .set_json(json!({ "x": -50.0, "y": -50.0 }))
            .to_request();
        let tooltip: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tooltip["visible"], false);

        let req = test::TestRequest::post().uri("/api/pointer/leave").to_request();
        let tooltip: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tooltip["visible"], false);
    }

    // Test status, trend and metrics endpoints
    #[actix_web::test]
    async fn test_status_trend_and_metrics() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(true).await)).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["phase"], "loaded");
        assert_eq!(status["used_fallback"], true);
        assert_eq!(status["tables"].as_array().unwrap().len(), 5);
        assert_eq!(status["tables"][0]["rows"], 18);

        let req = test::TestRequest::get().uri("/api/trend/middle").to_request();
        let trend: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(trend["success"], true);
        assert_eq!(trend["data"]["start_year"], 1970);
        assert_eq!(trend["data"]["end_year"], 2020);

        let req = test::TestRequest::get().uri("/api/trend/upper").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("income_story_renders_total"));
    }

    // Test the trend endpoint before any data has loaded
    #[actix_web::test]
    async fn test_trend_without_data() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(app_state(false).await)).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/trend/low").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "NO_DATA");

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["phase"], "loading");
        assert_eq!(status["active_sessions"], 0);
    }
}
