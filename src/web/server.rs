use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::animator::{Animator, AnimatorContext};

use super::api::control as control_handlers;
use super::api::satellites as satellite_handlers;
use super::api::scene as scene_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub animator: Arc<Mutex<Animator>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Satellite state and operations
        .route("/api/satellites", get(satellite_handlers::status))
        .route(
            "/api/satellites/{index}/trajectory",
            get(satellite_handlers::trajectory),
        )
        .route(
            "/api/satellites/{index}/sensor",
            get(satellite_handlers::sensor),
        )
        .route(
            "/api/satellites/{index}/nearest-site",
            get(satellite_handlers::nearest),
        )
        .route(
            "/api/satellites/{index}/result",
            post(satellite_handlers::apply_result),
        )
        .route(
            "/api/satellites/{index}/clear",
            post(satellite_handlers::clear),
        )
        // Control input
        .route("/api/control/events", post(control_handlers::push_event))
        .route("/api/control/keyboard", post(control_handlers::keyboard))
        // Renderer output
        .route("/api/scene", get(scene_handlers::scene))
        .route("/api/clock", get(scene_handlers::clock))
        .route("/api/sites", get(scene_handlers::sites))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, context: AnimatorContext) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let mut animator = Animator::new(context, config.animation.tick_interval);
    if let Err(e) = animator.start() {
        log::error!("Failed to start animator: {}", e);
        return Err(std::io::Error::other(e));
    }
    let animator = Arc::new(Mutex::new(animator));

    let state = AppState {
        config: Arc::new(config),
        animator: animator.clone(),
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    animator.lock().await.stop().await;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{FlightState, SatelliteTrack, SimulationClock};
    use crate::waypoints::Waypoint;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const CONFIG: &str = r#"
web:
  bind: "127.0.0.1:0"
satellites:
  - name: Satellite 1
    waypoints: unused-1.json
    initial: { lat: 30.0, lng: 120.0 }
  - name: Satellite 2
    waypoints: unused-2.json
    initial: { lat: 35.0, lng: 110.0 }
api_keys:
  - key: operator-key
    name: operator
    permissions: [view_state, control_satellites]
  - key: viewer-key
    name: viewer
    permissions: [view_state]
"#;

    fn app() -> Router {
        let config = Config::from_str(CONFIG).unwrap();
        let clock = SimulationClock::default();
        let track = |name: &str, lat: f64, lng: f64| {
            let waypoints = vec![
                Waypoint {
                    time: clock.epoch(),
                    lat,
                    lng,
                    alt: 2000.0,
                },
                Waypoint {
                    time: clock.epoch() + Duration::hours(1),
                    lat: lat + 1.0,
                    lng: lng + 1.0,
                    alt: 2000.0,
                },
            ];
            SatelliteTrack::new(name, waypoints, FlightState::at(lat, lng, 2000.0))
        };
        let context = AnimatorContext::new(
            [track("Satellite 1", 30.0, 120.0), track("Satellite 2", 40.0, 89.0)],
            clock,
        );
        let animator = Animator::new(context, std::time::Duration::from_millis(16));
        router(AppState {
            config: Arc::new(config),
            animator: Arc::new(Mutex::new(animator)),
        })
    }

    fn request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_requires_api_key() {
        let response = app()
            .oneshot(request("GET", "/api/satellites", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(request("GET", "/api/satellites", Some("wrong"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_lists_both_satellites() {
        let response = app()
            .oneshot(request("GET", "/api/satellites", Some("viewer-key"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["satellites"].as_array().unwrap().len(), 2);
        assert_eq!(body["selected"], 0);
        assert_eq!(body["autopilot"], true);
    }

    #[tokio::test]
    async fn test_viewer_cannot_control() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/control/events",
                Some("viewer-key"),
                Some(json!({"type": "toggle_autopilot"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_satellite_is_not_found() {
        let response = app()
            .oneshot(request(
                "GET",
                "/api/satellites/2/trajectory",
                Some("viewer-key"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "satellite_not_found");
    }

    #[tokio::test]
    async fn test_apply_result_then_read_trajectory_and_scene() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/satellites/1/result",
                Some("operator-key"),
                Some(json!({"time": "2021-06-01T00:30:00Z", "roll": 10.0, "pitch": 0.0})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let flight = json_body(response).await;
        assert!((flight["latitude_deg"].as_f64().unwrap() - 40.5).abs() < 1e-9);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/satellites/1/trajectory",
                Some("viewer-key"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/scene", Some("viewer-key"), None))
            .await
            .unwrap();
        let scene = json_body(response).await;
        assert_eq!(scene["camera_generation"], 1);
        assert!(scene["satellites"][1].is_object());

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/satellites/1/clear",
                Some("operator-key"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(
                "GET",
                "/api/satellites/1/trajectory",
                Some("viewer-key"),
                None,
            ))
            .await
            .unwrap();
        assert!(json_body(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keyboard_maps_known_keys_only() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/control/keyboard",
                Some("operator-key"),
                Some(json!({"key": "2", "pressed": true})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await["queued"], true);

        let response = app
            .oneshot(request(
                "POST",
                "/api/control/keyboard",
                Some("operator-key"),
                Some(json!({"key": "z", "pressed": true})),
            ))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["queued"], false);
    }

    #[tokio::test]
    async fn test_nearest_site_and_sensor() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/satellites/1/nearest-site",
                Some("viewer-key"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["site"]["id"], 7);

        let response = app
            .oneshot(request(
                "GET",
                "/api/satellites/0/sensor",
                Some("viewer-key"),
                None,
            ))
            .await
            .unwrap();
        let cone = json_body(response).await;
        assert!((cone["length"].as_f64().unwrap() - 2000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app()
            .oneshot(request("GET", "/api-doc/openapi.json", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/satellites/{index}/result"].is_object());
    }
}
