//! Worldpop REST API
//!
//! HTTP layer for the dashboard, built with Axum. Every handler runs the
//! pipeline synchronously against the shared dataset.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `POST /api/v1/dashboard` - Apply the controls, return chart, map and table
//! - `GET /api/v1/overview` - Per-continent average over the whole table
//! - `GET /api/v1/options` - Control choices and initial values
//!
//! ## Table
//! - `GET /api/v1/table` - One display page of the filtered rows
//! - `GET /api/v1/export` - Filtered rows as CSV or JSON
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use worldpop::api::{serve, AppState};
//! use worldpop::config::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let controller = Arc::new(worldpop::load_controller(&config)?);
//!
//!     let state = AppState::new(controller, config.dashboard, config.api);
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dashboard routes
        .route("/dashboard", post(routes::dashboard::apply))
        .route("/overview", get(routes::dashboard::overview))
        .route("/options", get(routes::options::get_options))
        // Table routes
        .route("/table", get(routes::table::get_table_page))
        .route("/export", get(routes::export::export_table));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Worldpop API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Worldpop API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dataset::{Dataset, Record};
    use crate::pipeline::InteractionController;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_test_app_with(ApiConfig::default())
    }

    fn create_test_app_with(api_config: ApiConfig) -> Router {
        let records = vec![
            Record::new("Algeria", "Africa", 2002, "DZA")
                .pop(31_287_142)
                .life_exp(70.994)
                .gdp_percap(5288.04),
            Record::new("Algeria", "Africa", 2007, "DZA")
                .pop(33_333_216)
                .life_exp(72.301)
                .gdp_percap(6223.367),
            Record::new("Kenya", "Africa", 2007, "KEN")
                .pop(35_610_177)
                .life_exp(54.11)
                .gdp_percap(1463.249),
            Record::new("Japan", "Asia", 2007, "JPN")
                .pop(127_467_972)
                .life_exp(82.603)
                .gdp_percap(31656.07),
            Record::new("France", "Europe", 2007, "FRA")
                .pop(61_083_916)
                .life_exp(80.657)
                .gdp_percap(30470.02),
        ];
        let dataset = Arc::new(Dataset::from_records(records).unwrap());
        let controller = Arc::new(InteractionController::new(dataset).with_page_size(2));

        build_router(AppState::new(
            controller,
            DashboardConfig::default(),
            api_config,
        ))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = get(create_test_app(), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let response = get(create_test_app(), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = get(create_test_app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["records"], 5);
    }

    #[tokio::test]
    async fn test_dashboard_apply() {
        let response = post_json(
            create_test_app(),
            "/api/v1/dashboard",
            r#"{"metric": "lifeExp", "year": "All", "continents": ["Africa"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["metric"], "lifeExp");
        assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(body["map"]["points"].as_array().unwrap().len(), 2);

        let bars = body["chart"]["bars"].as_array().unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0]["continent"], "Africa");
        let expected = ((70.994 + 72.301) / 2.0 + 54.11) / 2.0;
        assert!((bars[0]["value"].as_f64().unwrap() - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_dashboard_numeric_year() {
        let response = post_json(
            create_test_app(),
            "/api/v1/dashboard",
            r#"{"metric": "pop", "year": 2007, "continents": ["Asia", "Europe"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let iso: Vec<&str> = body["map"]["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["iso_alpha"].as_str().unwrap())
            .collect();
        assert_eq!(iso, vec!["FRA", "JPN"]);
    }

    #[tokio::test]
    async fn test_dashboard_empty_continents() {
        let response = post_json(
            create_test_app(),
            "/api/v1/dashboard",
            r#"{"metric": "pop", "year": "All", "continents": []}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["chart"]["bars"].as_array().unwrap().is_empty());
        assert!(body["map"]["points"].as_array().unwrap().is_empty());
        assert!(body["table"]["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_invalid_selection() {
        let response = post_json(
            create_test_app(),
            "/api/v1/dashboard",
            r#"{"metric": "pop", "year": 1800, "continents": ["Africa"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_SELECTION");
    }

    #[tokio::test]
    async fn test_dashboard_unknown_metric() {
        let response = post_json(
            create_test_app(),
            "/api/v1/dashboard",
            r#"{"metric": "gdp", "year": "All", "continents": ["Africa"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_options() {
        let response = get(create_test_app(), "/api/v1/options").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["title"], "World Population Data");
        assert_eq!(body["years"], serde_json::json!([2002, 2007, "All"]));
        assert_eq!(
            body["continents"],
            serde_json::json!(["Africa", "Asia", "Europe"])
        );
        assert_eq!(body["defaults"]["metric"], "lifeExp");
        assert_eq!(body["defaults"]["year"], "All");
    }

    #[tokio::test]
    async fn test_overview() {
        let response = get(create_test_app(), "/api/v1/overview?metric=pop").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["bars"].as_array().unwrap().len(), 3);

        let response = get(create_test_app(), "/api/v1/overview?metric=area").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_table_page() {
        let response = get(create_test_app(), "/api/v1/table?page=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["page_size"], 2);
        assert_eq!(body["total_rows"], 5);
        assert_eq!(body["total_pages"], 3);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["country"], "Kenya");
    }

    #[tokio::test]
    async fn test_table_filtered_by_query() {
        let response = get(
            create_test_app(),
            "/api/v1/table?year=2007&continents=Africa",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total_rows"], 2);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let response = get(
            create_test_app(),
            "/api/v1/export?year=2007&continents=Asia,Europe",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("worldpop_export.csv"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "country,continent,year,lifeExp,pop,gdpPercap,iso_alpha");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Japan,Asia,2007,"));
    }

    #[tokio::test]
    async fn test_export_json() {
        let response = get(create_test_app(), "/api/v1/export?format=json&continents=Asia").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["iso_alpha"], "JPN");
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let response = get(create_test_app(), "/api/v1/export?format=xlsx").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    async fn get_with_origin(app: Router, uri: &str, origin: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_cors_with_configured_origins() {
        let config = ApiConfig {
            cors_origins: vec!["http://localhost:8050".to_string()],
            ..ApiConfig::default()
        };

        let response = get_with_origin(
            create_test_app_with(config.clone()),
            "/health/live",
            "http://localhost:8050",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8050"
        );

        let response = get_with_origin(
            create_test_app_with(config),
            "/health/live",
            "http://evil.example",
        )
        .await;
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_permissive_without_origins() {
        let response =
            get_with_origin(create_test_app(), "/health/live", "http://anywhere.example").await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
