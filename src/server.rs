//! HTTP server and API handlers.
//!
//! GET /api/v1/functions - functions applicable to a single series.
//! GET /api/v1/aggregation-functions - functions combining several series.
//! GET /api/v1/predefined-pages - dashboard pages, always empty.
//! GET /api/v1/series - matching series, or their samples when a range is given.
//! GET /api/v1/label-and-value-summary - value counts per label.

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::metric::SeriesEntry;
use crate::query::{QuerySpec, AGGREGATION_FUNCTIONS, FUNCTIONS};
use crate::sample::{Sampler, TimeRange};
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{debug, info, warn};
use std::sync::Arc;

// Every response is JSON, readable from any origin and never cached.
const JSON_HEADERS: [(HeaderName, &str); 5] = [
    (header::CONTENT_TYPE, "application/json"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Application state shared across handlers. Never mutated after startup.
pub struct AppState {
    pub catalog: Catalog,
    pub sampler: Sampler,
}

pub fn router(catalog: Catalog, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        catalog,
        sampler: Sampler::new(config.max_points),
    });

    Router::new()
        .route("/api/v1/functions", get(functions_handler))
        .route(
            "/api/v1/aggregation-functions",
            get(aggregation_functions_handler),
        )
        .route("/api/v1/predefined-pages", get(predefined_pages_handler))
        .route("/api/v1/series", get(series_handler))
        .route(
            "/api/v1/label-and-value-summary",
            get(label_summary_handler),
        )
        .with_state(state)
}

/// Serve the catalog until Ctrl-C is received.
pub async fn run_server(catalog: Catalog, config: ServerConfig) -> anyhow::Result<()> {
    config.validate().context("invalid server configuration")?;

    let app = router(catalog, &config);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    info!("serving on http://{}", listener.local_addr()?);
    info!(
        "series requests are limited to {} samples",
        config.max_points
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn functions_handler() -> impl IntoResponse {
    (JSON_HEADERS, Json(FUNCTIONS))
}

async fn aggregation_functions_handler() -> impl IntoResponse {
    (JSON_HEADERS, Json(AGGREGATION_FUNCTIONS))
}

async fn predefined_pages_handler() -> impl IntoResponse {
    (JSON_HEADERS, "[]")
}

async fn label_summary_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (JSON_HEADERS, Json(state.catalog.label_summary()))
}

/// Query parameters of /api/v1/series. The first occurrence of a key wins;
/// if its value is empty the parameter counts as absent.
#[derive(Debug, Default)]
struct SeriesParams {
    query: Option<String>,
    start: Option<String>,
    stop: Option<String>,
    step: Option<String>,
}

impl SeriesParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "start" => &mut params.start,
                "stop" => &mut params.stop,
                "step" => &mut params.step,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        for slot in [
            &mut params.query,
            &mut params.start,
            &mut params.stop,
            &mut params.step,
        ] {
            if slot.as_deref() == Some("") {
                *slot = None;
            }
        }
        params
    }

    // All three bounds must be present; each one that isn't an integer counts as zero.
    fn range(&self) -> Option<TimeRange> {
        match (&self.start, &self.stop, &self.step) {
            (Some(start), Some(stop), Some(step)) => Some(TimeRange {
                start: parse_int(start),
                stop: parse_int(stop),
                step: parse_int(step),
            }),
            _ => None,
        }
    }
}

fn parse_int(s: &str) -> i64 {
    s.parse().unwrap_or_else(|_| {
        debug!("treating non-integer range bound {:?} as 0", s);
        0
    })
}

async fn series_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = SeriesParams::from_pairs(pairs);
    let query = match &params.query {
        Some(query) => query,
        None => return (JSON_HEADERS, "[]").into_response(),
    };

    let spec = QuerySpec::parse_lenient(query);
    debug!("series query {:?} parsed as {:?}", query, spec);
    let matches = state.catalog.select(&spec.filter);

    match params.range() {
        Some(range) => match state.sampler.generate(&matches, range) {
            Ok(results) => (JSON_HEADERS, Json(results)).into_response(),
            Err(e) => {
                warn!("no data for query {:?} over {:?}: {}", query, range, e);
                (JSON_HEADERS, "").into_response()
            }
        },
        None => {
            let entries: Vec<SeriesEntry> = matches
                .into_iter()
                .map(|series| SeriesEntry {
                    series: series.clone(),
                })
                .collect();
            (JSON_HEADERS, Json(entries)).into_response()
        }
    }
}
