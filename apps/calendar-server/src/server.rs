//! HTTP host for the calendar module.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Method, Request, Response};
use calendar::CalendarModule;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::{Span, info, warn};

use crate::config::{AppConfig, CorsConfig};
use crate::signals;

const DEFAULT_SECRET: &str = "change-me";

/// Build a CORS layer from config. `"*"` in a list allows anything.
#[must_use]
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let wildcard = |items: &[String]| items.iter().any(|i| i == "*");

    let mut layer = CorsLayer::new();

    if wildcard(&cfg.allowed_origins) {
        warn!("CORS allows any origin; list explicit origins for production deployments");
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    if wildcard(&cfg.allowed_methods) {
        layer = layer.allow_methods(Any);
    } else {
        let methods: Vec<Method> = cfg
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        layer = layer.allow_methods(methods);
    }

    if wildcard(&cfg.allowed_headers) {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cfg
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }
    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(Duration::from_secs(cfg.max_age_seconds));
    }
    layer
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(|res: &Response<Body>, latency: Duration, span: &Span| {
                span.record("status", res.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
            }),
    )
}

/// Full application router: calendar routes, CORS and request tracing.
#[must_use]
pub fn app(module: &CalendarModule, cfg: &AppConfig) -> Router {
    let mut router = module.router();
    if let Some(cors) = &cfg.server.cors {
        router = router.layer(build_cors_layer(cors));
    }
    apply_trace_layer(router)
}

/// Serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Fails when the module cannot start, the address cannot be bound, or the
/// server stops with an I/O error.
pub async fn run(config: &AppConfig) -> Result<()> {
    config.validate()?;
    if config.calendar.auth.jwt_secret == DEFAULT_SECRET {
        warn!("calendar.auth.jwt_secret is the built-in default; set a real secret");
    }

    let module = CalendarModule::init(&config.calendar)
        .await
        .context("failed to initialize calendar module")?;
    let router = app(&module, config);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "Calendar server listening");

    let cancel = CancellationToken::new();
    signals::cancel_on_signal(cancel.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("server error")?;

    info!("Calendar server stopped");
    Ok(())
}
