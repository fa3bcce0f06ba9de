#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for isochrone resolution.
//!
//! Accepts raw drive-time provider responses, resolves them into a single
//! `GeoJSON` polygon feature with diagnostics, and serves circular mock
//! isochrones for local development. Fetching from the provider is the
//! caller's job; this server never makes outbound requests.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, Scope, middleware, web};
use sitescout_isochrone::IsochroneConfig;

/// Shared application state.
pub struct AppState {
    /// Resolution settings, shared read-only by every worker.
    pub config: Arc<IsochroneConfig>,
}

/// The `/api` scope with every route registered.
#[must_use]
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/isochrones/resolve", web::post().to(handlers::resolve))
        .route("/isochrones/mock", web::get().to(handlers::mock))
}

/// Starts the HTTP server.
///
/// Reads `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default `8080`)
/// from the environment. Logging must already be initialised, and the
/// caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: IsochroneConfig) -> std::io::Result<()> {
    log::info!(
        "Isochrone config: axis_swap={}, max_logged_invalid={}, mock points={}",
        config.axis_swap,
        config.max_logged_invalid,
        config.mock.points
    );

    let state = web::Data::new(AppState {
        config: Arc::new(config),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
