#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for SafeSteps.
//!
//! Exposes the nearby list, safe spot directory and incident heatmap as a
//! JSON API. Reports are re-read from the configured store on every
//! request; the server keeps no per-user state.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use safe_steps_config::AppConfig;
use safe_steps_location::{
    FixedLocalityResolver, LocalityResolver, LocationError, NominatimResolver,
};
use safe_steps_store::{JsonFileStore, ReportStore};

/// Shared application state.
pub struct AppState {
    /// Where incident reports are read from.
    pub store: Arc<dyn ReportStore>,
    /// Reverse geocoder used when a request carries no area name.
    pub resolver: Arc<dyn LocalityResolver>,
    /// Default nearby radius, in kilometres.
    pub radius_km: f64,
    /// Fixed safe-spot seed, if configured.
    pub seed: Option<u64>,
}

impl AppState {
    /// Builds the state described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if the reverse geocoder client cannot be
    /// built.
    pub fn from_config(config: &AppConfig) -> Result<Self, LocationError> {
        let resolver: Arc<dyn LocalityResolver> = if config.locality.enabled {
            log::info!("Reverse geocoding via {}", config.locality.base_url);
            Arc::new(NominatimResolver::new(
                config.locality.base_url.clone(),
                &config.locality.user_agent,
            )?)
        } else {
            Arc::new(FixedLocalityResolver::new(None))
        };

        Ok(Self {
            store: Arc::new(JsonFileStore::new(config.reports.path.clone())),
            resolver,
            radius_km: config.explore.radius_km,
            seed: config.explore.seed,
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/reports/nearby", web::get().to(handlers::nearby))
            .route("/safe-spots", web::get().to(handlers::safe_spots))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/heatmap/geojson", web::get().to(handlers::heatmap_geojson))
            .route("/incident-types", web::get().to(handlers::incident_types)),
    );
}

/// Starts the SafeSteps API server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and installs the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the state cannot be built, the
/// HTTP server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    log::info!("Reading reports from {}", config.reports.path.display());
    let state = web::Data::new(AppState::from_config(&config).map_err(std::io::Error::other)?);

    let bind_addr = config.server.bind_addr;
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
