#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for SafeSteps.
//!
//! Every subcommand reads reports from the configured JSON store (or
//! `--reports`) and prints pretty JSON on stdout. Logs go to stderr and
//! are controlled by `RUST_LOG`.

mod check_in;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use safe_steps_config::AppConfig;
use safe_steps_explore::{
    format_time_ago, generate_safe_spots_or_degraded, nearby_reports, validate_radius_km,
};
use safe_steps_heatmap::{available_types, filter_incidents, map_center, to_feature_collection};
use safe_steps_incident_models::{FilterSpec, GeoPoint, ReportView, Severity, TimeRange};
use safe_steps_location::{
    FixedLocalityResolver, LocalityResolver, NominatimResolver, resolve_area_name,
};
use safe_steps_server_models::{ApiHeatmap, ApiReport};
use safe_steps_store::{JsonFileStore, load_reports};

#[derive(Parser)]
#[command(name = "safe_steps", about = "SafeSteps incident explorer")]
struct Cli {
    /// JSON file of incident reports (overrides the config file)
    #[arg(long, global = true)]
    reports: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reports, nearest first when a location is given, else newest first
    Nearby {
        /// Latitude of the user
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the user
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Search radius in kilometres (defaults to the configured radius)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Generate candidate safe spots around a location
    SafeSpots {
        /// Latitude of the reference point
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the reference point
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Area name; resolved from the coordinate when omitted
        #[arg(long)]
        area: Option<String>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Filter reports and compute heat points
    Heatmap {
        /// Comma-separated incident types to keep
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Comma-separated severities to keep (e.g. `High,Critical`)
        #[arg(long, value_delimiter = ',')]
        severities: Vec<Severity>,
        /// One of `all`, `day`, `week`, `month`, `year`
        #[arg(long, default_value = "all")]
        time_range: TimeRange,
        /// Also write the filtered reports as GeoJSON to this file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// List the distinct incident types in the store
    Types,
    /// Start a check-in countdown; prints the SOS alert if it runs out
    CheckIn {
        /// Countdown length in minutes
        #[arg(long, default_value = "5")]
        minutes: u32,
        /// Latitude to include in the alert
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude to include in the alert
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Start the HTTP API server
    Serve,
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.reports {
        config.reports.path = path;
    }

    let store = JsonFileStore::new(config.reports.path.clone());

    match cli.command {
        Commands::Nearby { lat, lng, radius } => {
            let origin = match lat.zip(lng) {
                Some((lat, lng)) => Some(GeoPoint::try_new(lat, lng)?),
                None => None,
            };
            let radius_km = validate_radius_km(radius.unwrap_or(config.explore.radius_km))?;

            let now = Utc::now();
            let reports = load_reports(&store, now).await?;

            let items: Vec<ApiReport> = nearby_reports(&reports, origin, radius_km)
                .into_iter()
                .map(|view| {
                    let time_ago = format_time_ago(view.report.timestamp, now);
                    ApiReport::new(view, time_ago)
                })
                .collect();

            print_json(&items)?;
        }
        Commands::SafeSpots {
            lat,
            lng,
            area,
            seed,
        } => {
            let origin = GeoPoint::new(lat, lng);

            let area_name = match area {
                Some(area) => area,
                None if origin.is_valid() => {
                    let resolver = locality_resolver(&config)?;
                    resolve_area_name(resolver.as_ref(), origin).await
                }
                None => String::new(),
            };

            let mut rng = match seed.or(config.explore.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let batch = generate_safe_spots_or_degraded(origin, &area_name, &mut rng);

            print_json(&serde_json::json!({
                "spots": batch.spots,
                "degraded": batch.degraded,
            }))?;
        }
        Commands::Heatmap {
            types,
            severities,
            time_range,
            geojson,
        } => {
            let spec = FilterSpec {
                types: types.into_iter().collect(),
                severities: severities.into_iter().collect(),
                time_range,
            };

            let now = Utc::now();
            let reports = load_reports(&store, now).await?;
            let outcome = filter_incidents(&reports, &spec, now);

            if let Some(path) = geojson {
                let collection = to_feature_collection(&outcome.filtered);
                std::fs::write(&path, serde_json::to_string_pretty(&collection)?)?;
                log::info!(
                    "Wrote {} features to {}",
                    collection.features.len(),
                    path.display()
                );
            }

            log::info!("{}", outcome.summary());

            let shown = outcome.shown();
            let center = map_center(&outcome.heat_points);
            let incidents = outcome
                .filtered
                .into_iter()
                .map(|report| {
                    let time_ago = format_time_ago(report.timestamp, now);
                    ApiReport::new(ReportView::from(report), time_ago)
                })
                .collect();

            print_json(&ApiHeatmap {
                incidents,
                heat_points: outcome.heat_points,
                shown,
                total: outcome.total,
                center,
            })?;
        }
        Commands::Types => {
            let reports = load_reports(&store, Utc::now()).await?;
            print_json(&available_types(&reports))?;
        }
        Commands::CheckIn { minutes, lat, lng } => {
            let point = GeoPoint::try_new(lat, lng)?;
            check_in::run(minutes, point).await?;
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(safe_steps_server::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}

fn locality_resolver(
    config: &AppConfig,
) -> Result<Box<dyn LocalityResolver>, safe_steps_location::LocationError> {
    if config.locality.enabled {
        Ok(Box::new(NominatimResolver::new(
            config.locality.base_url.clone(),
            &config.locality.user_agent,
        )?))
    } else {
        Ok(Box::new(FixedLocalityResolver::new(None)))
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
