//! HTTP handler functions for the SafeSteps API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use safe_steps_explore::{
    format_time_ago, generate_safe_spots_or_degraded, nearby_reports, validate_radius_km,
};
use safe_steps_heatmap::{available_types, filter_incidents, map_center, to_feature_collection};
use safe_steps_incident_models::{
    DEFAULT_AREA_NAME, FilterSpec, GeoPoint, IncidentReport, ReportView, Severity, TimeRange,
    incident_color,
};
use safe_steps_location::resolve_area_name;
use safe_steps_server_models::{
    ApiError, ApiHealth, ApiHeatmap, ApiIncidentType, ApiReport, ApiSafeSpot, ApiSafeSpots,
    HeatmapQueryParams, NearbyQueryParams, SafeSpotQueryParams,
};
use safe_steps_sos::{Platform, directions_url};
use safe_steps_store::load_reports;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/reports/nearby`
///
/// Without `lat`/`lng`, returns every report newest first. With them,
/// returns located reports within `radiusKm`, nearest first.
pub async fn nearby(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let origin = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => match GeoPoint::try_new(lat, lng) {
            Ok(point) => Some(point),
            Err(e) => return bad_request(e.to_string()),
        },
        (None, None) => None,
        _ => return bad_request("lat and lng must be given together"),
    };

    let radius_km = match validate_radius_km(params.radius_km.unwrap_or(state.radius_km)) {
        Ok(radius_km) => radius_km,
        Err(e) => return bad_request(e.to_string()),
    };

    let now = Utc::now();
    let reports = match load_reports(state.store.as_ref(), now).await {
        Ok(reports) => reports,
        Err(e) => return store_failure(&e),
    };

    let items: Vec<ApiReport> = nearby_reports(&reports, origin, radius_km)
        .into_iter()
        .map(|view| {
            let time_ago = format_time_ago(view.report.timestamp, now);
            ApiReport::new(view, time_ago)
        })
        .collect();

    HttpResponse::Ok().json(items)
}

/// `GET /api/safe-spots`
///
/// Generation failures are not an HTTP error: the response is an empty
/// list flagged `degraded`.
pub async fn safe_spots(
    state: web::Data<AppState>,
    params: web::Query<SafeSpotQueryParams>,
) -> HttpResponse {
    let platform = match params.platform.as_deref() {
        Some(p) => match p.parse::<Platform>() {
            Ok(platform) => platform,
            Err(_) => return bad_request(format!("Unknown platform: {p}")),
        },
        None => Platform::default(),
    };

    let origin = GeoPoint::new(params.lat, params.lng);

    let area_name = match params.area.as_deref().map(str::trim) {
        Some(area) if !area.is_empty() => area.to_string(),
        _ if origin.is_valid() => resolve_area_name(state.resolver.as_ref(), origin).await,
        _ => DEFAULT_AREA_NAME.to_string(),
    };

    let mut rng = match params.seed.or(state.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let batch = generate_safe_spots_or_degraded(origin, &area_name, &mut rng);

    let spots = batch
        .spots
        .into_iter()
        .map(|spot| ApiSafeSpot {
            directions_url: directions_url(spot.coordinates, platform),
            spot,
        })
        .collect();

    HttpResponse::Ok().json(ApiSafeSpots {
        area_name,
        spots,
        degraded: batch.degraded,
    })
}

/// `GET /api/heatmap`
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let spec = match parse_filter(&params) {
        Ok(spec) => spec,
        Err(message) => return bad_request(message),
    };

    let now = Utc::now();
    let reports = match load_reports(state.store.as_ref(), now).await {
        Ok(reports) => reports,
        Err(e) => return store_failure(&e),
    };

    let outcome = filter_incidents(&reports, &spec, now);
    let shown = outcome.shown();
    let center = map_center(&outcome.heat_points);

    let incidents = outcome
        .filtered
        .into_iter()
        .map(|report| api_report(report, now))
        .collect();

    HttpResponse::Ok().json(ApiHeatmap {
        incidents,
        heat_points: outcome.heat_points,
        shown,
        total: outcome.total,
        center,
    })
}

/// `GET /api/heatmap/geojson`
///
/// Same filters as [`heatmap`], exported as a GeoJSON `FeatureCollection`.
pub async fn heatmap_geojson(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let spec = match parse_filter(&params) {
        Ok(spec) => spec,
        Err(message) => return bad_request(message),
    };

    let now = Utc::now();
    let reports = match load_reports(state.store.as_ref(), now).await {
        Ok(reports) => reports,
        Err(e) => return store_failure(&e),
    };

    let outcome = filter_incidents(&reports, &spec, now);
    let collection = to_feature_collection(&outcome.filtered);

    match serde_json::to_string(&collection) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/geo+json")
            .body(body),
        Err(e) => {
            log::error!("Failed to serialize GeoJSON: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to export GeoJSON"))
        }
    }
}

/// `GET /api/incident-types`
///
/// Distinct incident types present in the store, sorted.
pub async fn incident_types(state: web::Data<AppState>) -> HttpResponse {
    let reports = match load_reports(state.store.as_ref(), Utc::now()).await {
        Ok(reports) => reports,
        Err(e) => return store_failure(&e),
    };

    let types: Vec<ApiIncidentType> = available_types(&reports)
        .into_iter()
        .map(|name| ApiIncidentType {
            color: incident_color(&name).to_string(),
            name,
        })
        .collect();

    HttpResponse::Ok().json(types)
}

fn api_report(report: IncidentReport, now: chrono::DateTime<Utc>) -> ApiReport {
    let time_ago = format_time_ago(report.timestamp, now);
    ApiReport::new(ReportView::from(report), time_ago)
}

/// Parses heatmap query parameters into a [`FilterSpec`].
///
/// `types` and `severities` are comma-separated; blank entries are ignored.
fn parse_filter(params: &HeatmapQueryParams) -> Result<FilterSpec, String> {
    let mut spec = FilterSpec::default();

    for incident_type in split_list(params.types.as_deref()) {
        spec.types.insert(incident_type.to_string());
    }

    for label in split_list(params.severities.as_deref()) {
        let severity = label
            .parse::<Severity>()
            .map_err(|_| format!("Unknown severity: {label}"))?;
        spec.severities.insert(severity);
    }

    if let Some(range) = params.time_range.as_deref() {
        let time_range = range
            .trim()
            .parse::<TimeRange>()
            .map_err(|_| format!("Unknown timeRange: {range}"))?;
        spec = spec.with_time_range(time_range);
    }

    Ok(spec)
}

fn split_list(s: Option<&str>) -> impl Iterator<Item = &str> {
    s.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new(message))
}

fn store_failure(e: &safe_steps_store::StoreError) -> HttpResponse {
    log::error!("Failed to load reports: {e}");
    HttpResponse::InternalServerError().json(ApiError::new("Failed to load reports"))
}
