#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the SafeSteps server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract.

use chrono::{DateTime, Utc};
use safe_steps_incident_models::{
    GeoPoint, HeatPoint, ReportView, SafeSpot, Severity, incident_color,
};
use serde::{Deserialize, Serialize};

/// An incident report as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    /// Store identifier.
    pub id: String,
    /// Incident category.
    #[serde(rename = "type")]
    pub incident_type: String,
    /// Free-text description.
    pub description: String,
    /// Severity level.
    pub severity: Severity,
    /// Latitude, if the report is located.
    pub latitude: Option<f64>,
    /// Longitude, if the report is located.
    pub longitude: Option<f64>,
    /// Place name, or "Unknown location".
    pub location_name: String,
    /// When the incident was reported (ISO 8601).
    pub timestamp: DateTime<Utc>,
    /// Whether a moderator verified the report.
    pub verified: bool,
    /// Distance from the requested point, in kilometres.
    pub distance_km: Option<f64>,
    /// Relative age, e.g. "2 hours ago".
    pub time_ago: String,
    /// Marker color for the incident type.
    pub color: String,
}

impl ApiReport {
    /// Builds the API shape of `view`, with a precomputed relative age.
    #[must_use]
    pub fn new(view: ReportView, time_ago: String) -> Self {
        let ReportView {
            report,
            distance_km,
        } = view;

        Self {
            latitude: report.location.map(|p| p.latitude),
            longitude: report.location.map(|p| p.longitude),
            location_name: report.location_label().to_string(),
            color: incident_color(&report.incident_type).to_string(),
            id: report.id,
            incident_type: report.incident_type,
            description: report.description,
            severity: report.severity,
            timestamp: report.timestamp,
            verified: report.verified,
            distance_km,
            time_ago,
        }
    }
}

/// Query parameters for the nearby reports endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// Latitude of the user. Must be given together with `lng`.
    pub lat: Option<f64>,
    /// Longitude of the user. Must be given together with `lat`.
    pub lng: Option<f64>,
    /// Search radius in kilometres.
    pub radius_km: Option<f64>,
}

/// Query parameters for the safe spots endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeSpotQueryParams {
    /// Latitude of the reference point.
    pub lat: f64,
    /// Longitude of the reference point.
    pub lng: f64,
    /// Area name. Resolved from the coordinate when absent.
    pub area: Option<String>,
    /// Seed for reproducible spots.
    pub seed: Option<u64>,
    /// Client platform for directions links (`ios`, `android`, `web`).
    pub platform: Option<String>,
}

/// A safe spot as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSafeSpot {
    /// The generated spot.
    #[serde(flatten)]
    pub spot: SafeSpot,
    /// Deep link opening directions to the spot.
    pub directions_url: String,
}

/// Response from the safe spots endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSafeSpots {
    /// Area name the spots were generated for.
    pub area_name: String,
    /// Spots, nearest first.
    pub spots: Vec<ApiSafeSpot>,
    /// Whether generation failed and `spots` is a fallback.
    pub degraded: bool,
}

/// Query parameters for the heatmap endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapQueryParams {
    /// Comma-separated incident types to include.
    pub types: Option<String>,
    /// Comma-separated severities to include.
    pub severities: Option<String>,
    /// One of `all`, `day`, `week`, `month`, `year`.
    pub time_range: Option<String>,
}

/// Response from the heatmap endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeatmap {
    /// Reports passing the filter.
    pub incidents: Vec<ApiReport>,
    /// Weighted points of the located reports.
    pub heat_points: Vec<HeatPoint>,
    /// Number of reports passing the filter.
    pub shown: usize,
    /// Number of reports before filtering.
    pub total: usize,
    /// Suggested map center.
    pub center: GeoPoint,
}

/// An incident type available for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidentType {
    /// Type name.
    pub name: String,
    /// Marker color.
    pub color: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use safe_steps_incident_models::IncidentReport;

    #[test]
    fn api_report_flattens_location_and_labels() {
        let report = IncidentReport {
            id: "r1".to_string(),
            incident_type: "Harassment".to_string(),
            description: "Verbal abuse".to_string(),
            severity: Severity::High,
            location: Some(GeoPoint::new(28.6145, 77.2025)),
            location_name: None,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
            verified: false,
        };
        let view = ReportView {
            report,
            distance_km: Some(0.64),
        };

        let json = serde_json::to_value(ApiReport::new(view, "2 hours ago".to_string())).unwrap();

        assert_eq!(json["type"], "Harassment");
        assert_eq!(json["severity"], "High");
        assert_eq!(json["latitude"], 28.6145);
        assert_eq!(json["locationName"], "Unknown location");
        assert_eq!(json["distanceKm"], 0.64);
        assert_eq!(json["timeAgo"], "2 hours ago");
        assert_eq!(json["color"], "#FF5722");
    }

    #[test]
    fn nearby_params_are_optional() {
        let params: NearbyQueryParams =
            serde_json::from_value(serde_json::json!({ "radiusKm": 2.0 })).unwrap();
        assert!(params.lat.is_none());
        assert_eq!(params.radius_km, Some(2.0));
    }
}
