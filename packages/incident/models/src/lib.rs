#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident report, safe spot, heat point and filter types.
//!
//! Raw records coming out of the report store are represented by
//! [`IncidentRecord`], where every field but the id may be missing. They
//! are normalized once into the immutable [`IncidentReport`]; anything
//! derived relative to a reference coordinate (distance) lives on the
//! separate [`ReportView`] so the two are never confused.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Incident type used when a record has none.
pub const UNKNOWN_INCIDENT_TYPE: &str = "Unknown";

/// Description used when a record has none.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Location label used when a report has no human-readable place name.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Area name used when the locality of a point cannot be resolved.
pub const DEFAULT_AREA_NAME: &str = "your area";

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point without range checking.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting out-of-range or non-finite components.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if the latitude is outside
    /// `-90..=90`, the longitude is outside `-180..=180`, or either is not
    /// finite.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    /// Returns `true` if both components are finite and in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Checks that both components are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] describing the offending point.
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InvalidCoordinateError {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Error returned when a coordinate is outside the WGS84 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// The latitude that was provided.
    pub latitude: f64,
    /// The longitude that was provided.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinate ({}, {}): expected latitude -90..=90 and longitude -180..=180",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// Severity of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Minor incidents. Also the fallback for unknown labels.
    #[default]
    Low,
    /// Moderate incidents.
    Medium,
    /// Serious incidents.
    High,
    /// The most severe incidents.
    Critical,
}

impl Severity {
    /// Parses a severity label case-insensitively, falling back to
    /// [`Severity::Low`] for empty or unrecognized input.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or_default()
    }

    /// Returns all variants, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// Legend color for heat-intensity rendering.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#3388ff",
            Self::Medium => "#ff9800",
            Self::High => "#ff5722",
            Self::Critical => "#f44336",
        }
    }
}

/// Location block of a raw store record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocation {
    /// Latitude, if the reporter supplied one.
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    /// Longitude, if the reporter supplied one.
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,
    /// Reverse-geocoded place name.
    #[serde(default, deserialize_with = "lenient")]
    pub location_name: Option<String>,
}

/// An incident record exactly as the report store returns it.
///
/// Only `id` is guaranteed. A field holding a value of the wrong type
/// deserializes as `None` rather than rejecting the whole record. Use
/// [`IncidentReport::from_record`] to turn it into a fully-defaulted report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Store identifier. Numeric ids are read as their decimal text.
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    /// Free-text incident category.
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub incident_type: Option<String>,
    /// Free-text description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Severity label in any casing.
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Option<String>,
    /// Where the incident happened.
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<RecordLocation>,
    /// When the incident was reported.
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Whether a moderator verified the report.
    #[serde(default, deserialize_with = "lenient")]
    pub verified: Option<bool>,
}

/// Reads a field as `Some(value)`, or `None` when it is null or of the
/// wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

/// Reads a record id from a non-blank string or an integer.
fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(id) if !id.trim().is_empty() => Ok(id),
        RawId::Text(_) => Err(serde::de::Error::custom("blank record id")),
        RawId::Unsigned(id) => Ok(id.to_string()),
        RawId::Signed(id) => Ok(id.to_string()),
    }
}

/// A normalized, immutable incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    /// Store identifier.
    pub id: String,
    /// Incident category (e.g. "Harassment").
    #[serde(rename = "type")]
    pub incident_type: String,
    /// Free-text description.
    pub description: String,
    /// Normalized severity.
    pub severity: Severity,
    /// Coordinate, when the record carried a complete and valid one.
    pub location: Option<GeoPoint>,
    /// Human-readable place name.
    pub location_name: Option<String>,
    /// When the incident was reported.
    pub timestamp: DateTime<Utc>,
    /// Whether a moderator verified the report.
    pub verified: bool,
}

impl IncidentReport {
    /// Normalizes a raw store record, defaulting every missing or malformed
    /// field instead of failing.
    ///
    /// `now` is used as the timestamp of records that have none.
    #[must_use]
    pub fn from_record(record: IncidentRecord, now: DateTime<Utc>) -> Self {
        let (location, location_name) = match record.location {
            Some(raw) => (raw_point(&record.id, &raw), non_blank(raw.location_name)),
            None => (None, None),
        };

        Self {
            incident_type: non_blank(record.incident_type)
                .unwrap_or_else(|| UNKNOWN_INCIDENT_TYPE.to_string()),
            description: non_blank(record.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            severity: record
                .severity
                .as_deref()
                .map(Severity::from_label)
                .unwrap_or_default(),
            location,
            location_name,
            timestamp: record.timestamp.unwrap_or(now),
            verified: record.verified.unwrap_or(false),
            id: record.id,
        }
    }

    /// Returns the place name, or a placeholder when there is none.
    #[must_use]
    pub fn location_label(&self) -> &str {
        self.location_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }
}

fn raw_point(id: &str, raw: &RecordLocation) -> Option<GeoPoint> {
    let (Some(latitude), Some(longitude)) = (raw.latitude, raw.longitude) else {
        log::debug!("Report {id} has an incomplete location");
        return None;
    };

    match GeoPoint::try_new(latitude, longitude) {
        Ok(point) => Some(point),
        Err(e) => {
            log::warn!("Report {id} location dropped: {e}");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// A report together with values derived relative to a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    /// The underlying report.
    #[serde(flatten)]
    pub report: IncidentReport,
    /// Great-circle distance from the reference point, in kilometres.
    /// `None` when no reference point was supplied.
    pub distance_km: Option<f64>,
}

impl From<IncidentReport> for ReportView {
    fn from(report: IncidentReport) -> Self {
        Self {
            report,
            distance_km: None,
        }
    }
}

/// Category of a synthesized safe spot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SafeSpotCategory {
    /// Police stations and security offices.
    Police,
    /// Shelters and crisis centers.
    Shelter,
    /// Hospitals and emergency care.
    Hospital,
    /// Help and community centers.
    #[serde(rename = "Help Center")]
    #[strum(serialize = "Help Center")]
    HelpCenter,
}

impl SafeSpotCategory {
    /// Returns all variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Police, Self::Shelter, Self::Hospital, Self::HelpCenter]
    }
}

/// A synthesized candidate safe location near a reference point.
///
/// These are plausible placeholders, not verified venues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeSpot {
    /// Display name, e.g. "Connaught Place Police Outpost".
    pub name: String,
    /// Spot category.
    #[serde(rename = "type")]
    pub category: SafeSpotCategory,
    /// Availability label, e.g. "Open 24/7".
    pub status: String,
    /// Free-text address.
    pub address: String,
    /// Where the spot is.
    pub coordinates: GeoPoint,
    /// Distance from the reference point, in kilometres.
    pub distance_km: Option<f64>,
}

/// A weighted coordinate for heat-intensity rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Intensity in `(0, 1]`.
    pub weight: f64,
}

/// Time window applied by the incident filter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum TimeRange {
    /// No time restriction.
    #[default]
    All,
    /// The last day.
    Day,
    /// The last seven days.
    Week,
    /// The last calendar month.
    Month,
    /// The last calendar year.
    Year,
}

impl TimeRange {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::All, Self::Day, Self::Week, Self::Month, Self::Year]
    }

    /// Human-readable label for filter chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Day => "Last 24hrs",
            Self::Week => "Past Week",
            Self::Month => "Past Month",
            Self::Year => "Past Year",
        }
    }
}

/// Multi-criteria incident filter.
///
/// An empty `types` or `severities` set places no restriction on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Incident types to keep.
    pub types: BTreeSet<String>,
    /// Severities to keep.
    #[serde(alias = "severity")]
    pub severities: BTreeSet<Severity>,
    /// Time window to keep.
    pub time_range: TimeRange,
}

impl FilterSpec {
    /// Returns `true` if this filter keeps every report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.severities.is_empty() && self.time_range == TimeRange::All
    }

    /// Adds the type if absent, removes it if present.
    pub fn toggle_type(&mut self, incident_type: &str) {
        if !self.types.remove(incident_type) {
            self.types.insert(incident_type.to_string());
        }
    }

    /// Adds the severity if absent, removes it if present.
    pub fn toggle_severity(&mut self, severity: Severity) {
        if !self.severities.remove(&severity) {
            self.severities.insert(severity);
        }
    }

    /// Returns this filter with the given time window.
    #[must_use]
    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Clears every axis.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Display color for an incident type.
#[must_use]
pub fn incident_color(incident_type: &str) -> &'static str {
    match incident_type.to_ascii_lowercase().as_str() {
        "harassment" => "#FF5722",
        "stalking" => "#E91E63",
        "catcalling" => "#9C27B0",
        "assault" => "#F44336",
        _ => "#FF9800",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label("high"), Severity::High);
        assert_eq!(Severity::from_label(" Medium "), Severity::Medium);
    }

    #[test]
    fn severity_legend_colors() {
        assert_eq!(Severity::Low.color(), "#3388ff");
        assert_eq!(Severity::Critical.color(), "#f44336");
    }

    #[test]
    fn severity_defaults_to_low() {
        assert_eq!(Severity::from_label(""), Severity::Low);
        assert_eq!(Severity::from_label("unknown"), Severity::Low);
    }

    #[test]
    fn geo_point_rejects_out_of_range() {
        assert!(GeoPoint::try_new(28.6, 77.2).is_ok());
        assert!(GeoPoint::try_new(91.0, 0.0).is_err());
        assert!(GeoPoint::try_new(0.0, -180.5).is_err());
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn from_record_defaults_missing_fields() {
        let record = IncidentRecord {
            id: "r1".to_string(),
            ..IncidentRecord::default()
        };
        let report = IncidentReport::from_record(record, now());

        assert_eq!(report.incident_type, UNKNOWN_INCIDENT_TYPE);
        assert_eq!(report.description, DEFAULT_DESCRIPTION);
        assert_eq!(report.severity, Severity::Low);
        assert_eq!(report.timestamp, now());
        assert!(!report.verified);
        assert!(report.location.is_none());
        assert_eq!(report.location_label(), UNKNOWN_LOCATION);
    }

    #[test]
    fn from_record_drops_partial_or_invalid_location() {
        let partial = IncidentRecord {
            id: "partial".to_string(),
            location: Some(RecordLocation {
                latitude: Some(28.6),
                longitude: None,
                location_name: Some("Metro Station".to_string()),
            }),
            ..IncidentRecord::default()
        };
        let report = IncidentReport::from_record(partial, now());
        assert!(report.location.is_none());
        assert_eq!(report.location_label(), "Metro Station");

        let invalid = IncidentRecord {
            id: "invalid".to_string(),
            location: Some(RecordLocation {
                latitude: Some(128.6),
                longitude: Some(77.2),
                location_name: None,
            }),
            ..IncidentRecord::default()
        };
        assert!(IncidentReport::from_record(invalid, now()).location.is_none());
    }

    #[test]
    fn record_deserializes_from_store_json() {
        let json = serde_json::json!({
            "id": "abc",
            "type": "Harassment",
            "severity": "high",
            "location": {
                "latitude": 28.6145,
                "longitude": 77.2025,
                "locationName": "Cafe Lane"
            },
            "timestamp": "2025-03-10T10:00:00Z",
            "verified": true
        });
        let record: IncidentRecord = serde_json::from_value(json).unwrap();
        let report = IncidentReport::from_record(record, now());

        assert_eq!(report.incident_type, "Harassment");
        assert_eq!(report.severity, Severity::High);
        assert_eq!(report.location, Some(GeoPoint::new(28.6145, 77.2025)));
        assert_eq!(report.location_label(), "Cafe Lane");
        assert!(report.verified);
    }

    #[test]
    fn filter_spec_toggles() {
        let mut spec = FilterSpec::default();
        assert!(spec.is_empty());

        spec.toggle_type("Stalking");
        spec.toggle_severity(Severity::High);
        assert!(spec.types.contains("Stalking"));
        assert!(spec.severities.contains(&Severity::High));

        spec.toggle_type("Stalking");
        assert!(spec.types.is_empty());

        spec.reset();
        assert!(spec.is_empty());
    }

    #[test]
    fn filter_spec_deserializes_with_defaults() {
        let spec: FilterSpec =
            serde_json::from_value(serde_json::json!({ "timeRange": "week" })).unwrap();
        assert!(spec.types.is_empty());
        assert!(spec.severities.is_empty());
        assert_eq!(spec.time_range, TimeRange::Week);

        let spec: FilterSpec =
            serde_json::from_value(serde_json::json!({ "severity": ["High", "Low"] })).unwrap();
        assert_eq!(spec.severities.len(), 2);
    }

    #[test]
    fn time_range_parses_and_labels() {
        assert_eq!("DAY".parse::<TimeRange>().unwrap(), TimeRange::Day);
        assert_eq!(TimeRange::Month.to_string(), "month");
        assert_eq!(TimeRange::Day.label(), "Last 24hrs");
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn help_center_round_trips_through_strings() {
        assert_eq!(SafeSpotCategory::HelpCenter.to_string(), "Help Center");
        assert_eq!(
            "Help Center".parse::<SafeSpotCategory>().unwrap(),
            SafeSpotCategory::HelpCenter
        );
        assert_eq!(
            serde_json::to_value(SafeSpotCategory::HelpCenter).unwrap(),
            serde_json::json!("Help Center")
        );
    }

    #[test]
    fn incident_colors() {
        assert_eq!(incident_color("HARASSMENT"), "#FF5722");
        assert_eq!(incident_color("Assault"), "#F44336");
        assert_eq!(incident_color("Theft"), "#FF9800");
    }

    #[test]
    fn wrong_typed_fields_deserialize_as_missing() {
        let record: IncidentRecord = serde_json::from_value(serde_json::json!({
            "id": "r9",
            "type": 42,
            "severity": 3,
            "timestamp": "yesterday",
            "verified": "yes",
            "location": { "latitude": "28.6", "longitude": 77.2, "locationName": "Saket" }
        }))
        .unwrap();

        assert_eq!(record.id, "r9");
        assert!(record.incident_type.is_none());
        assert!(record.severity.is_none());
        assert!(record.timestamp.is_none());
        assert!(record.verified.is_none());
        let location = record.location.clone().unwrap();
        assert!(location.latitude.is_none());
        assert_eq!(location.longitude, Some(77.2));
        assert_eq!(location.location_name.as_deref(), Some("Saket"));

        let report = IncidentReport::from_record(record, now());
        assert_eq!(report.severity, Severity::Low);
        assert_eq!(report.timestamp, now());
        assert!(report.location.is_none());
        assert_eq!(report.location_label(), "Saket");
    }

    #[test]
    fn record_id_must_be_usable() {
        let numeric: IncidentRecord =
            serde_json::from_value(serde_json::json!({ "id": 17 })).unwrap();
        assert_eq!(numeric.id, "17");

        assert!(serde_json::from_value::<IncidentRecord>(serde_json::json!({ "id": "  " })).is_err());
        assert!(serde_json::from_value::<IncidentRecord>(serde_json::json!({ "id": null })).is_err());
        assert!(serde_json::from_value::<IncidentRecord>(serde_json::json!({ "type": "x" })).is_err());
    }
}
