//! Shapes consumed by map renderers.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use safe_steps_incident_models::{GeoPoint, HeatPoint, IncidentReport, incident_color};

use crate::weight::severity_weight;

/// Center used when there is nothing to center on (New Delhi).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(28.6139, 77.2090);

/// Where to center the map: the first heat point, else [`DEFAULT_CENTER`].
#[must_use]
pub fn map_center(points: &[HeatPoint]) -> GeoPoint {
    points
        .first()
        .map_or(DEFAULT_CENTER, |p| GeoPoint::new(p.lat, p.lng))
}

/// `[lat, lng, weight]` triples, the format most heat layers take.
#[must_use]
pub fn heat_triples(points: &[HeatPoint]) -> Vec<[f64; 3]> {
    points.iter().map(|p| [p.lat, p.lng, p.weight]).collect()
}

/// Exports the located reports as GeoJSON point features.
///
/// Reports without a location are skipped.
#[must_use]
pub fn to_feature_collection(reports: &[IncidentReport]) -> FeatureCollection {
    let features: Vec<Feature> = reports
        .iter()
        .filter_map(|report| {
            let location = report.location?;
            let geometry = Geometry::new(Value::Point(vec![location.longitude, location.latitude]));

            Some(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::String(report.id.clone())),
                properties: Some(properties(report)),
                foreign_members: None,
            })
        })
        .collect();

    log::debug!("Exporting {} of {} reports as GeoJSON", features.len(), reports.len());

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn properties(report: &IncidentReport) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("type".to_string(), JsonValue::from(report.incident_type.clone()));
    properties.insert(
        "severity".to_string(),
        JsonValue::from(report.severity.as_ref()),
    );
    properties.insert(
        "weight".to_string(),
        JsonValue::from(severity_weight(report.severity)),
    );
    properties.insert(
        "color".to_string(),
        JsonValue::from(incident_color(&report.incident_type)),
    );
    properties.insert(
        "description".to_string(),
        JsonValue::from(report.description.clone()),
    );
    properties.insert(
        "locationName".to_string(),
        JsonValue::from(report.location_label()),
    );
    properties.insert(
        "timestamp".to_string(),
        JsonValue::from(report.timestamp.to_rfc3339()),
    );
    properties
}
