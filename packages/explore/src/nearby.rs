//! Proximity filtering and ordering of incident reports.

use safe_steps_geo::distance_km;
use safe_steps_incident_models::{GeoPoint, IncidentReport, ReportView};

/// Default search radius around the user, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Search radius that is negative or not a number.
#[derive(Debug, thiserror::Error)]
#[error("Invalid radius: {radius_km} km")]
pub struct InvalidRadiusError {
    /// The rejected radius.
    pub radius_km: f64,
}

/// Accepts a finite, non-negative search radius.
///
/// # Errors
///
/// Returns [`InvalidRadiusError`] if `radius_km` is negative, NaN or
/// infinite.
pub fn validate_radius_km(radius_km: f64) -> Result<f64, InvalidRadiusError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(InvalidRadiusError { radius_km })
    }
}

/// Projects `reports` into views ordered for the "nearby" list.
///
/// Without an `origin`, every report is returned newest first and no
/// distance is attached. With an `origin`, only located reports within
/// `radius_km` are kept, nearest first, each annotated with its distance.
/// Reports without a location cannot be ranked spatially and are left out
/// of that branch entirely.
///
/// Both orderings are stable, so ties keep their input order. The input is
/// never modified.
#[must_use]
pub fn nearby_reports(
    reports: &[IncidentReport],
    origin: Option<GeoPoint>,
    radius_km: f64,
) -> Vec<ReportView> {
    let Some(origin) = origin else {
        let mut views: Vec<ReportView> = reports.iter().cloned().map(ReportView::from).collect();
        views.sort_by(|a, b| b.report.timestamp.cmp(&a.report.timestamp));
        return views;
    };

    let mut views: Vec<(f64, ReportView)> = reports
        .iter()
        .filter_map(|report| {
            let distance = distance_km(origin, report.location?);
            (distance <= radius_km).then(|| {
                (
                    distance,
                    ReportView {
                        report: report.clone(),
                        distance_km: Some(distance),
                    },
                )
            })
        })
        .collect();

    views.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    log::debug!(
        "{} of {} reports within {radius_km} km of ({}, {})",
        views.len(),
        reports.len(),
        origin.latitude,
        origin.longitude
    );

    views.into_iter().map(|(_, view)| view).collect()
}
