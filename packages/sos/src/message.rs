//! Alert and share message text.

use safe_steps_incident_models::{GeoPoint, IncidentReport};

/// Text sent to trusted contacts when an SOS is raised.
#[must_use]
pub fn sos_message(point: GeoPoint) -> String {
    format!(
        "🚨 SOS ALERT from SafeSteps\nI need help! My location: https://maps.google.com/?q={},{}",
        point.latitude, point.longitude
    )
}

/// Text used when sharing a report with others.
#[must_use]
pub fn share_message(report: &IncidentReport) -> String {
    format!(
        "Safety Alert: {} reported at {}. {} #SafeSteps",
        report.incident_type,
        report.location_label(),
        report.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone as _, Utc};
    use safe_steps_incident_models::Severity;

    #[test]
    fn sos_message_links_to_location() {
        assert_eq!(
            sos_message(GeoPoint::new(28.6139, 77.209)),
            "🚨 SOS ALERT from SafeSteps\nI need help! My location: https://maps.google.com/?q=28.6139,77.209"
        );
    }

    #[test]
    fn share_message_falls_back_to_unknown_location() {
        let mut report = IncidentReport {
            id: "r1".to_string(),
            incident_type: "Catcalling".to_string(),
            description: "Group near the bus stop".to_string(),
            severity: Severity::Medium,
            location: None,
            location_name: None,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            verified: false,
        };

        assert_eq!(
            share_message(&report),
            "Safety Alert: Catcalling reported at Unknown location. Group near the bus stop #SafeSteps"
        );

        report.location_name = Some("Lajpat Nagar".to_string());
        assert_eq!(
            share_message(&report),
            "Safety Alert: Catcalling reported at Lajpat Nagar. Group near the bus stop #SafeSteps"
        );
    }
}
