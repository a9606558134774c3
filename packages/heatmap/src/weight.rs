//! Severity to heat intensity.

use safe_steps_incident_models::Severity;

/// Heat weight of a severity label, case-insensitive.
///
/// Unknown and empty labels weigh the same as `low`.
#[must_use]
pub fn weight_of(severity: &str) -> f64 {
    severity_weight(Severity::from_label(severity))
}

/// Heat weight of a parsed [`Severity`].
#[must_use]
pub const fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 1.0,
        Severity::High => 0.8,
        Severity::Medium => 0.5,
        Severity::Low => 0.3,
    }
}
