//! The incident filter engine.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Months, Utc};
use safe_steps_incident_models::{FilterSpec, HeatPoint, IncidentReport, TimeRange};

use crate::weight::severity_weight;

/// Result of applying a [`FilterSpec`] to a report set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Reports passing every active axis, in input order.
    pub filtered: Vec<IncidentReport>,
    /// Weighted coordinates of the located reports in `filtered`.
    pub heat_points: Vec<HeatPoint>,
    /// Size of the unfiltered input.
    pub total: usize,
}

impl FilterOutcome {
    /// Number of reports that passed the filter.
    #[must_use]
    pub fn shown(&self) -> usize {
        self.filtered.len()
    }

    /// "Showing X of Y incidents".
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} of {} incidents", self.shown(), self.total)
    }
}

/// Earliest timestamp kept by `time_range`, or `None` when the range is
/// unbounded.
///
/// Month and year are calendar-relative: one month before March 31 is
/// February 28 (or 29), not 30 days earlier.
#[must_use]
pub fn time_cutoff(time_range: TimeRange, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match time_range {
        TimeRange::All => None,
        TimeRange::Day => now.checked_sub_signed(Duration::days(1)),
        TimeRange::Week => now.checked_sub_signed(Duration::days(7)),
        TimeRange::Month => now.checked_sub_months(Months::new(1)),
        TimeRange::Year => now.checked_sub_months(Months::new(12)),
    }
}

/// Applies `spec` to `all`.
///
/// An empty type or severity set leaves that axis unrestricted. All axes
/// are combined with AND. Reports without a location may appear in
/// `filtered` but never contribute a heat point.
#[must_use]
pub fn filter_incidents(
    all: &[IncidentReport],
    spec: &FilterSpec,
    now: DateTime<Utc>,
) -> FilterOutcome {
    let cutoff = time_cutoff(spec.time_range, now);

    let filtered: Vec<IncidentReport> = all
        .iter()
        .filter(|report| spec.types.is_empty() || spec.types.contains(&report.incident_type))
        .filter(|report| spec.severities.is_empty() || spec.severities.contains(&report.severity))
        .filter(|report| cutoff.is_none_or(|cutoff| report.timestamp >= cutoff))
        .cloned()
        .collect();

    let heat_points: Vec<HeatPoint> = filtered
        .iter()
        .filter_map(|report| {
            let location = report.location?;
            Some(HeatPoint {
                lat: location.latitude,
                lng: location.longitude,
                weight: severity_weight(report.severity),
            })
        })
        .collect();

    log::debug!(
        "Filter kept {} of {} reports ({} heat points)",
        filtered.len(),
        all.len(),
        heat_points.len()
    );

    FilterOutcome {
        filtered,
        heat_points,
        total: all.len(),
    }
}

/// Distinct incident types present in `all`, sorted.
#[must_use]
pub fn available_types(all: &[IncidentReport]) -> BTreeSet<String> {
    all.iter().map(|report| report.incident_type.clone()).collect()
}
