#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SOS and check-in support logic.
//!
//! This crate decides *what* an alert says, *who* it would go to and
//! *when* a missed check-in fires. Delivering it (SMS, push, persistence)
//! is left to the caller.

pub mod contacts;
pub mod directions;
pub mod message;
pub mod timer;

pub use contacts::{RawContact, TrustedContact, validate_contacts};
pub use directions::{Platform, directions_url};
pub use message::{share_message, sos_message};
pub use timer::{CheckInTimer, DEFAULT_CHECK_IN_SECS, TimerState, format_countdown};

use chrono::{DateTime, Utc};
use safe_steps_incident_models::GeoPoint;
use serde::{Deserialize, Serialize};

/// Errors raised by SOS operations.
#[derive(Debug, thiserror::Error)]
pub enum SosError {
    /// The requested check-in duration is not positive.
    #[error("Invalid check-in duration: {minutes} minutes")]
    InvalidDuration {
        /// Minutes that were requested.
        minutes: u32,
    },

    /// A check-in is already counting down.
    #[error("A check-in timer is already running")]
    TimerAlreadyRunning,

    /// The user has no emergency contacts configured.
    #[error("No emergency contacts found")]
    NoTrustedContacts,

    /// A contact is missing its name or phone number.
    #[error("Invalid contact at position {index}: name and phone are required")]
    InvalidContact {
        /// Position of the contact in the input list.
        index: usize,
    },
}

/// Record of a raised SOS alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    /// Unique alert identifier.
    pub id: String,
    /// Latitude the alert was raised at.
    pub latitude: f64,
    /// Longitude the alert was raised at.
    pub longitude: f64,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
}

impl SosAlert {
    /// Creates an alert for `point` with a fresh identifier.
    #[must_use]
    pub fn new(point: GeoPoint, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            latitude: point.latitude,
            longitude: point.longitude,
            timestamp: now,
        }
    }

    /// The alert position.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Message that would accompany this alert.
    #[must_use]
    pub fn message(&self) -> String {
        sos_message(self.point())
    }
}
