#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nearby incident ranking and safe spot synthesis.
//!
//! Everything here is a pure, synchronous projection over an immutable
//! snapshot: callers fetch the user's location and the report list, then
//! call into [`nearby`] and [`safe_spots`] as often as the location is
//! refreshed. No state is carried between calls.

pub mod nearby;
pub mod safe_spots;
pub mod time_ago;

pub use nearby::{DEFAULT_RADIUS_KM, InvalidRadiusError, nearby_reports, validate_radius_km};
pub use safe_spots::{SafeSpotBatch, generate_safe_spots, generate_safe_spots_or_degraded};
pub use time_ago::format_time_ago;

use safe_steps_incident_models::InvalidCoordinateError;

/// Errors that can occur while synthesizing safe spots.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The reference coordinate is out of range or not finite.
    #[error("Invalid origin: {0}")]
    InvalidOrigin(#[from] InvalidCoordinateError),

    /// A generated spot's distance could not be computed.
    #[error("Non-finite distance computed for safe spot {name}")]
    NonFiniteDistance {
        /// Name of the offending spot.
        name: String,
    },
}
