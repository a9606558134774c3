#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Where the user is, and what the place is called.
//!
//! [`LocationProvider`] supplies the user's coordinate and
//! [`LocalityResolver`] turns a coordinate into a place name. Both may
//! fail; [`locate`] and [`resolve_area_name`] turn those failures into the
//! fallbacks the rest of the system expects (no origin, and a generic area
//! name respectively).

pub mod nominatim;

pub use nominatim::NominatimResolver;

use async_trait::async_trait;
use safe_steps_incident_models::{DEFAULT_AREA_NAME, GeoPoint};
use serde::{Deserialize, Serialize};

/// Errors that can occur while locating the user or resolving a place.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// Permission denied or the provider could not produce a fix.
    #[error("Location unavailable: {message}")]
    Unavailable {
        /// Why no location could be produced.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Administrative names for a point, most specific first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub city: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
}

impl Locality {
    /// The most specific non-blank name: city, then region, then subregion.
    #[must_use]
    pub fn area_name(&self) -> Option<&str> {
        [&self.city, &self.region, &self.subregion]
            .into_iter()
            .filter_map(|name| name.as_deref().map(str::trim))
            .find(|name| !name.is_empty())
    }
}

/// Supplies the user's current coordinate.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LocationError::Unavailable`] if no fix can be obtained.
    async fn current_location(&self) -> Result<GeoPoint, LocationError>;
}

/// Reverse-geocodes a coordinate into a [`Locality`].
#[async_trait]
pub trait LocalityResolver: Send + Sync {
    /// Returns `None` when the point has no known locality.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if the lookup fails.
    async fn resolve(&self, point: GeoPoint) -> Result<Option<Locality>, LocationError>;
}

/// A provider that always reports the same coordinate, or none at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    point: Option<GeoPoint>,
}

impl FixedLocationProvider {
    #[must_use]
    pub const fn new(point: Option<GeoPoint>) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Result<GeoPoint, LocationError> {
        let point = self.point.ok_or_else(|| LocationError::Unavailable {
            message: "no location supplied".to_string(),
        })?;

        point.validate().map_err(|e| LocationError::Unavailable {
            message: e.to_string(),
        })?;

        Ok(point)
    }
}

/// A resolver that always answers with the same locality. Useful when
/// reverse geocoding is disabled.
#[derive(Debug, Clone, Default)]
pub struct FixedLocalityResolver {
    locality: Option<Locality>,
}

impl FixedLocalityResolver {
    #[must_use]
    pub const fn new(locality: Option<Locality>) -> Self {
        Self { locality }
    }
}

#[async_trait]
impl LocalityResolver for FixedLocalityResolver {
    async fn resolve(&self, _point: GeoPoint) -> Result<Option<Locality>, LocationError> {
        Ok(self.locality.clone())
    }
}

/// Asks `provider` for the user's location, logging and swallowing
/// failures so callers can fall back to the no-origin path.
pub async fn locate(provider: &dyn LocationProvider) -> Option<GeoPoint> {
    match provider.current_location().await {
        Ok(point) => Some(point),
        Err(e) => {
            log::warn!("Proceeding without a location: {e}");
            None
        }
    }
}

/// Resolves a display name for the area around `point`, falling back to
/// [`DEFAULT_AREA_NAME`] when the resolver fails or knows nothing.
pub async fn resolve_area_name(resolver: &dyn LocalityResolver, point: GeoPoint) -> String {
    match resolver.resolve(point).await {
        Ok(Some(locality)) => locality
            .area_name()
            .map_or_else(|| DEFAULT_AREA_NAME.to_string(), ToString::to_string),
        Ok(None) => DEFAULT_AREA_NAME.to_string(),
        Err(e) => {
            log::error!(
                "Locality lookup for ({}, {}) failed: {e}",
                point.latitude,
                point.longitude
            );
            DEFAULT_AREA_NAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: GeoPoint = GeoPoint::new(28.6139, 77.2090);

    struct BrokenResolver;

    #[async_trait]
    impl LocalityResolver for BrokenResolver {
        async fn resolve(&self, _point: GeoPoint) -> Result<Option<Locality>, LocationError> {
            Err(LocationError::RateLimited)
        }
    }

    fn locality(city: Option<&str>, region: Option<&str>, subregion: Option<&str>) -> Locality {
        Locality {
            city: city.map(ToString::to_string),
            region: region.map(ToString::to_string),
            subregion: subregion.map(ToString::to_string),
        }
    }

    #[test]
    fn area_name_prefers_city_then_region_then_subregion() {
        assert_eq!(
            locality(Some("New Delhi"), Some("Delhi"), None).area_name(),
            Some("New Delhi")
        );
        assert_eq!(
            locality(Some("  "), Some("Delhi"), Some("Central")).area_name(),
            Some("Delhi")
        );
        assert_eq!(
            locality(None, None, Some("Central Delhi")).area_name(),
            Some("Central Delhi")
        );
        assert_eq!(Locality::default().area_name(), None);
    }

    #[tokio::test]
    async fn resolve_area_name_falls_back() {
        let known = FixedLocalityResolver::new(Some(locality(None, Some("Delhi"), None)));
        assert_eq!(resolve_area_name(&known, DELHI).await, "Delhi");

        let empty = FixedLocalityResolver::new(Some(Locality::default()));
        assert_eq!(resolve_area_name(&empty, DELHI).await, "your area");

        let unknown = FixedLocalityResolver::new(None);
        assert_eq!(resolve_area_name(&unknown, DELHI).await, "your area");

        assert_eq!(resolve_area_name(&BrokenResolver, DELHI).await, "your area");
    }

    #[tokio::test]
    async fn fixed_provider() {
        let provider = FixedLocationProvider::new(Some(DELHI));
        assert_eq!(locate(&provider).await, Some(DELHI));

        let denied = FixedLocationProvider::new(None);
        assert!(matches!(
            denied.current_location().await,
            Err(LocationError::Unavailable { .. })
        ));
        assert_eq!(locate(&denied).await, None);

        let bogus = FixedLocationProvider::new(Some(GeoPoint::new(120.0, 0.0)));
        assert_eq!(locate(&bogus).await, None);
    }
}
