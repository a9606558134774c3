//! Navigation deep links.

use safe_steps_incident_models::GeoPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Client platform, which decides the maps URL scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    /// Apple Maps.
    Ios,
    /// Google Maps navigation intent.
    Android,
    /// Google Maps in a browser.
    #[default]
    Web,
}

/// Deep link that opens turn-by-turn directions to `destination`.
#[must_use]
pub fn directions_url(destination: GeoPoint, platform: Platform) -> String {
    let GeoPoint {
        latitude,
        longitude,
    } = destination;

    match platform {
        Platform::Ios => format!("maps://app?daddr={latitude},{longitude}"),
        Platform::Android => format!("google.navigation:q={latitude},{longitude}"),
        Platform::Web => {
            format!("https://www.google.com/maps/search/?api=1&query={latitude},{longitude}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPOT: GeoPoint = GeoPoint::new(28.63, 77.22);

    #[test]
    fn per_platform_schemes() {
        assert_eq!(directions_url(SPOT, Platform::Ios), "maps://app?daddr=28.63,77.22");
        assert_eq!(
            directions_url(SPOT, Platform::Android),
            "google.navigation:q=28.63,77.22"
        );
        assert_eq!(
            directions_url(SPOT, Platform::Web),
            "https://www.google.com/maps/search/?api=1&query=28.63,77.22"
        );
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("ANDROID".parse::<Platform>().unwrap(), Platform::Android);
        assert!("symbian".parse::<Platform>().is_err());
    }
}
