//! Nominatim / OpenStreetMap reverse geocoder.
//!
//! The public instance allows **1 request per second** and requires an
//! identifying `User-Agent`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use async_trait::async_trait;
use safe_steps_incident_models::GeoPoint;

use crate::{LocalityResolver, Locality, LocationError};

/// Default reverse endpoint of the public instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Reverse geocoder backed by a Nominatim `/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimResolver {
    /// Creates a resolver that identifies itself as `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, LocationError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl LocalityResolver for NominatimResolver {
    async fn resolve(&self, point: GeoPoint) -> Result<Option<Locality>, LocationError> {
        let lat = point.latitude.to_string();
        let lon = point.longitude.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LocationError::RateLimited);
        }

        let body: serde_json::Value = resp.error_for_status()?.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim reverse response.
///
/// City falls back to town and then village; region is the state and
/// subregion the county.
fn parse_response(body: &serde_json::Value) -> Result<Option<Locality>, LocationError> {
    if body.get("error").is_some() {
        return Ok(None);
    }

    let address = body["address"]
        .as_object()
        .ok_or_else(|| LocationError::Parse {
            message: "Missing address in Nominatim response".to_string(),
        })?;

    let field = |key: &str| address.get(key).and_then(|v| v.as_str()).map(String::from);

    Ok(Some(Locality {
        city: field("city").or_else(|| field("town")).or_else(|| field("village")),
        region: field("state"),
        subregion: field("county"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_state_county() {
        let body = serde_json::json!({
            "display_name": "Connaught Place, New Delhi, Delhi, India",
            "address": {
                "suburb": "Connaught Place",
                "city": "New Delhi",
                "county": "New Delhi District",
                "state": "Delhi",
                "country": "India"
            }
        });
        let locality = parse_response(&body).unwrap().unwrap();
        assert_eq!(locality.city.as_deref(), Some("New Delhi"));
        assert_eq!(locality.region.as_deref(), Some("Delhi"));
        assert_eq!(locality.subregion.as_deref(), Some("New Delhi District"));
        assert_eq!(locality.area_name(), Some("New Delhi"));
    }

    #[test]
    fn town_and_village_stand_in_for_city() {
        let body = serde_json::json!({ "address": { "village": "Sohna", "state": "Haryana" } });
        let locality = parse_response(&body).unwrap().unwrap();
        assert_eq!(locality.city.as_deref(), Some("Sohna"));

        let body = serde_json::json!({ "address": { "town": "Manali", "village": "Old Manali" } });
        let locality = parse_response(&body).unwrap().unwrap();
        assert_eq!(locality.city.as_deref(), Some("Manali"));
    }

    #[test]
    fn ocean_points_have_no_locality() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn missing_address_is_a_parse_error() {
        let body = serde_json::json!({ "display_name": "somewhere" });
        assert!(matches!(
            parse_response(&body),
            Err(LocationError::Parse { .. })
        ));
    }
}
