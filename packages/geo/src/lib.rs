#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance, bearing and offset helpers.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. All functions are pure and total.

use safe_steps_incident_models::GeoPoint;

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Converts degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

/// Haversine great-circle distance between two points, in kilometres.
///
/// Symmetric in its arguments and exactly `0.0` for identical points.
#[must_use]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    // Absolute deltas keep the result bit-for-bit symmetric.
    let d_lat = deg_to_rad((b.latitude - a.latitude).abs());
    let d_lon = deg_to_rad((b.longitude - a.longitude).abs());

    let h = (d_lat / 2.0).sin().powi(2)
        + deg_to_rad(a.latitude).cos()
            * deg_to_rad(b.latitude).cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial bearing from `from` towards `to`, in degrees clockwise from
/// north, normalized to `0..360`.
#[must_use]
pub fn initial_bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = deg_to_rad(from.latitude);
    let phi2 = deg_to_rad(to.latitude);
    let d_lon = deg_to_rad(to.longitude - from.longitude);

    let y = d_lon.sin() * phi2.cos();
    let x = phi1.cos().mul_add(phi2.sin(), -(phi1.sin() * phi2.cos() * d_lon.cos()));

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Offsets `origin` by `distance_deg` degrees in direction `angle_rad`
/// (0 = north, `π/2` = east) on a flat lat/lng plane.
///
/// This is a small-distance approximation: it ignores meridian
/// convergence, so the east-west component shrinks in real distance as
/// latitude grows.
#[must_use]
pub fn offset_planar(origin: GeoPoint, distance_deg: f64, angle_rad: f64) -> GeoPoint {
    GeoPoint::new(
        distance_deg.mul_add(angle_rad.cos(), origin.latitude),
        distance_deg.mul_add(angle_rad.sin(), origin.longitude),
    )
}

/// Clamps latitude to `-90..=90` and wraps longitude into `-180..180`.
#[must_use]
pub fn normalize(point: GeoPoint) -> GeoPoint {
    let longitude = if (-180.0..=180.0).contains(&point.longitude) {
        point.longitude
    } else {
        (point.longitude + 180.0).rem_euclid(360.0) - 180.0
    };
    GeoPoint::new(point.latitude.clamp(-90.0, 90.0), longitude)
}
