//! Synthesis of candidate safe spots around a reference point.
//!
//! The generated spots are plausible placeholders, not verified venues.
//! Randomness comes from a caller-supplied [`Rng`], so a seeded generator
//! reproduces the same spots.

use rand::Rng;
use safe_steps_geo::{distance_km, normalize, offset_planar};
use safe_steps_incident_models::{DEFAULT_AREA_NAME, GeoPoint, SafeSpot, SafeSpotCategory};

use crate::GenerationError;

/// Smallest radial offset, in degrees.
pub const MIN_OFFSET_DEG: f64 = 0.0005;

/// Largest radial offset, in degrees (roughly 5 km).
pub const MAX_OFFSET_DEG: f64 = 0.045;

/// Availability labels a spot can carry.
pub const STATUS_OPTIONS: &[&str] = &[
    "Open 24/7",
    "Open Now",
    "Available",
    "Open",
    "Open until 8 PM",
    "Open until 10 PM",
];

/// Directional prefixes used to build addresses.
pub const DIRECTIONS: &[&str] = &[
    "North", "South", "East", "West", "Central", "Downtown", "Uptown",
];

/// Name templates for each category. Every generated name is
/// `"<area> <template>"`.
#[must_use]
pub const fn name_templates(category: SafeSpotCategory) -> &'static [&'static str] {
    match category {
        SafeSpotCategory::Police => &[
            "Police Station",
            "Police Outpost",
            "Security Office",
            "Women Police Station",
        ],
        SafeSpotCategory::Shelter => &[
            "Women's Shelter",
            "Crisis Center",
            "Safe Home",
            "Safety Shelter",
        ],
        SafeSpotCategory::Hospital => &[
            "Hospital",
            "Medical Center",
            "Emergency Care",
            "Women's Hospital",
        ],
        SafeSpotCategory::HelpCenter => &[
            "Women's Help Center",
            "Support Center",
            "Community Center",
            "Women's Resource Center",
        ],
    }
}

/// Result of a generation attempt that cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeSpotBatch {
    /// Generated spots, nearest first. Empty when `degraded`.
    pub spots: Vec<SafeSpot>,
    /// Whether generation failed and the caller should show a fallback.
    pub degraded: bool,
}

/// Generates one to three spots for every [`SafeSpotCategory`] around
/// `origin`, nearest first.
///
/// A blank `area_name` is replaced by [`DEFAULT_AREA_NAME`].
///
/// # Errors
///
/// * [`GenerationError::InvalidOrigin`] if `origin` is out of range
/// * [`GenerationError::NonFiniteDistance`] if a distance cannot be computed
pub fn generate_safe_spots<R: Rng + ?Sized>(
    origin: GeoPoint,
    area_name: &str,
    rng: &mut R,
) -> Result<Vec<SafeSpot>, GenerationError> {
    origin.validate()?;

    let area_name = match area_name.trim() {
        "" => DEFAULT_AREA_NAME,
        name => name,
    };

    let mut spots = Vec::new();

    for &category in SafeSpotCategory::all() {
        let templates = name_templates(category);
        let count = rng.gen_range(1..=3);

        for _ in 0..count {
            let offset_deg = rng.gen_range(MIN_OFFSET_DEG..MAX_OFFSET_DEG);
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let template = templates[rng.gen_range(0..templates.len())];
            let status = STATUS_OPTIONS[rng.gen_range(0..STATUS_OPTIONS.len())];
            let direction = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];

            let coordinates = normalize(offset_planar(origin, offset_deg, angle));
            let name = format!("{area_name} {template}");
            let distance = distance_km(origin, coordinates);

            if !distance.is_finite() {
                return Err(GenerationError::NonFiniteDistance { name });
            }

            spots.push(SafeSpot {
                name,
                category,
                status: status.to_string(),
                address: format!("{direction} {area_name}"),
                coordinates,
                distance_km: Some(distance),
            });
        }
    }

    spots.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
    });

    log::debug!("Generated {} safe spots around {area_name}", spots.len());

    Ok(spots)
}

/// Like [`generate_safe_spots`], but never fails: on error the batch is
/// empty and flagged as degraded so the caller can show a fallback state.
#[must_use]
pub fn generate_safe_spots_or_degraded<R: Rng + ?Sized>(
    origin: GeoPoint,
    area_name: &str,
    rng: &mut R,
) -> SafeSpotBatch {
    match generate_safe_spots(origin, area_name, rng) {
        Ok(spots) => SafeSpotBatch {
            spots,
            degraded: false,
        },
        Err(e) => {
            log::warn!("Safe spot generation failed: {e}");
            SafeSpotBatch {
                spots: Vec::new(),
                degraded: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    const ORIGIN: GeoPoint = GeoPoint::new(28.6139, 77.2090);

    #[test]
    fn every_category_is_represented() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let spots = generate_safe_spots(ORIGIN, "Connaught Place", &mut rng).unwrap();

            let mut counts: BTreeMap<SafeSpotCategory, usize> = BTreeMap::new();
            for spot in &spots {
                *counts.entry(spot.category).or_default() += 1;
            }

            assert_eq!(counts.len(), 4, "seed {seed}: {counts:?}");
            assert!(counts.values().all(|&c| (1..=3).contains(&c)));
            assert!((4..=12).contains(&spots.len()));
        }
    }

    #[test]
    fn spots_are_sorted_and_within_band() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let spots = generate_safe_spots(ORIGIN, "Delhi", &mut rng).unwrap();

            for spot in &spots {
                let d = spot.distance_km.unwrap();
                assert!(d > 0.0 && d <= 5.01, "seed {seed}: {d}");
                assert!(
                    (distance_km(ORIGIN, spot.coordinates) - d).abs() < 1e-12,
                    "distance must be measured from the origin"
                );
            }
            for pair in spots.windows(2) {
                assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
            }
        }
    }

    #[test]
    fn names_statuses_and_addresses_use_the_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let spots = generate_safe_spots(ORIGIN, "Karol Bagh", &mut rng).unwrap();

        for spot in &spots {
            let template = spot.name.strip_prefix("Karol Bagh ").unwrap();
            assert!(name_templates(spot.category).contains(&template));
            assert!(STATUS_OPTIONS.contains(&spot.status.as_str()));

            let direction = spot.address.strip_suffix(" Karol Bagh").unwrap();
            assert!(DIRECTIONS.contains(&direction));
        }
    }

    #[test]
    fn same_seed_reproduces_same_spots() {
        let a = generate_safe_spots(ORIGIN, "Delhi", &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_safe_spots(ORIGIN, "Delhi", &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn blank_area_name_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let spots = generate_safe_spots(ORIGIN, "   ", &mut rng).unwrap();
        assert!(spots.iter().all(|s| s.name.starts_with("your area ")));
        assert!(spots.iter().all(|s| s.address.ends_with(" your area")));
    }

    #[test]
    fn invalid_origin_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = generate_safe_spots(GeoPoint::new(95.0, 77.0), "Delhi", &mut rng);
        assert!(matches!(result, Err(GenerationError::InvalidOrigin(_))));

        let result = generate_safe_spots(GeoPoint::new(f64::NAN, 77.0), "Delhi", &mut rng);
        assert!(matches!(result, Err(GenerationError::InvalidOrigin(_))));
    }

    #[test]
    fn degraded_batch_on_failure() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = generate_safe_spots_or_degraded(GeoPoint::new(0.0, 500.0), "Delhi", &mut rng);
        assert!(batch.degraded);
        assert!(batch.spots.is_empty());

        let batch = generate_safe_spots_or_degraded(ORIGIN, "Delhi", &mut rng);
        assert!(!batch.degraded);
        assert!(!batch.spots.is_empty());
    }

    #[test]
    fn generated_points_stay_in_range_near_the_pole() {
        let mut rng = StdRng::seed_from_u64(3);
        let spots = generate_safe_spots(GeoPoint::new(89.99, 179.99), "Arctic", &mut rng).unwrap();
        assert!(spots.iter().all(|s| s.coordinates.is_valid()));
    }
}
