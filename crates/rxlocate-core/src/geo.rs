//! Great-circle distance, radius filtering, and proximity ranking.
//!
//! Three radii exist for three different purposes and are deliberately kept
//! separate: the map/list display radius, the candidate pool for report
//! search, and the view box handed to the authoritative search provider.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3_959.0;

const MILES_PER_LAT_DEGREE: f64 = 69.0;
const MILES_PER_KM: f64 = 0.621_371;

/// Radius of the pharmacy map/list display.
pub const DISPLAY_RADIUS_MILES: f64 = 15.0;

/// Radius of the local candidate pool when searching for a pharmacy to report on.
pub const REPORT_SEARCH_RADIUS_MILES: f64 = 50.0;

/// Radius of the view box sent to the authoritative search provider.
pub const PROVIDER_SEARCH_RADIUS_KM: f64 = 30.0;

/// [`PROVIDER_SEARCH_RADIUS_KM`] expressed in miles (~18.6).
pub const PROVIDER_SEARCH_RADIUS_MILES: f64 = PROVIDER_SEARCH_RADIUS_KM * MILES_PER_KM;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Anything that may carry a coordinate pair.
pub trait Located {
    fn location(&self) -> Option<LatLon>;
}

impl Located for LatLon {
    fn location(&self) -> Option<LatLon> {
        Some(*self)
    }
}

/// Haversine great-circle distance between two points, in miles.
#[must_use]
pub fn distance_miles(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `h` a hair above 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Keep only items whose location lies within `radius_miles` of `origin`.
///
/// Items without a location are discarded. Input order is preserved.
#[must_use]
pub fn within_radius<T: Located>(items: Vec<T>, origin: LatLon, radius_miles: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| {
            item.location()
                .is_some_and(|p| distance_miles(origin, p) <= radius_miles)
        })
        .collect()
}

/// Stable ascending sort by distance from `origin`.
///
/// Items without a location sort after every located item.
pub fn sort_by_distance<T: Located>(items: &mut [T], origin: LatLon) {
    let key = |item: &T| {
        item.location()
            .map_or(f64::INFINITY, |p| distance_miles(origin, p))
    };
    items.sort_by(|a, b| key(a).total_cmp(&key(b)));
}

/// Axis-aligned lat/lon rectangle enclosing a search circle.
///
/// Used as a cheap pre-filter before the exact haversine check. The box does
/// not wrap across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, p: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lon..=self.max_lon).contains(&p.lon)
    }
}

/// Rectangle enclosing every point within `radius_miles` of `origin`.
///
/// The longitude span widens with latitude so the box keeps covering the
/// same physical distance away from the equator.
#[must_use]
pub fn bounding_box(origin: LatLon, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles / MILES_PER_LAT_DEGREE;
    let cos_lat = origin.lat.to_radians().cos().abs().max(0.01);
    let lon_delta = radius_miles / (MILES_PER_LAT_DEGREE * cos_lat);
    BoundingBox {
        min_lat: (origin.lat - lat_delta).max(-90.0),
        max_lat: (origin.lat + lat_delta).min(90.0),
        min_lon: (origin.lon - lon_delta).max(-180.0),
        max_lon: (origin.lon + lon_delta).min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUSTIN: LatLon = LatLon::new(30.267_2, -97.743_1);
    const ROUND_ROCK: LatLon = LatLon::new(30.508_3, -97.678_9);
    const DALLAS: LatLon = LatLon::new(32.776_7, -96.797_0);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_miles(AUSTIN, AUSTIN), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_miles(AUSTIN, DALLAS);
        let ba = distance_miles(DALLAS, AUSTIN);
        assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
    }

    #[test]
    fn austin_to_dallas_is_about_182_miles() {
        let d = distance_miles(AUSTIN, DALLAS);
        assert!((d - 182.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = distance_miles(LatLon::new(40.0, -75.0), LatLon::new(41.0, -75.0));
        assert!((d - 69.1).abs() < 0.5, "got {d}");
    }

    #[test]
    fn provider_radius_is_about_18_6_miles() {
        assert!((PROVIDER_SEARCH_RADIUS_MILES - 18.64).abs() < 0.01);
    }

    #[test]
    fn within_radius_drops_far_and_unlocated_items() {
        #[derive(Debug, PartialEq)]
        struct Pin(Option<LatLon>);
        impl Located for Pin {
            fn location(&self) -> Option<LatLon> {
                self.0
            }
        }

        let pins = vec![Pin(Some(ROUND_ROCK)), Pin(Some(DALLAS)), Pin(None)];
        let kept = within_radius(pins, AUSTIN, DISPLAY_RADIUS_MILES + 5.0);
        assert_eq!(kept, vec![Pin(Some(ROUND_ROCK))]);
    }

    #[test]
    fn sort_by_distance_is_ascending() {
        let mut points = vec![DALLAS, ROUND_ROCK, AUSTIN];
        sort_by_distance(&mut points, AUSTIN);
        assert_eq!(points, vec![AUSTIN, ROUND_ROCK, DALLAS]);
    }

    #[test]
    fn bounding_box_contains_points_inside_radius() {
        let bbox = bounding_box(AUSTIN, REPORT_SEARCH_RADIUS_MILES);
        assert!(bbox.contains(AUSTIN));
        assert!(bbox.contains(ROUND_ROCK));
        assert!(!bbox.contains(DALLAS));
    }

    #[test]
    fn bounding_box_widens_longitude_at_high_latitude() {
        let low = bounding_box(LatLon::new(10.0, 0.0), 50.0);
        let high = bounding_box(LatLon::new(60.0, 0.0), 50.0);
        assert!((high.max_lon - high.min_lon) > (low.max_lon - low.min_lon));
    }

    #[test]
    fn lat_lon_validity() {
        assert!(AUSTIN.is_valid());
        assert!(!LatLon::new(91.0, 0.0).is_valid());
        assert!(!LatLon::new(0.0, f64::NAN).is_valid());
    }
}
