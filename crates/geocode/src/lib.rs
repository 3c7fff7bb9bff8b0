//! Approximate geocoding for UK seller locations.
//!
//! Marketplaces only expose a free-text town name, so a static
//! gazetteer of cities within the working radius is enough — precise
//! geocoding is explicitly out of scope. Resolution is a total
//! function: anything unrecognized falls back to the origin.

use common::Coordinates;

/// Mean Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Major towns within a ~200 mile working radius of Liverpool.
const CITY_TABLE: &[(&str, f64, f64)] = &[
    // Northwest
    ("manchester", 53.4808, -2.2426),
    ("liverpool", 53.4084, -2.9916),
    ("chester", 53.1908, -2.8908),
    ("warrington", 53.3900, -2.5970),
    ("preston", 53.7632, -2.7031),
    ("blackpool", 53.8175, -3.0357),
    ("bolton", 53.5768, -2.4282),
    ("wigan", 53.5450, -2.6318),
    ("southport", 53.6472, -3.0054),
    ("blackburn", 53.7480, -2.4821),
    ("burnley", 53.7895, -2.2482),
    ("lancaster", 54.0466, -2.8007),
    ("crewe", 53.0979, -2.4416),
    ("stoke", 53.0027, -2.1794),
    // Yorkshire
    ("leeds", 53.8008, -1.5491),
    ("sheffield", 53.3811, -1.4701),
    ("york", 53.9600, -1.0873),
    ("bradford", 53.7960, -1.7594),
    ("huddersfield", 53.6458, -1.7850),
    // Midlands
    ("birmingham", 52.4862, -1.8904),
    ("nottingham", 52.9548, -1.1581),
    ("leicester", 52.6369, -1.1398),
    ("derby", 52.9225, -1.4746),
    ("coventry", 52.4068, -1.5197),
    ("wolverhampton", 52.5867, -2.1290),
    // Wales
    ("cardiff", 51.4816, -3.1791),
    ("swansea", 51.6214, -3.9436),
    ("wrexham", 53.0462, -2.9930),
    // Other
    ("newcastle", 54.9783, -1.6178),
    ("carlisle", 54.8951, -2.9382),
];

/// City-name gazetteer with a fixed fallback origin.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    origin: Coordinates,
}

impl Gazetteer {
    pub fn new(origin: Coordinates) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Resolve a free-text location to approximate coordinates.
    ///
    /// Matches any known city name appearing anywhere in the text
    /// (seller locations often read "Sale, Manchester" or
    /// "Leeds area"). Never fails: unknown text resolves to the
    /// origin.
    pub fn resolve(&self, location: &str) -> Coordinates {
        let lowered = location.to_lowercase();
        for (city, lat, lon) in CITY_TABLE {
            if lowered.contains(city) {
                return Coordinates::new(*lat, *lon);
            }
        }
        self.origin
    }
}

/// Great-circle distance between two coordinate pairs, in miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_MILES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liverpool() -> Coordinates {
        Coordinates::new(53.4084, -2.9916)
    }

    #[test]
    fn test_resolve_known_city() {
        let gaz = Gazetteer::new(liverpool());
        let coords = gaz.resolve("Manchester");
        assert!((coords.lat - 53.4808).abs() < 1e-6);
        assert!((coords.lon - (-2.2426)).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_substring() {
        let gaz = Gazetteer::new(liverpool());
        let coords = gaz.resolve("Sale, Greater MANCHESTER area");
        assert!((coords.lat - 53.4808).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_falls_back_to_origin() {
        let gaz = Gazetteer::new(liverpool());
        let coords = gaz.resolve("Ballymena");
        assert_eq!(coords, liverpool(), "unknown town must resolve to the origin");
    }

    #[test]
    fn test_resolve_empty_text() {
        let gaz = Gazetteer::new(liverpool());
        assert_eq!(gaz.resolve(""), liverpool());
    }

    #[test]
    fn test_haversine_zero_distance() {
        let d = haversine_miles(liverpool(), liverpool());
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_liverpool_manchester() {
        // Liverpool → Manchester is roughly 31 miles as the crow flies.
        let d = haversine_miles(liverpool(), Coordinates::new(53.4808, -2.2426));
        assert!((25.0..40.0).contains(&d), "got {} miles", d);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = liverpool();
        let b = Coordinates::new(52.4862, -1.8904);
        let d1 = haversine_miles(a, b);
        let d2 = haversine_miles(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }
}
