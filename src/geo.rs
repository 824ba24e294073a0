//! Geographic coordinate handling
//!
//! The flight controller reports its position as a latitude/longitude pair. Until the
//! first GPS fix the reported pair is the out-of-range sentinel [Coordinate::UNKNOWN],
//! and some controllers report exactly (0, 0) while the receiver warms up. Both cases
//! must be filtered out before a position is drawn on the map.

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Sentinel value reported while the aircraft has no GPS fix.
    pub const UNKNOWN: Coordinate = Coordinate {
        latitude: 181.0,
        longitude: 181.0,
    };

    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether this coordinate is a plausible GPS position.
    ///
    /// True when the latitude is strictly inside ±90°, the longitude strictly inside
    /// ±180°, and the pair is not exactly (0, 0). The poles, the antimeridian and the
    /// null island "no fix yet" report all fail the check.
    pub fn is_valid(&self) -> bool {
        self.latitude > -90.0
            && self.latitude < 90.0
            && self.longitude > -180.0
            && self.longitude < 180.0
            && !(self.latitude == 0.0 && self.longitude == 0.0)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
