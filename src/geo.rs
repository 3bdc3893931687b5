/// A (latitude, longitude) pair in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Great-circle distance between two points using the haversine formula.
/// Output in meters. Symmetric and non-negative.
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
    let r = 6_371_000.0_f64; // Earth radius in meters
    let (lat1, lon1, lat2, lon2) = (
        a.lat.to_radians(),
        a.lon.to_radians(),
        b.lat.to_radians(),
        b.lon.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    r * c
}
