use crate::models::Coordinate;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers, rounded to
/// 2 decimal places (haversine formula).
///
/// Pure and total: NaN or out-of-range input propagates NaN instead of
/// panicking. Callers are responsible for feeding finite coordinates.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_2dp(EARTH_RADIUS_KM * c)
}

fn round_2dp(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
