use crate::models::GeoPoint;

/// Even-odd ray casting with longitude as x and latitude as y.
///
/// Points exactly on an edge may land on either side.
pub(super) fn contains(ring: &[GeoPoint], point: &GeoPoint) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (ring[i].longitude, ring[i].latitude);
        let (xj, yj) = (ring[j].longitude, ring[j].latitude);

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}
