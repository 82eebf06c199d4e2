//! Picks the backend record a candidate refers to

use crate::backend::StoredPlace;

/// Selects the stored place matching a candidate
///
/// # Matching Rules
///
/// 1. Exact latitude and longitude equality; the lowest id wins
/// 2. Otherwise case-insensitive name equality; the nearest record wins,
///    then the lowest id
///
/// Returns `None` when nothing matches.
pub fn select_match<'a>(
    name: &str,
    latitude: f64,
    longitude: f64,
    places: &'a [StoredPlace],
) -> Option<&'a StoredPlace> {
    let exact = places
        .iter()
        .filter(|p| p.latitude == Some(latitude) && p.longitude == Some(longitude))
        .min_by_key(|p| p.id);
    if exact.is_some() {
        return exact;
    }

    let name = name.to_lowercase();
    places
        .iter()
        .filter(|p| p.name.to_lowercase() == name)
        .min_by(|a, b| {
            distance(a, latitude, longitude)
                .total_cmp(&distance(b, latitude, longitude))
                .then(a.id.cmp(&b.id))
        })
}

/// Planar distance in degrees; records without coordinates sort last
fn distance(place: &StoredPlace, latitude: f64, longitude: f64) -> f64 {
    match (place.latitude, place.longitude) {
        (Some(lat), Some(lng)) => (lat - latitude).hypot(lng - longitude),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn stored(id: i64, name: &str, lat: Option<f64>, lng: Option<f64>) -> StoredPlace {
        StoredPlace {
            id,
            name: name.to_string(),
            latitude: lat,
            longitude: lng,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_exact_coordinates_win_over_name() {
        let places = vec![
            stored(3, "Kelly's Pub", Some(40.0005), Some(-87.0)),
            stored(9, "Something Else", Some(40.0), Some(-87.0)),
        ];

        let found = select_match("Kelly's Pub", 40.0, -87.0, &places).unwrap();
        assert_eq!(found.id, 9);
    }

    #[test]
    fn test_exact_tie_breaks_on_lowest_id() {
        let places = vec![
            stored(12, "A", Some(40.0), Some(-87.0)),
            stored(4, "B", Some(40.0), Some(-87.0)),
        ];

        assert_eq!(select_match("x", 40.0, -87.0, &places).unwrap().id, 4);
    }

    #[test]
    fn test_name_match_is_case_insensitive_and_nearest() {
        let places = vec![
            stored(1, "KELLY'S PUB", Some(40.0009), Some(-87.0)),
            stored(2, "kelly's pub", Some(40.0001), Some(-87.0)),
            stored(3, "kelly's pub", None, None),
        ];

        assert_eq!(select_match("Kelly's Pub", 40.0, -87.0, &places).unwrap().id, 2);
    }

    #[test]
    fn test_name_tie_breaks_on_lowest_id() {
        let places = vec![
            stored(8, "Pub", Some(40.0002), Some(-87.0)),
            stored(5, "pub", Some(40.0002), Some(-87.0)),
        ];

        assert_eq!(select_match("PUB", 40.0, -87.0, &places).unwrap().id, 5);
    }

    #[test]
    fn test_no_match() {
        let places = vec![stored(1, "Other", Some(40.0001), Some(-87.0))];
        assert!(select_match("Pub", 40.0, -87.0, &places).is_none());
        assert!(select_match("Pub", 40.0, -87.0, &[]).is_none());
    }
}
