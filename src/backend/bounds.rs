//! Geographic bounding boxes for nearby lookups

/// South-west / north-east envelope around a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl BoundingBox {
    /// Builds the box `center ± epsilon` on both axes
    pub fn around(latitude: f64, longitude: f64, epsilon: f64) -> Self {
        Self {
            sw_lat: latitude - epsilon,
            sw_lng: longitude - epsilon,
            ne_lat: latitude + epsilon,
            ne_lng: longitude + epsilon,
        }
    }

    /// Returns true if the point lies inside the box, edges included
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.sw_lat..=self.ne_lat).contains(&latitude)
            && (self.sw_lng..=self.ne_lng).contains(&longitude)
    }

    /// Formats the box as the `bounds` query value: `SWlat,SWlng,NElat,NElng`
    pub fn to_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.sw_lat, self.sw_lng, self.ne_lat, self.ne_lng
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around() {
        let bounds = BoundingBox::around(40.0, -87.0, 0.5);
        assert_eq!(bounds.sw_lat, 39.5);
        assert_eq!(bounds.sw_lng, -87.5);
        assert_eq!(bounds.ne_lat, 40.5);
        assert_eq!(bounds.ne_lng, -86.5);
        assert_eq!(bounds.to_query(), "39.5,-87.5,40.5,-86.5");
    }

    #[test]
    fn test_contains() {
        let bounds = BoundingBox::around(40.0, -87.0, 0.001);
        assert!(bounds.contains(40.0, -87.0));
        assert!(bounds.contains(40.0005, -86.9995));
        assert!(!bounds.contains(40.01, -87.0));
        assert!(!bounds.contains(40.0, -87.01));
    }
}
