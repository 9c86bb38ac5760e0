use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

/// Smallest lat/lng rectangle covering a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl LatLngBounds {
    /// `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinates) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    #[test]
    fn covers_all_points() {
        let bounds = LatLngBounds::from_points([c(27.7, 85.3), c(27.6, 85.4), c(28.2, 83.9)]).unwrap();
        assert_eq!(bounds.south_west, c(27.6, 83.9));
        assert_eq!(bounds.north_east, c(28.2, 85.4));
        assert!(bounds.contains(c(27.7, 85.3)));
        assert!(!bounds.contains(c(26.0, 85.3)));
    }

    #[test]
    fn empty_set_has_no_bounds() {
        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }
}
