//! Distances and map framing for the events map.
//!
//! The map page embeds OpenStreetMap's export view, which takes a bounding box
//! (`bbox=min_lon,min_lat,max_lon,max_lat`) and an optional marker.

use serde::{Deserialize, Serialize};

use crate::models::Event;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Map center when neither the user's position nor any event is known (São Paulo).
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: -23.5505,
    longitude: -46.6333,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn of(event: &Event) -> Option<Self> {
        event.coordinates().map(|(lat, lon)| Self::new(lat, lon))
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(self, other: Coordinates) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// `1,2 km` or `850 m`.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as u64)
    } else {
        format!("{:.1} km", km).replace('.', ",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for no points.
    pub fn around(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_lat: p.latitude,
                    min_lon: p.longitude,
                    max_lat: p.latitude,
                    max_lon: p.longitude,
                },
                Some(b) => Self {
                    min_lat: b.min_lat.min(p.latitude),
                    min_lon: b.min_lon.min(p.longitude),
                    max_lat: b.max_lat.max(p.latitude),
                    max_lon: b.max_lon.max(p.longitude),
                },
            })
        })
    }

    /// Grow each side by `fraction` of the span, with a floor of `min_margin`
    /// degrees so a single point still gets a usable view.
    pub fn padded(self, fraction: f64, min_margin: f64) -> Self {
        let lat_pad = ((self.max_lat - self.min_lat) * fraction).max(min_margin);
        let lon_pad = ((self.max_lon - self.min_lon) * fraction).max(min_margin);
        Self {
            min_lat: (self.min_lat - lat_pad).max(-90.0),
            min_lon: (self.min_lon - lon_pad).max(-180.0),
            max_lat: (self.max_lat + lat_pad).min(90.0),
            max_lon: (self.max_lon + lon_pad).min(180.0),
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains(&self, p: Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.latitude)
            && (self.min_lon..=self.max_lon).contains(&p.longitude)
    }
}

/// URL for an embedded map iframe.
pub fn osm_embed_url(bbox: BoundingBox, marker: Option<Coordinates>) -> String {
    let mut url = format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={:.5},{:.5},{:.5},{:.5}&layer=mapnik",
        bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
    );
    if let Some(m) = marker {
        url.push_str(&format!("&marker={:.5},{:.5}", m.latitude, m.longitude));
    }
    url
}

/// Link that opens a point on openstreetmap.org.
pub fn osm_link(point: Coordinates, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat:.5}&mlon={lon:.5}#map={zoom}/{lat:.5}/{lon:.5}",
        lat = point.latitude,
        lon = point.longitude,
    )
}

/// Events with coordinates, nearest first, paired with their distance from `origin`.
pub fn sort_by_distance(events: &[Event], origin: Coordinates) -> Vec<(&Event, f64)> {
    let mut located: Vec<(&Event, f64)> = events
        .iter()
        .filter_map(|e| Some((e, Coordinates::of(e)?.distance_km(origin))))
        .collect();
    located.sort_by(|a, b| a.1.total_cmp(&b.1));
    located
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine() {
        let sp = Coordinates::new(-23.5505, -46.6333);
        let rio = Coordinates::new(-22.9068, -43.1729);
        let d = sp.distance_km(rio);
        assert!((d - 357.0).abs() < 5.0, "{d}");
        assert_eq!(sp.distance_km(sp), 0.0);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.85), "850 m");
        assert_eq!(format_distance(12.34), "12,3 km");
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(BoundingBox::around([]), None);
        let b = BoundingBox::around([
            Coordinates::new(-23.0, -46.0),
            Coordinates::new(-22.0, -43.0),
            Coordinates::new(-25.0, -45.0),
        ])
        .unwrap();
        assert_eq!(b.min_lat, -25.0);
        assert_eq!(b.max_lat, -22.0);
        assert_eq!(b.min_lon, -46.0);
        assert_eq!(b.max_lon, -43.0);
        assert_eq!(b.center(), Coordinates::new(-23.5, -44.5));
    }

    #[test]
    fn test_padding_single_point() {
        let b = BoundingBox::around([Coordinates::new(10.0, 20.0)])
            .unwrap()
            .padded(0.1, 0.01);
        assert!(b.contains(Coordinates::new(10.005, 20.005)));
        assert!(!b.contains(Coordinates::new(10.02, 20.0)));
        let edge = BoundingBox::around([Coordinates::new(89.999, 179.999)])
            .unwrap()
            .padded(0.1, 0.01);
        assert_eq!(edge.max_lat, 90.0);
        assert_eq!(edge.max_lon, 180.0);
    }

    #[test]
    fn test_osm_urls() {
        let bbox = BoundingBox {
            min_lat: -1.0,
            min_lon: -2.0,
            max_lat: 1.0,
            max_lon: 2.0,
        };
        assert_eq!(
            osm_embed_url(bbox, Some(Coordinates::new(0.5, 0.25))),
            "https://www.openstreetmap.org/export/embed.html?bbox=-2.00000,-1.00000,2.00000,1.00000&layer=mapnik&marker=0.50000,0.25000"
        );
        assert_eq!(
            osm_link(Coordinates::new(0.5, 0.25), 15),
            "https://www.openstreetmap.org/?mlat=0.50000&mlon=0.25000#map=15/0.50000/0.25000"
        );
    }
}
