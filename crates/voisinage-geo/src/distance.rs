//! Great-circle distance and map-space helpers.

use serde::{Deserialize, Serialize};

use voisinage_core::defaults::{EARTH_CIRCUMFERENCE_KM, EARTH_RADIUS_KM, TILE_SIZE_PX};
use voisinage_core::{Error, GeoPoint, Result};

/// Haversine distance between two points, in kilometers.
///
/// Fails with [`Error::InvalidCoordinate`] instead of returning NaN.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> Result<f64> {
    a.validate()?;
    b.validate()?;

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    Ok(2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt()))
}

/// Pixels covered by `km` at web-map zoom level `zoom`.
pub fn km_to_pixels(km: f64, zoom: f64) -> f64 {
    km * (2f64.powf(zoom) * TILE_SIZE_PX / EARTH_CIRCUMFERENCE_KM)
}

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box enclosing a circle of `radius_km` around `center`.
    ///
    /// Useful as a cheap pre-filter before exact haversine checks. Longitude
    /// span is clamped rather than wrapped across the antimeridian.
    pub fn around(center: GeoPoint, radius_km: f64) -> Result<Self> {
        center.validate()?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(Error::InvalidInput(format!(
                "radius must be a non-negative number, got {}",
                radius_km
            )));
        }

        let dlat = (radius_km / EARTH_RADIUS_KM).to_degrees();
        let cos_lat = center.lat.to_radians().cos();
        let dlng = if cos_lat.abs() < 1e-12 {
            180.0
        } else {
            (radius_km / (EARTH_RADIUS_KM * cos_lat)).to_degrees().abs()
        };

        Ok(Self {
            min_lat: (center.lat - dlat).max(-90.0),
            max_lat: (center.lat + dlat).min(90.0),
            min_lng: (center.lng - dlng).max(-180.0),
            max_lng: (center.lng + dlng).min(180.0),
        })
    }

    /// Smallest box containing every valid point, `None` if there is none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points
            .into_iter()
            .filter(|p| p.validate().is_ok())
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    None => Self {
                        min_lat: p.lat,
                        min_lng: p.lng,
                        max_lat: p.lat,
                        max_lng: p.lng,
                    },
                    Some(b) => Self {
                        min_lat: b.min_lat.min(p.lat),
                        min_lng: b.min_lng.min(p.lng),
                        max_lat: b.max_lat.max(p.lat),
                        max_lng: b.max_lng.max(p.lng),
                    },
                })
            })
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }
}
