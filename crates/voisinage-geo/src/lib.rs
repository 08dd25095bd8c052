//! # voisinage-geo
//!
//! Map-side logic for voisinage: distances, marker clustering, list
//! filtering and geocoding.
//!
//! Everything except [`GeocodingClient`] is synchronous and pure. Records
//! with invalid coordinates are skipped with a warning instead of failing a
//! whole list.
//!
//! # Example
//!
//! ```rust
//! use voisinage_core::GeoPoint;
//! use voisinage_geo::{cluster_markers, ClusterOptions, Marker};
//!
//! let markers = vec![
//!     Marker { id: "0".into(), latitude: 48.85, longitude: 2.35, payload: () },
//!     Marker { id: "1".into(), latitude: 48.8501, longitude: 2.3501, payload: () },
//!     Marker { id: "2".into(), latitude: 45.0, longitude: 5.0, payload: () },
//! ];
//! let clusters = cluster_markers(&markers, &ClusterOptions::with_radius(50.0), 14.0);
//! assert_eq!(clusters.len(), 2);
//!
//! let d = voisinage_geo::haversine_km(
//!     GeoPoint { lat: 48.85, lng: 2.35 },
//!     GeoPoint { lat: 48.85, lng: 2.35 },
//! ).unwrap();
//! assert_eq!(d, 0.0);
//! ```

pub mod cluster;
pub mod distance;
pub mod filter;
pub mod geocoding;

pub use cluster::{
    cluster_markers, cluster_markers_stable, ClusterOptions, ClusterPoint, Marker, MarkerPayload,
};
pub use distance::{haversine_km, km_to_pixels, BoundingBox};
pub use filter::{filter_items, sort_by_distance, FilterCriteria, Filterable, ToMarker};
pub use geocoding::{GeoConfig, GeocodeResult, GeocodingClient};
