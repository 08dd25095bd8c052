//! Greedy marker clustering for map rendering.
//!
//! Markers are grouped when their on-screen distance at the current zoom is
//! within a pixel radius. The pass is O(n²) and meant for the dozens to low
//! hundreds of markers a neighborhood map shows.
//!
//! Grouping depends on input order: the first unprocessed marker seeds each
//! cluster and absorbs whatever lies within the radius of the seed. Use
//! [`cluster_markers_stable`] when the same set must always cluster the same
//! way regardless of how it was fetched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use voisinage_core::defaults::{CLUSTER_MAX_ZOOM, CLUSTER_MIN_ZOOM, CLUSTER_RADIUS_PX};
use voisinage_core::{Category, GeoPoint, OfferType};

use crate::distance::{haversine_km, km_to_pixels};

/// A point on the map plus whatever the UI needs to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker<P = MarkerPayload> {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub payload: P,
}

impl<P> Marker<P> {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

/// Display data for item and community markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerPayload {
    Item {
        title: String,
        category: Category,
        offer_type: OfferType,
    },
    Community {
        name: String,
        member_count: u32,
    },
}

/// One rendered point: a single marker or a group of nearby ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPoint<P = MarkerPayload> {
    /// The marker id for singletons, `cluster-<seed id>` for groups.
    pub id: String,
    /// Mean latitude of the members.
    pub latitude: f64,
    /// Mean longitude of the members.
    pub longitude: f64,
    pub count: usize,
    pub markers: Vec<Marker<P>>,
}

impl<P> ClusterPoint<P> {
    fn from_members(markers: Vec<Marker<P>>) -> Self {
        let count = markers.len();
        let (lat_sum, lng_sum) = markers
            .iter()
            .fold((0.0, 0.0), |(lat, lng), m| (lat + m.latitude, lng + m.longitude));
        let id = match markers.as_slice() {
            [single] => single.id.clone(),
            [seed, ..] => format!("cluster-{}", seed.id),
            [] => String::new(),
        };
        Self {
            id,
            latitude: lat_sum / count.max(1) as f64,
            longitude: lng_sum / count.max(1) as f64,
            count,
            markers,
        }
    }

    pub fn is_cluster(&self) -> bool {
        self.count > 1
    }
}

/// Clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Markers closer than this on screen are grouped.
    pub radius_pixels: f64,
    /// Below this zoom every marker is drawn on its own.
    pub min_zoom: f64,
    /// Above this zoom every marker is drawn on its own.
    pub max_zoom: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius_pixels: CLUSTER_RADIUS_PX,
            min_zoom: CLUSTER_MIN_ZOOM,
            max_zoom: CLUSTER_MAX_ZOOM,
        }
    }
}

impl ClusterOptions {
    pub fn with_radius(radius_pixels: f64) -> Self {
        Self {
            radius_pixels,
            ..Self::default()
        }
    }

    pub fn clusters_at(&self, zoom: f64) -> bool {
        (self.min_zoom..=self.max_zoom).contains(&zoom)
    }
}

/// Group markers whose pixel distance at `current_zoom` is within
/// `options.radius_pixels` of a cluster seed.
///
/// Outside `[min_zoom, max_zoom]` every marker becomes its own cluster.
/// Markers with invalid coordinates are dropped with a warning.
pub fn cluster_markers<P: Clone>(
    markers: &[Marker<P>],
    options: &ClusterOptions,
    current_zoom: f64,
) -> Vec<ClusterPoint<P>> {
    let valid: Vec<&Marker<P>> = markers
        .iter()
        .filter(|m| match m.point().validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    subsystem = "geo",
                    component = "cluster",
                    marker_id = %m.id,
                    error = %e,
                    "Skipping marker with invalid coordinates"
                );
                false
            }
        })
        .collect();

    if !options.clusters_at(current_zoom) {
        return valid
            .into_iter()
            .map(|m| ClusterPoint::from_members(vec![m.clone()]))
            .collect();
    }

    let mut processed = vec![false; valid.len()];
    let mut clusters = Vec::new();

    for i in 0..valid.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let seed = valid[i];
        let mut members = vec![seed.clone()];

        for j in (i + 1)..valid.len() {
            if processed[j] {
                continue;
            }
            // Both points were validated above.
            let Ok(km) = haversine_km(seed.point(), valid[j].point()) else {
                continue;
            };
            if km_to_pixels(km, current_zoom) <= options.radius_pixels {
                processed[j] = true;
                members.push(valid[j].clone());
            }
        }

        clusters.push(ClusterPoint::from_members(members));
    }

    debug!(
        subsystem = "geo",
        component = "cluster",
        marker_count = markers.len(),
        cluster_count = clusters.len(),
        zoom = current_zoom,
        "Markers clustered"
    );

    clusters
}

/// Like [`cluster_markers`], but sorts by id first so the grouping does not
/// depend on input order.
pub fn cluster_markers_stable<P: Clone>(
    markers: &[Marker<P>],
    options: &ClusterOptions,
    current_zoom: f64,
) -> Vec<ClusterPoint<P>> {
    let mut sorted: Vec<Marker<P>> = markers.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    cluster_markers(&sorted, options, current_zoom)
}
