//! Predicate pipeline over in-memory item and community lists.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use voisinage_core::{Category, Community, Condition, GeoPoint, Item, OfferType};

use crate::cluster::{Marker, MarkerPayload};
use crate::distance::haversine_km;

/// A record the filter pipeline can inspect.
///
/// Attributes a record does not have (communities have no category) report
/// `None`, so a criterion on them never matches.
pub trait Filterable {
    fn id(&self) -> String;
    /// Title for items, name for communities.
    fn label(&self) -> &str;
    fn location(&self) -> Option<GeoPoint>;

    fn category(&self) -> Option<Category> {
        None
    }

    fn condition(&self) -> Option<Condition> {
        None
    }

    fn offer_type(&self) -> Option<OfferType> {
        None
    }
}

impl Filterable for Item {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn location(&self) -> Option<GeoPoint> {
        Item::location(self)
    }

    fn category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn condition(&self) -> Option<Condition> {
        Some(self.condition)
    }

    fn offer_type(&self) -> Option<OfferType> {
        Some(self.offer_type)
    }
}

impl Filterable for Community {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<GeoPoint> {
        self.center()
    }
}

/// Conversion of a located record into a map marker.
pub trait ToMarker {
    /// `None` when the record has no valid location.
    fn to_marker(&self) -> Option<Marker>;
}

impl ToMarker for Item {
    fn to_marker(&self) -> Option<Marker> {
        let point = self.location().filter(|p| p.validate().is_ok())?;
        Some(Marker {
            id: self.id.to_string(),
            latitude: point.lat,
            longitude: point.lng,
            payload: MarkerPayload::Item {
                title: self.title.clone(),
                category: self.category,
                offer_type: self.offer_type,
            },
        })
    }
}

impl ToMarker for Community {
    fn to_marker(&self) -> Option<Marker> {
        let point = self.center().filter(|p| p.validate().is_ok())?;
        Some(Marker {
            id: self.id.to_string(),
            latitude: point.lat,
            longitude: point.lng,
            payload: MarkerPayload::Community {
                name: self.name.clone(),
                member_count: self.member_count,
            },
        })
    }
}

/// Filter criteria. Every field is optional; the default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Keep only records with a valid location.
    pub require_location: bool,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub offer_type: Option<OfferType>,
    /// Case-insensitive substring of the title or name.
    pub search: Option<String>,
    /// Distance bound center. Only applied together with `max_distance_km`.
    pub origin: Option<GeoPoint>,
    pub max_distance_km: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        !self.require_location
            && self.category.is_none()
            && self.condition.is_none()
            && self.offer_type.is_none()
            && self.search_term().is_none()
            && self.distance_bound().is_none()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn distance_bound(&self) -> Option<(GeoPoint, f64)> {
        Some((self.origin?, self.max_distance_km?))
    }
}

/// Location of `record` if present and valid; invalid ones are logged.
fn valid_location<T: Filterable>(record: &T) -> Option<GeoPoint> {
    let point = record.location()?;
    match point.validate() {
        Ok(()) => Some(point),
        Err(e) => {
            warn!(
                subsystem = "geo",
                component = "filter",
                record_id = %record.id(),
                error = %e,
                "Skipping record with invalid coordinates"
            );
            None
        }
    }
}

/// Return the records matching every criterion, in input order.
///
/// Attribute and text checks run before the distance check. Records with
/// invalid coordinates are skipped whenever location matters.
pub fn filter_items<T: Filterable + Clone>(items: &[T], criteria: &FilterCriteria) -> Vec<T> {
    if criteria.is_empty() {
        return items.to_vec();
    }

    let search = criteria.search_term();
    let bound = criteria.distance_bound();
    if let Some((origin, _)) = bound {
        if let Err(e) = origin.validate() {
            warn!(
                subsystem = "geo",
                component = "filter",
                error = %e,
                "Invalid filter origin, nothing can match"
            );
            return Vec::new();
        }
    }

    let result: Vec<T> = items
        .iter()
        .filter(|item| {
            criteria
                .category
                .map_or(true, |c| item.category() == Some(c))
        })
        .filter(|item| {
            criteria
                .condition
                .map_or(true, |c| item.condition() == Some(c))
        })
        .filter(|item| {
            criteria
                .offer_type
                .map_or(true, |t| item.offer_type() == Some(t))
        })
        .filter(|item| {
            search
                .as_deref()
                .map_or(true, |term| item.label().to_lowercase().contains(term))
        })
        .filter(|item| {
            if !criteria.require_location && bound.is_none() {
                return true;
            }
            let Some(point) = valid_location(*item) else {
                return false;
            };
            match bound {
                Some((origin, max_km)) => {
                    haversine_km(origin, point).map_or(false, |km| km <= max_km)
                }
                None => true,
            }
        })
        .cloned()
        .collect();

    debug!(
        subsystem = "geo",
        component = "filter",
        input_count = items.len(),
        result_count = result.len(),
        "Records filtered"
    );

    result
}

/// Records with a valid location paired with their distance from `origin`,
/// nearest first. Equal distances keep input order.
pub fn sort_by_distance<T: Filterable + Clone>(items: &[T], origin: GeoPoint) -> Vec<(T, f64)> {
    if origin.validate().is_err() {
        return Vec::new();
    }
    let mut with_distance: Vec<(T, f64)> = items
        .iter()
        .filter_map(|item| {
            let point = valid_location(item)?;
            let km = haversine_km(origin, point).ok()?;
            Some((item.clone(), km))
        })
        .collect();
    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_distance
}
