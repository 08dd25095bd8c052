//! Core data models for voisinage.
//!
//! These types are shared across all voisinage crates and represent the
//! core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// CATEGORY TYPES
// =============================================================================

/// Fixed set of item categories.
///
/// Declaration order is significant: it is the stable iteration order used
/// by the keyword scorer and its tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tools,
    Electronics,
    Books,
    Clothing,
    Furniture,
    Kitchen,
    Garden,
    Sports,
    Toys,
    Music,
    Baby,
    Appliances,
    Decoration,
    Vehicles,
    Crafts,
    Outdoor,
    Other,
}

impl Category {
    /// Every category, in stable order.
    pub const ALL: [Category; 17] = [
        Self::Tools,
        Self::Electronics,
        Self::Books,
        Self::Clothing,
        Self::Furniture,
        Self::Kitchen,
        Self::Garden,
        Self::Sports,
        Self::Toys,
        Self::Music,
        Self::Baby,
        Self::Appliances,
        Self::Decoration,
        Self::Vehicles,
        Self::Crafts,
        Self::Outdoor,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Electronics => "electronics",
            Self::Books => "books",
            Self::Clothing => "clothing",
            Self::Furniture => "furniture",
            Self::Kitchen => "kitchen",
            Self::Garden => "garden",
            Self::Sports => "sports",
            Self::Toys => "toys",
            Self::Music => "music",
            Self::Baby => "baby",
            Self::Appliances => "appliances",
            Self::Decoration => "decoration",
            Self::Vehicles => "vehicles",
            Self::Crafts => "crafts",
            Self::Outdoor => "outdoor",
            Self::Other => "other",
        }
    }

    /// Map any classifier output onto the enum; unknown values become `Other`.
    pub fn coerce(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "tools" | "tool" => Ok(Self::Tools),
            "electronics" | "electronic" => Ok(Self::Electronics),
            "books" | "book" => Ok(Self::Books),
            "clothing" | "clothes" => Ok(Self::Clothing),
            "furniture" => Ok(Self::Furniture),
            "kitchen" => Ok(Self::Kitchen),
            "garden" | "gardening" => Ok(Self::Garden),
            "sports" | "sport" => Ok(Self::Sports),
            "toys" | "toy" => Ok(Self::Toys),
            "music" => Ok(Self::Music),
            "baby" => Ok(Self::Baby),
            "appliances" | "appliance" => Ok(Self::Appliances),
            "decoration" | "decor" => Ok(Self::Decoration),
            "vehicles" | "vehicle" => Ok(Self::Vehicles),
            "crafts" | "craft" => Ok(Self::Crafts),
            "outdoor" | "outdoors" => Ok(Self::Outdoor),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Physical condition of a listed item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    /// Unknown values fall back to `Good`.
    pub fn coerce(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(format!("Invalid condition: {}", s)),
        }
    }
}

/// How an item is offered to neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Donation,
    Loan,
    Exchange,
}

impl std::fmt::Display for OfferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Donation => write!(f, "donation"),
            Self::Loan => write!(f, "loan"),
            Self::Exchange => write!(f, "exchange"),
        }
    }
}

impl std::str::FromStr for OfferType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "donation" | "gift" => Ok(Self::Donation),
            "loan" | "lend" => Ok(Self::Loan),
            "exchange" | "swap" => Ok(Self::Exchange),
            _ => Err(format!("Invalid offer type: {}", s)),
        }
    }
}

/// Clamp a confidence into `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One ranked alternative to the chosen category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAlternative {
    pub category: Category,
    pub confidence: f32,
    pub reason: String,
}

/// Final category decision with its runner-ups and hints for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetectionResult {
    pub category: Category,
    pub confidence: f32,
    /// Highest confidence first, at most three.
    pub alternatives: Vec<CategoryAlternative>,
    pub suggestions: Vec<String>,
}

// =============================================================================
// ANALYSIS TYPES
// =============================================================================

/// Validated result of one image analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIAnalysisResult {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub confidence: f32,
    #[serde(
        rename = "categoryConfidence",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category_confidence: Option<f32>,
    #[serde(
        rename = "categoryAlternatives",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category_alternatives: Option<Vec<CategoryAlternative>>,
    #[serde(
        rename = "categorySuggestions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category_suggestions: Option<Vec<String>>,
}

// =============================================================================
// LOCATION TYPES
// =============================================================================

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a validated point.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidCoordinate(format!(
                "non-finite coordinate lat={}, lng={}",
                self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {} out of range",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {} out of range",
                self.lng
            )));
        }
        Ok(())
    }
}

// =============================================================================
// LISTING TYPES
// =============================================================================

/// An item listed by a neighbor, as returned by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub condition: Condition,
    pub offer_type: OfferType,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Location, if both coordinates are present. Not validated.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// A neighborhood community that members can join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub member_count: u32,
}

impl Community {
    /// Center of the community, if set. Not validated.
    pub fn center(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_all_is_complete_and_ordered() {
        assert_eq!(Category::ALL.len(), 17);
        assert_eq!(Category::ALL[0], Category::Tools);
        assert_eq!(Category::ALL[16], Category::Other);
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_coerce_unknown_to_other() {
        assert_eq!(Category::coerce("spaceships"), Category::Other);
        assert_eq!(Category::coerce(""), Category::Other);
        assert_eq!(Category::coerce("  Tools "), Category::Tools);
        assert_eq!(Category::coerce("Electronic"), Category::Electronics);
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Appliances).unwrap();
        assert_eq!(json, "\"appliances\"");
    }

    #[test]
    fn test_condition_coerce_defaults_to_good() {
        assert_eq!(Condition::coerce("mint"), Condition::Good);
        assert_eq!(Condition::coerce("POOR"), Condition::Poor);
    }

    #[test]
    fn test_offer_type_aliases() {
        assert_eq!("gift".parse::<OfferType>().unwrap(), OfferType::Donation);
        assert_eq!("swap".parse::<OfferType>().unwrap(), OfferType::Exchange);
        assert!("sale".parse::<OfferType>().is_err());
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f32::NAN), 0.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(48.85, 2.35).is_ok());
        assert!(matches!(
            GeoPoint::new(f64::NAN, 2.35),
            Err(Error::InvalidCoordinate(_))
        ));
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_analysis_result_wire_names() {
        let result = AIAnalysisResult {
            title: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            category: Category::Tools,
            condition: Condition::Good,
            brand: Some("Bosch".to_string()),
            model: None,
            estimated_value: Some(40.0),
            tags: vec!["drill".to_string()],
            confidence: 0.9,
            category_confidence: Some(0.9),
            category_alternatives: Some(vec![]),
            category_suggestions: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["estimated_value"], 40.0);
        assert!(json.get("categoryConfidence").is_some());
        assert!(json.get("categoryAlternatives").is_some());
        assert!(json.get("categorySuggestions").is_none());
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_item_location_requires_both_coordinates() {
        let item = Item {
            id: Uuid::nil(),
            title: "Lamp".to_string(),
            description: String::new(),
            category: Category::Decoration,
            condition: Condition::Fair,
            offer_type: OfferType::Loan,
            latitude: Some(48.0),
            longitude: None,
            created_at: Utc::now(),
        };
        assert!(item.location().is_none());
    }
}
