//! End-to-end map flow: filter a listing, turn it into markers, cluster.

use chrono::Utc;
use uuid::Uuid;
use voisinage_core::{Category, Condition, GeoPoint, Item, OfferType};
use voisinage_geo::{
    cluster_markers, filter_items, ClusterOptions, FilterCriteria, MarkerPayload, ToMarker,
};

fn item(title: &str, category: Category, offer_type: OfferType, lat: f64, lng: f64) -> Item {
    Item {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        category,
        condition: Condition::Good,
        offer_type,
        latitude: Some(lat),
        longitude: Some(lng),
        created_at: Utc::now(),
    }
}

fn neighborhood() -> Vec<Item> {
    vec![
        item("Perceuse", Category::Tools, OfferType::Loan, 48.8500, 2.3500),
        item("Scie sauteuse", Category::Tools, OfferType::Loan, 48.8501, 2.3501),
        item("Tondeuse", Category::Garden, OfferType::Loan, 48.8502, 2.3499),
        item("Marteau", Category::Tools, OfferType::Donation, 48.8700, 2.3300),
        item("Établi", Category::Tools, OfferType::Loan, 45.7640, 4.8357),
    ]
}

#[test]
fn test_filter_then_cluster() {
    let items = neighborhood();
    let criteria = FilterCriteria {
        category: Some(Category::Tools),
        offer_type: Some(OfferType::Loan),
        origin: Some(GeoPoint {
            lat: 48.85,
            lng: 2.35,
        }),
        max_distance_km: Some(10.0),
        ..Default::default()
    };

    let nearby = filter_items(&items, &criteria);
    assert_eq!(nearby.len(), 2);

    let markers: Vec<_> = nearby.iter().filter_map(ToMarker::to_marker).collect();
    let clusters = cluster_markers(&markers, &ClusterOptions::with_radius(50.0), 14.0);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 2);
    assert!(clusters[0]
        .markers
        .iter()
        .all(|m| matches!(m.payload, MarkerPayload::Item { category: Category::Tools, .. })));
}

#[test]
fn test_marker_count_conserved_across_zooms() {
    let markers: Vec<_> = neighborhood()
        .iter()
        .filter_map(ToMarker::to_marker)
        .collect();
    for zoom in 0..=20 {
        let clusters = cluster_markers(&markers, &ClusterOptions::default(), zoom as f64);
        let total: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(total, markers.len(), "zoom {}", zoom);
    }
}

#[test]
fn test_clusters_serialize_for_the_map_layer() {
    let markers: Vec<_> = neighborhood()
        .iter()
        .filter_map(ToMarker::to_marker)
        .collect();
    let clusters = cluster_markers(&markers, &ClusterOptions::with_radius(50.0), 14.0);
    let json = serde_json::to_value(&clusters).unwrap();

    assert_eq!(json[0]["count"], 3);
    assert_eq!(json[0]["markers"][0]["payload"]["kind"], "item");
    assert_eq!(json[0]["markers"][0]["payload"]["category"], "tools");
}
