//! Records as the data-access layer hands them over.

use voisinage_core::{
    entry_for, Category, Community, Condition, Error, Item, OfferType, CATEGORY_KEYWORDS,
};

#[test]
fn test_item_from_storage_json() {
    let item: Item = serde_json::from_str(
        r#"{
            "id": "0191f3a2-7c4e-7b1a-9f00-1a2b3c4d5e6f",
            "title": "Perceuse Bosch",
            "category": "tools",
            "condition": "excellent",
            "offer_type": "loan",
            "latitude": 48.85,
            "longitude": 2.35,
            "created_at": "2026-10-01T09:30:00Z"
        }"#,
    )
    .unwrap();

    assert_eq!(item.category, Category::Tools);
    assert_eq!(item.condition, Condition::Excellent);
    assert_eq!(item.offer_type, OfferType::Loan);
    assert_eq!(item.description, "");
    assert_eq!(item.location().unwrap().lat, 48.85);
}

#[test]
fn test_community_without_center() {
    let community: Community = serde_json::from_str(
        r#"{"id": "0191f3a2-7c4e-7b1a-9f00-1a2b3c4d5e70", "name": "Croix-Rousse"}"#,
    )
    .unwrap();
    assert!(community.center().is_none());
    assert_eq!(community.member_count, 0);
}

#[test]
fn test_every_category_but_other_has_keywords() {
    for category in Category::ALL {
        match entry_for(category) {
            Some(entry) => assert!(!entry.keywords.is_empty(), "{} has no keywords", category),
            None => assert_eq!(category, Category::Other),
        }
    }
    assert_eq!(CATEGORY_KEYWORDS.len(), Category::ALL.len() - 1);
}

#[test]
fn test_user_facing_error_policy() {
    let rate_limited = Error::RateLimited {
        attempts: 4,
        message: "slow down".to_string(),
    };
    assert!(rate_limited.is_retryable());
    assert!(rate_limited.user_message().contains("try again later"));

    let config = Error::Config("no key".to_string());
    assert!(!config.is_retryable());

    let coordinate = Error::InvalidCoordinate("lat 91".to_string());
    assert!(!coordinate.is_retryable());
}
