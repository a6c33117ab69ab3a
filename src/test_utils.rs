use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auctions::{Auction, ItemDetails};

/// Check if a test is enabled via environment variable
fn is_test_enabled(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Check if Meilisearch tests are enabled via environment variable
pub fn is_meili_enabled() -> bool {
    is_test_enabled("ENABLE_MEILI_TESTS")
}

/// Creates a test auction with the given vehicle and update time
///
/// # Arguments
///
/// * `make` - The vehicle make
/// * `model` - The vehicle model
/// * `updated_at` - The last update timestamp
///
/// Other fields can be customized after creation if needed
pub fn create_test_auction(make: &str, model: &str, updated_at: DateTime<Utc>) -> Auction {
    Auction {
        id: Uuid::new_v4(),
        seller: "test-seller".to_string(),
        current_high_bid: Some(1000),
        auction_end: updated_at + Duration::days(7),
        updated_at,
        item: ItemDetails {
            make: make.to_string(),
            model: model.to_string(),
            year: 2020,
            color: "Black".to_string(),
            mileage: 25000,
            image_url: None,
        },
    }
}
