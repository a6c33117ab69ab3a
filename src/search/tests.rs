use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::search::document::TEXT_SEARCH_FIELDS;
use crate::search::fake::FakeSearchStore;
use crate::search::{MeiliSearchStore, SearchDocument, SearchStore};
use crate::test_utils::{create_test_auction, is_meili_enabled};

async fn get_test_stores() -> Vec<(&'static str, Box<dyn SearchStore>)> {
    let mut stores: Vec<(&'static str, Box<dyn SearchStore>)> = vec![];

    // Always add the fake store
    stores.push(("fake", Box::new(FakeSearchStore::new())));

    // Conditionally add a real Meilisearch store with a fresh index per call
    if is_meili_enabled() {
        let config = SearchConfig {
            url: std::env::var("MEILI_URL").unwrap_or_else(|_| "http://localhost:7700".to_string()),
            api_key: std::env::var("MEILI_API_KEY").ok(),
            index: format!("test_auctions_{}", Uuid::new_v4().simple()),
        };

        let store = MeiliSearchStore::new(&config)
            .await
            .expect("Failed to connect to Meilisearch for tests");
        stores.push(("meilisearch", Box::new(store)));
    }

    stores
}

fn test_document(
    make: &str,
    model: &str,
    color: &str,
    updated_at: DateTime<Utc>,
) -> SearchDocument {
    let mut auction = create_test_auction(make, model, updated_at);
    auction.item.color = color.to_string();
    SearchDocument::from(auction)
}

#[tokio::test]
async fn ensure_text_index_twice_records_a_single_definition() {
    let store = FakeSearchStore::new();

    store.ensure_text_index().await.unwrap();
    store.ensure_text_index().await.unwrap();

    let definitions = store.fake_index_definitions();
    assert_eq!(
        definitions.len(),
        1,
        "Repeated setup should not register a second index definition"
    );
    assert_eq!(
        definitions[0],
        TEXT_SEARCH_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>(),
        "Index should cover exactly the text search fields"
    );
}

#[tokio::test]
async fn ensure_text_index_can_run_on_every_startup() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let document = test_document("Ford", "Focus", "Black", Utc::now());
        store.upsert_documents(&[document.clone()]).await.unwrap();

        // A second setup pass must leave existing documents in place
        store.ensure_text_index().await.unwrap();

        let count = store.count_documents().await.unwrap();
        assert_eq!(count, 1, "Document count changed after re-setup for {}", name);

        let results = store.search("ford", 10).await.unwrap();
        assert_eq!(
            results.len(),
            1,
            "Document should still be searchable after re-setup for {}",
            name
        );
        assert_eq!(results[0].id, document.id, "Wrong document returned for {}", name);
    }
}

#[tokio::test]
async fn upsert_keyed_by_id_deduplicates() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let mut document = test_document("Tesla", "Model 3", "Red", Utc::now());
        store.upsert_documents(&[document.clone()]).await.unwrap();

        document.mileage = 30000;
        store.upsert_documents(&[document.clone()]).await.unwrap();

        let count = store.count_documents().await.unwrap();
        assert_eq!(
            count, 1,
            "Re-upserting the same id should not add a document for {}",
            name
        );

        let stored = store
            .get_document(document.id)
            .await
            .unwrap()
            .expect("Document should exist");
        assert_eq!(
            stored.mileage, 30000,
            "Upsert should overwrite the previous version for {}",
            name
        );
    }
}

#[tokio::test]
async fn latest_update_time_returns_newest() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let latest = store.latest_update_time().await.unwrap();
        assert!(latest.is_none(), "Empty index should have no watermark for {}", name);

        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let documents = vec![
            test_document("Ford", "Focus", "Black", base),
            test_document("Tesla", "Model 3", "Red", base + Duration::minutes(10)),
            test_document("Ford", "GT", "White", base + Duration::minutes(5)),
        ];
        store.upsert_documents(&documents).await.unwrap();

        let latest = store.latest_update_time().await.unwrap();
        assert_eq!(
            latest,
            Some(base + Duration::minutes(10)),
            "Watermark should be the newest update time for {}",
            name
        );
    }
}

#[tokio::test]
async fn search_matches_text_fields() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let documents = vec![
            test_document("Ford", "GT", "White", base),
            test_document("Tesla", "Model 3", "Red", base + Duration::minutes(1)),
            test_document("Ford", "Focus", "Black", base + Duration::minutes(2)),
        ];
        store.upsert_documents(&documents).await.unwrap();

        let results = store.search("ford", 10).await.unwrap();
        assert_eq!(results.len(), 2, "Make should be searchable for {}", name);

        let results = store.search("red", 10).await.unwrap();
        assert_eq!(results.len(), 1, "Color should be searchable for {}", name);
        assert_eq!(results[0].model, "Model 3", "Wrong match on color for {}", name);

        // Mileage is not a text field and must not match
        let results = store.search("25000", 10).await.unwrap();
        assert!(
            results.is_empty(),
            "Numeric fields should not be searchable for {}",
            name
        );

        let results = store.search("ford", 1).await.unwrap();
        assert_eq!(results.len(), 1, "Limit should cap the result count for {}", name);
    }
}

#[tokio::test]
async fn clear_documents_empties_the_index() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let documents = vec![
            test_document("Ford", "Focus", "Black", Utc::now()),
            test_document("Tesla", "Model 3", "Red", Utc::now()),
        ];
        store.upsert_documents(&documents).await.unwrap();
        assert_eq!(store.count_documents().await.unwrap(), 2);

        store.clear_documents().await.unwrap();

        let count = store.count_documents().await.unwrap();
        assert_eq!(count, 0, "Clear should remove every document for {}", name);
    }
}

#[tokio::test]
async fn get_document_returns_none_for_missing() {
    for (name, store) in get_test_stores().await {
        store.ensure_text_index().await.unwrap();

        let result = store.get_document(Uuid::new_v4()).await.unwrap();
        assert!(result.is_none(), "Unknown id should yield None for {}", name);
    }
}

#[tokio::test]
async fn search_document_projection_flattens_item_fields() {
    let updated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut auction = create_test_auction("Ford", "GT", updated_at);
    auction.item.color = "White".to_string();
    auction.item.image_url = Some("https://images.example/gt.jpg".to_string());

    let document = SearchDocument::from(auction.clone());

    assert_eq!(document.id, auction.id);
    assert_eq!(document.seller, auction.seller);
    assert_eq!(document.make, "Ford");
    assert_eq!(document.model, "GT");
    assert_eq!(document.year, auction.item.year);
    assert_eq!(document.color, "White");
    assert_eq!(document.mileage, auction.item.mileage);
    assert_eq!(
        document.image_url,
        Some("https://images.example/gt.jpg".to_string())
    );
    assert_eq!(document.current_high_bid, auction.current_high_bid);
    assert_eq!(document.auction_end, auction.auction_end);
    assert_eq!(document.updated_at, updated_at);
    assert_eq!(
        document.updated_at_ts,
        updated_at.timestamp_millis(),
        "Sortable timestamp should mirror the update time in milliseconds"
    );
}
