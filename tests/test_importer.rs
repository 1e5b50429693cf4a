//! Import and collection-maintenance tests.

mod common;

use relist_sdk::services::{merge, Importer};
use relist_sdk::store::DocumentStore;
use relist_sdk::{MemoryStore, RelistError};

use common::{bare_listing, priced_listing, MockApi};

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[test]
fn merging_into_an_absent_collection_yields_the_incoming_side() {
    let incoming = vec![bare_listing("a", "A")];
    assert_eq!(merge(None, Some(incoming.clone())), incoming);
}

#[test]
fn merging_nothing_leaves_the_existing_side_unchanged() {
    let existing = vec![bare_listing("a", "A"), bare_listing("b", "B")];
    assert_eq!(merge(Some(existing.clone()), None), existing);
}

#[test]
fn merging_appends_without_deduplicating() {
    let existing = vec![bare_listing("a", "A")];
    let incoming = vec![bare_listing("a", "A"), bare_listing("b", "B")];
    let merged = merge(Some(existing), Some(incoming));
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].id, "a");
    assert_eq!(merged[1].id, "a");
    assert_eq!(merged[2].id, "b");
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

#[tokio::test]
async fn importing_persists_the_merged_collection() {
    let api = MockApi::with_import(vec![priced_listing("a", "A", 100)]);
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);

    let urls = vec!["https://gameflip.com/item/a".to_string()];
    let imported = importer.import(&urls).await.unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(importer.saved().await.unwrap(), imported);

    // A second import of the same URL appends a duplicate.
    importer.import(&urls).await.unwrap();
    let saved = importer.saved().await.unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].id, "a");
    assert_eq!(saved[1].id, "a");
}

#[tokio::test]
async fn blank_and_unparseable_urls_are_filtered_out() {
    let api = MockApi::with_import(vec![priced_listing("a", "A", 100)]);
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);

    let urls = vec![
        "  https://gameflip.com/item/a  ".to_string(),
        "   ".to_string(),
        "not a url".to_string(),
        "ftp://gameflip.com/item/b".to_string(),
    ];
    importer.import(&urls).await.unwrap();
    assert_eq!(
        api.imported_urls(),
        vec![vec!["https://gameflip.com/item/a".to_string()]]
    );
}

#[tokio::test]
async fn an_import_with_no_usable_urls_makes_no_network_call() {
    let api = MockApi::new();
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);

    let imported = importer
        .import(&["".to_string(), "nonsense".to_string()])
        .await
        .unwrap();
    assert!(imported.is_empty());
    assert!(api.imported_urls().is_empty());
    assert!(store.load_listings("acct").await.unwrap().is_none());
}

#[tokio::test]
async fn the_saved_collection_defaults_to_empty() {
    let api = MockApi::new();
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);

    assert!(importer.saved().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// update_listing / update_price
// ---------------------------------------------------------------------------

#[tokio::test]
async fn updating_a_listing_in_a_never_created_collection_fails() {
    let api = MockApi::new();
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);

    let err = importer
        .update_listing(bare_listing("a", "A"))
        .await
        .unwrap_err();
    assert!(matches!(err, RelistError::MissingDocument(_)));

    let err = importer.update_price("a", 500).await.unwrap_err();
    assert!(matches!(err, RelistError::MissingDocument(_)));
}

#[tokio::test]
async fn updating_an_unknown_id_is_rejected() {
    let api = MockApi::with_import(vec![priced_listing("a", "A", 100)]);
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);
    importer
        .import(&["https://gameflip.com/item/a".to_string()])
        .await
        .unwrap();

    let err = importer.update_price("zzz", 500).await.unwrap_err();
    assert!(matches!(err, RelistError::Validation(_)));
}

#[tokio::test]
async fn update_price_changes_only_the_matching_listing() {
    let api = MockApi::with_import(vec![
        priced_listing("a", "A", 100),
        priced_listing("b", "B", 200),
    ]);
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);
    importer
        .import(&["https://gameflip.com/item/a".to_string()])
        .await
        .unwrap();

    importer.update_price("b", 999).await.unwrap();
    let saved = importer.saved().await.unwrap();
    assert_eq!(saved[0].price, Some(100));
    assert_eq!(saved[1].price, Some(999));
}

#[tokio::test]
async fn update_listing_replaces_the_whole_record() {
    let api = MockApi::with_import(vec![priced_listing("a", "A", 100)]);
    let store = MemoryStore::new();
    let creds = common::creds();
    let importer = Importer::new(&api, &store, "acct", &creds);
    importer
        .import(&["https://gameflip.com/item/a".to_string()])
        .await
        .unwrap();

    let mut updated = priced_listing("a", "A (renamed)", 150);
    updated.description = Some("now with a description".to_string());
    importer.update_listing(updated.clone()).await.unwrap();

    let saved = importer.saved().await.unwrap();
    assert_eq!(saved, vec![updated]);
}
