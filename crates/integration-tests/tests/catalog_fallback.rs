//! Remote-or-local catalog resolution, fallback, and cache invalidation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use fernhill_core::ProductId;
use fernhill_engine::catalog::{ProductDraft, ProductPatch};
use fernhill_engine::error::EngineError;
use fernhill_integration_tests::{TestHarness, ToggleRemote, init_tracing, seed_catalog};
use rust_decimal_macros::dec;

fn draft(name: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: String::new(),
        price: dec!(4.99),
        stock: 25,
        category: "otc".to_string(),
        image: None,
        requires_prescription: false,
    }
}

#[tokio::test]
async fn remote_listing_is_newest_first_and_authoritative() {
    init_tracing();
    let remote = Arc::new(ToggleRemote::new(seed_catalog()));
    let harness = TestHarness::with_remote(&[], Some(remote));

    let products = harness.catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 4);
    // Seed timestamps ascend by id, so the listing comes back reversed.
    assert_eq!(products[0].id, ProductId::from(404));
    assert_eq!(products[3].id, ProductId::from(101));
}

#[tokio::test]
async fn outage_falls_back_to_last_synced_listing() {
    let remote = Arc::new(ToggleRemote::new(seed_catalog()));
    let harness = TestHarness::with_remote(&[], Some(remote.clone()));

    // First listing syncs the remote catalog into the local cache. A
    // mutation then drops the in-process cache so the next read re-resolves.
    assert_eq!(harness.catalog.list_products().await.unwrap().len(), 4);
    harness
        .catalog
        .delete_product(&ProductId::from("no-such-id"))
        .await
        .unwrap();

    remote.set_online(false);
    let products = harness.catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 4);
}

#[tokio::test]
async fn recovered_remote_is_retried_after_a_fallback() {
    let remote = Arc::new(ToggleRemote::new(seed_catalog()));
    remote.set_online(false);
    let harness = TestHarness::with_remote(&[], Some(remote.clone()));

    // Down remote with an empty local cache: an empty catalog is a valid,
    // non-error state.
    assert!(harness.catalog.list_products().await.unwrap().is_empty());

    remote.set_online(true);
    assert_eq!(harness.catalog.list_products().await.unwrap().len(), 4);
}

#[tokio::test]
async fn crud_routes_to_the_remote_and_invalidates_the_cache() {
    let remote = Arc::new(ToggleRemote::new(Vec::new()));
    let harness = TestHarness::with_remote(&[], Some(remote));

    let created = harness.catalog.create_product(draft("Zinc Lozenges")).await.unwrap();
    // The remote assigns string identifiers.
    assert_eq!(created.id, ProductId::from("srv-0001"));

    let listed = harness.catalog.list_products().await.unwrap();
    assert_eq!(listed.len(), 1);

    let patch = ProductPatch {
        price: Some(dec!(5.49)),
        ..ProductPatch::default()
    };
    let updated = harness
        .catalog
        .update_product(&created.id, patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.price, dec!(5.49));

    assert!(harness.catalog.delete_product(&created.id).await.unwrap());
    assert!(harness.catalog.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn mutations_surface_outages_instead_of_falling_back() {
    let remote = Arc::new(ToggleRemote::new(Vec::new()));
    remote.set_online(false);
    let harness = TestHarness::with_remote(&[], Some(remote));

    let err = harness
        .catalog
        .create_product(draft("Zinc Lozenges"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SourceUnavailable(_)));
}

#[tokio::test]
async fn update_on_missing_remote_id_does_not_create_a_record() {
    let remote = Arc::new(ToggleRemote::new(Vec::new()));
    let harness = TestHarness::with_remote(&[], Some(remote));

    let patch = ProductPatch {
        name: Some("Phantom".to_string()),
        ..ProductPatch::default()
    };
    let result = harness
        .catalog
        .update_product(&ProductId::from("srv-9999"), patch)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(harness.catalog.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn local_only_crud_assigns_sequential_ids() {
    let harness = TestHarness::local(&seed_catalog());

    let created = harness.catalog.create_product(draft("Zinc Lozenges")).await.unwrap();
    // Local ids continue the numeric scheme past the seed maximum.
    assert_eq!(created.id, ProductId::from(405));

    let found = harness.catalog.product_by_id(&ProductId::from("405")).await.unwrap();
    assert_eq!(found.unwrap().name, "Zinc Lozenges");
}
