//! Integration tests for scoped listing, reordering, and share links.

mod helpers;

use shelf_core::ErrorKind;
use shelf_database::StoreOp;
use shelf_entity::item::Scope;
use shelf_service::folder::tree;

use helpers::{TestApp, titles};

#[tokio::test]
async fn test_scoped_listing_covers_subtree() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    let home = app.folder("Home", None).await;
    app.item("Direct", Some(work.id), &[]).await;
    app.item("Nested", Some(ai.id), &[]).await;
    app.item("Elsewhere", Some(home.id), &[]).await;
    app.item("Loose", None, &[]).await;

    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    let scope = tree::scope_for(work.id, &folders);
    let mut listed = titles(&app.items.list(&app.ctx, &scope).await.unwrap())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    listed.sort();
    assert_eq!(listed, vec!["Direct", "Nested"]);

    let all = app.items.list(&app.ctx, &Scope::All).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_empty_scope_issues_no_query() {
    let app = TestApp::new();
    app.item("Anything", None, &[]).await;
    app.store.reset_calls();

    let items = app.items.list(&app.ctx, &Scope::folders([])).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(app.store.calls(StoreOp::ItemSelect), 0);
}

#[tokio::test]
async fn test_reorder_partial_failure() {
    let app = TestApp::new();
    let a = app.item("A", None, &[]).await;
    let b = app.item("B", None, &[]).await;
    let c = app.item("C", None, &[]).await;
    app.store.fail_sort_order_for(b.id);

    let report = app.items.reorder(&app.ctx, vec![c.clone(), b.clone(), a.clone()]).await;
    assert_eq!(report.failed_ids(), vec![b.id]);
    assert_eq!(app.store.item(c.id).unwrap().sort_order, 0);
    assert_eq!(app.store.item(a.id).unwrap().sort_order, 2);
    assert_eq!(app.store.calls(StoreOp::ItemSetSortOrder), 3);

    let err = report.into_outcome().into_result().unwrap_err();
    assert_eq!(err.kind, ErrorKind::PartialFailure);
}

#[tokio::test]
async fn test_share_token_invariant_and_freshness() {
    let app = TestApp::new();
    let item = app.item("Public", None, &[]).await;

    let first = app.shares.set_share(&app.ctx, item.id, true).await.unwrap().unwrap();
    let stored = app.store.item(item.id).unwrap();
    assert!(stored.is_public);
    assert!(stored.share_state_consistent());

    let second = app.shares.set_share(&app.ctx, item.id, true).await.unwrap().unwrap();
    assert_ne!(first, second);
    assert!(app.shares.resolve_shared(&first).await.unwrap().is_none());
    let shared = app.shares.resolve_shared(&second).await.unwrap().unwrap();
    assert_eq!(shared.id, item.id);

    let revoked = app.shares.set_share(&app.ctx, item.id, false).await.unwrap();
    assert_eq!(revoked, None);
    let stored = app.store.item(item.id).unwrap();
    assert!(!stored.is_public);
    assert_eq!(stored.share_token, None);
    assert!(app.shares.resolve_shared(&second).await.unwrap().is_none());
}

#[tokio::test]
async fn test_share_lookup_hides_unshared_items() {
    let app = TestApp::new();
    app.item("Private", None, &[]).await;

    assert!(app.shares.resolve_shared("").await.unwrap().is_none());
    assert!(app.shares.resolve_shared("no-such-token").await.unwrap().is_none());
    assert_eq!(app.store.calls(StoreOp::ItemFindShared), 1);
}

#[tokio::test]
async fn test_share_link_for_item() {
    let app = TestApp::new();
    let item = app.item("Linked", None, &[]).await;
    assert_eq!(app.shares.link_for(&app.ctx, item.id).await.unwrap(), None);

    let token = app.shares.set_share(&app.ctx, item.id, true).await.unwrap().unwrap();
    let link = app.shares.link_for(&app.ctx, item.id).await.unwrap().unwrap();
    assert_eq!(link, format!("http://localhost:3000/share/{token}"));
}

#[tokio::test]
async fn test_share_missing_item() {
    let app = TestApp::new();
    let err = app
        .shares
        .set_share(&app.ctx, shelf_core::types::ItemId::new(), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
