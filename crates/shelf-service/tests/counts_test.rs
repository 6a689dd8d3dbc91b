//! Integration tests for folder counts and their live updates.

mod helpers;

use std::time::Duration;

use shelf_database::StoreOp;
use shelf_service::folder::tree;

use helpers::TestApp;

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    app.item("One", Some(work.id), &[]).await;
    app.item("Two", Some(work.id), &[]).await;
    app.item("Loose", None, &[]).await;

    let first = app.counts.recompute(app.ctx.owner()).await.unwrap();
    let second = app.counts.recompute(app.ctx.owner()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[&work.id], 2);
    assert_eq!(app.counts.current_counts(), first);
}

#[tokio::test]
async fn test_subtree_totals() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    app.item("Direct", Some(work.id), &[]).await;
    app.item("Nested", Some(ai.id), &[]).await;
    app.item("Nested 2", Some(ai.id), &[]).await;

    let counts = app.counts.recompute(app.ctx.owner()).await.unwrap();
    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    assert_eq!(tree::total_count(work.id, &folders, &counts), 3);
    assert_eq!(tree::total_count(ai.id, &folders, &counts), 2);
}

#[tokio::test]
async fn test_failed_recompute_keeps_last_counts() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    app.item("One", Some(work.id), &[]).await;
    app.counts.recompute(app.ctx.owner()).await.unwrap();

    app.store.fail(StoreOp::ItemFolderRefs);
    assert!(app.counts.recompute(app.ctx.owner()).await.is_err());
    assert_eq!(app.counts.current_counts()[&work.id], 1);
}

#[tokio::test]
async fn test_live_counts_follow_changes() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let mut snapshots = app.counts.subscribe_counts();

    let subscription = app.counts.watch(&app.feed, app.ctx.owner());
    snapshots.wait_for(|s| s.generation >= 1).await.unwrap();
    assert!(app.counts.current_counts().is_empty());

    let item = app.item("One", Some(work.id), &[]).await;
    snapshots
        .wait_for(|s| s.counts.get(&work.id) == Some(&1))
        .await
        .unwrap();

    app.items.delete(&app.ctx, item.id).await.unwrap();
    snapshots
        .wait_for(|s| !s.counts.contains_key(&work.id))
        .await
        .unwrap();

    drop(subscription);
}

#[tokio::test]
async fn test_dropping_subscription_stops_updates() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let mut snapshots = app.counts.subscribe_counts();

    let subscription = app.counts.watch(&app.feed, app.ctx.owner());
    snapshots.wait_for(|s| s.generation >= 1).await.unwrap();
    assert_eq!(app.feed.subscriber_count(), 1);

    drop(subscription);
    for _ in 0..10 {
        if app.feed.subscriber_count() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(app.feed.subscriber_count(), 0);

    let generation = snapshots.borrow().generation;
    app.item("One", Some(work.id), &[]).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(snapshots.borrow().generation, generation);
    assert!(app.counts.current_counts().is_empty());
}
