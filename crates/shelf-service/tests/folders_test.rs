//! Integration tests for folder hierarchy, kinds, and deletion.

mod helpers;

use shelf_core::ErrorKind;
use shelf_core::types::Outcome;
use shelf_database::StoreOp;
use shelf_entity::folder::FolderKind;
use shelf_entity::item::Scope;
use shelf_service::folder::tree;

use helpers::{TestApp, titles};

#[tokio::test]
async fn test_descendant_closure() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    let llm = app.folder("LLM", Some(ai.id)).await;
    let other = app.folder("Other", None).await;

    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    let mut descendants = tree::descendant_ids(work.id, &folders);
    descendants.sort_by_key(|id| id.0);
    let mut expected = vec![ai.id, llm.id];
    expected.sort_by_key(|id| id.0);

    assert_eq!(descendants, expected);
    assert!(!descendants.contains(&other.id));
    assert!(tree::descendant_ids(llm.id, &folders).is_empty());
}

#[tokio::test]
async fn test_move_rejects_cycle() {
    let app = TestApp::new();
    let a = app.folder("A", None).await;
    let b = app.folder("B", Some(a.id)).await;

    let err = app.folders.move_folder(&app.ctx, a.id, Some(b.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app.folders.move_folder(&app.ctx, a.id, Some(a.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let moved = app.folders.move_folder(&app.ctx, b.id, None).await.unwrap();
    assert_eq!(moved.parent_id, None);
}

#[tokio::test]
async fn test_create_under_missing_parent() {
    let app = TestApp::new();
    let stray = shelf_core::types::FolderId::new();
    let err = app
        .folders
        .create_folder(&app.ctx, "Orphan", Some(stray), FolderKind::Prompt)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let app = TestApp::new();
    let err = app
        .folders
        .create_folder(&app.ctx, "  ", None, FolderKind::Prompt)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.store.calls(StoreOp::FolderInsert), 0);
}

#[tokio::test]
async fn test_bookmark_bootstrap_is_idempotent() {
    let app = TestApp::new();

    let first = app.folders.load_folders(&app.ctx).await.unwrap();
    let second = app.folders.load_folders(&app.ctx).await.unwrap();

    let websites: Vec<_> = second.iter().filter(|f| f.is_website()).collect();
    assert_eq!(websites.len(), 1);
    assert_eq!(websites[0].name, "Bookmarks");
    assert!(websites[0].is_root());
    assert_eq!(first.len(), second.len());
    assert_eq!(app.store.calls(StoreOp::FolderInsert), 1);
}

#[tokio::test]
async fn test_bootstrap_adopts_root_after_failed_kind_write() {
    let app = TestApp::new();
    app.store.fail(StoreOp::IdentityUpdate);

    let folders = app.folders.load_folders(&app.ctx).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert!(!folders[0].is_website());

    app.store.heal(StoreOp::IdentityUpdate);
    let folders = app.folders.load_folders(&app.ctx).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert!(folders[0].is_website());
    assert_eq!(app.store.calls(StoreOp::FolderInsert), 1);
}

#[tokio::test]
async fn test_partial_create_when_kind_write_fails() {
    let app = TestApp::new();
    app.store.fail(StoreOp::IdentityUpdate);

    let outcome = app
        .folders
        .create_folder(&app.ctx, "Links", None, FolderKind::Website)
        .await
        .unwrap();

    let Outcome::Partial { value, error } = outcome else {
        panic!("expected a partial outcome");
    };
    assert_eq!(value.name, "Links");
    assert_eq!(value.folder_kind, FolderKind::Prompt);
    assert_eq!(error.kind, ErrorKind::PartialFailure);

    app.store.heal(StoreOp::IdentityUpdate);
    app.folders
        .record_kind(&app.ctx, value.id, FolderKind::Website)
        .await
        .unwrap();
    let folder = app.folders.get_folder(&app.ctx, value.id).await.unwrap();
    assert!(folder.is_website());
}

#[tokio::test]
async fn test_delete_cascades_and_unfiles() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    let keep = app.folder("Keep", None).await;
    let item = app.item("Summarize", Some(ai.id), &[]).await;

    let outcome = app.folders.delete_folder(&app.ctx, work.id).await.unwrap();
    assert!(outcome.is_complete());
    let removed = outcome.into_value();
    assert_eq!(removed[0], work.id);
    assert!(removed.contains(&ai.id));

    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    assert_eq!(folders.iter().map(|f| f.id).collect::<Vec<_>>(), vec![keep.id]);

    let unfiled = app.items.get(&app.ctx, item.id).await.unwrap();
    assert_eq!(unfiled.folder_id, None);

    let all = app.items.list(&app.ctx, &Scope::All).await.unwrap();
    assert_eq!(titles(&all), vec!["Summarize"]);
}

#[tokio::test]
async fn test_delete_forgets_website_kind() {
    let app = TestApp::new();
    let outcome = app
        .folders
        .create_folder(&app.ctx, "Links", None, FolderKind::Website)
        .await
        .unwrap();
    let links = outcome.into_value();

    app.folders.delete_folder(&app.ctx, links.id).await.unwrap();
    let metadata = app.store.metadata(app.ctx.user_id).unwrap();
    assert!(metadata.website_folder_ids.is_empty());
}

#[tokio::test]
async fn test_delete_partial_when_kind_cleanup_fails() {
    let app = TestApp::new();
    let links = app
        .folders
        .create_folder(&app.ctx, "Links", None, FolderKind::Website)
        .await
        .unwrap()
        .into_value();
    app.store.fail(StoreOp::IdentityUpdate);

    let outcome = app.folders.delete_folder(&app.ctx, links.id).await.unwrap();
    assert!(!outcome.is_complete());
    assert_eq!(outcome.value(), &vec![links.id]);
    assert!(app.folders.list_folders(&app.ctx).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delete_leaves_items_filed() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    let report = app.item("Report", Some(work.id), &[]).await;
    let summary = app.item("Summarize", Some(ai.id), &[]).await;
    app.store.fail(StoreOp::FolderDelete);

    let err = app.folders.delete_folder(&app.ctx, work.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    app.store.heal(StoreOp::FolderDelete);

    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(app.store.item(report.id).unwrap().folder_id, Some(work.id));
    assert_eq!(app.store.item(summary.id).unwrap().folder_id, Some(ai.id));

    let scope = tree::scope_for(work.id, &folders);
    let listed = app.items.list(&app.ctx, &scope).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_delete_unfiles_even_when_sweep_fails() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let item = app.item("Report", Some(work.id), &[]).await;
    app.store.fail(StoreOp::ItemClearFolders);

    let outcome = app.folders.delete_folder(&app.ctx, work.id).await.unwrap();
    assert!(outcome.is_complete());
    assert_eq!(app.store.item(item.id).unwrap().folder_id, None);
}

#[tokio::test]
async fn test_list_folders_fails_whole_when_kind_read_fails() {
    let app = TestApp::new();
    app.folder("Work", None).await;
    app.store.fail(StoreOp::IdentityFetch);

    let err = app.folders.list_folders(&app.ctx).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
}

#[tokio::test]
async fn test_list_folders_fails_whole_when_row_read_fails() {
    let app = TestApp::new();
    app.folders
        .create_folder(&app.ctx, "Links", None, FolderKind::Website)
        .await
        .unwrap();
    app.store.fail(StoreOp::FolderList);

    let err = app.folders.list_folders(&app.ctx).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);

    app.store.heal(StoreOp::FolderList);
    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert!(folders[0].is_website());
}

#[tokio::test]
async fn test_folders_isolated_by_owner() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let stranger = shelf_service::RequestContext::new(shelf_core::types::UserId::new());

    assert!(app.folders.list_folders(&stranger).await.unwrap().is_empty());
    let err = app.folders.rename_folder(&stranger, work.id, "Mine").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
