//! End-to-end walk through folders, items, and counts.

mod helpers;

use shelf_service::folder::tree;

use helpers::{TestApp, titles};

#[tokio::test]
async fn test_work_ai_scenario() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    let ai = app.folder("AI", Some(work.id)).await;
    let item = app.item("Daily digest", Some(ai.id), &["gpt", "daily"]).await;

    let folders = app.folders.list_folders(&app.ctx).await.unwrap();
    let scope = tree::scope_for(work.id, &folders);
    let listed = app.items.list(&app.ctx, &scope).await.unwrap();
    assert_eq!(titles(&listed), vec!["Daily digest"]);
    assert_eq!(listed[0].id, item.id);

    let counts = app.counts.recompute(app.ctx.owner()).await.unwrap();
    assert_eq!(counts.get(&ai.id).copied().unwrap_or(0), 1);
    assert_eq!(counts.get(&work.id).copied().unwrap_or(0), 0);

    let forest = tree::build_forest(&folders);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].folder.id, work.id);
    assert_eq!(forest[0].children[0].folder.id, ai.id);
    assert_eq!(tree::ancestor_chain(Some(ai.id), &folders), vec!["Work", "AI"]);
}
