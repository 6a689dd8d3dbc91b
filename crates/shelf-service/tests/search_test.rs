//! Integration tests for search modes and the debounced session.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use shelf_core::ErrorKind;
use shelf_database::StoreOp;
use shelf_service::search::session::SEARCH_UNAVAILABLE_NOTICE;
use shelf_service::{SearchMode, SearchSession};

use helpers::{TestApp, titles};

#[tokio::test]
async fn test_tag_mode_is_case_insensitive_substring() {
    let app = TestApp::new();
    app.item("Model notes", None, &["GPT-4"]).await;
    app.item("Backups", None, &["snapshot"]).await;

    let hits = app.search.search(&app.ctx, "#gpt").await.unwrap();
    assert_eq!(titles(&hits), vec!["Model notes"]);

    let misses = app.search.search(&app.ctx, "#got").await.unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn test_text_mode_dedups_text_hits_first() {
    let app = TestApp::new();
    let tagged = app.item("Daily standup", None, &["rust"]).await;
    let both = app.item("Rust tips", None, &["rust"]).await;
    let titled = app.item("Learning rust", None, &[]).await;

    let results = app.search.search(&app.ctx, "rust").await.unwrap();
    let ids: Vec<_> = results.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![titled.id, both.id, tagged.id]);
}

#[tokio::test]
async fn test_search_ignores_folder_scope() {
    let app = TestApp::new();
    let work = app.folder("Work", None).await;
    app.item("Filed prompt", Some(work.id), &[]).await;
    app.item("Loose prompt", None, &[]).await;

    let results = app.search.search(&app.ctx, "prompt").await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_store_failure_is_search_unavailable() {
    let app = TestApp::new();
    app.store.fail(StoreOp::ItemSelect);
    let err = app.search.search(&app.ctx, "anything").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::SearchUnavailable);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_runs_only_last_query() {
    let app = TestApp::new();
    app.item("abacus", None, &[]).await;
    app.store.reset_calls();

    let session = SearchSession::new(Arc::clone(&app.search), app.ctx.clone());
    let mut state = session.subscribe();

    session.set_query("a");
    session.set_query("ab");
    state
        .wait_for(|s| s.query == "ab" && !s.searching)
        .await
        .unwrap();

    let selects = app.store.recorded_selects();
    assert_eq!(selects.len(), 2);
    assert!(
        selects
            .iter()
            .all(|q| q.text.as_deref() == Some("ab") || q.tag.as_deref() == Some("ab"))
    );
    assert_eq!(titles(&session.current().results), vec!["abacus"]);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_result_is_dropped() {
    let app = TestApp::new();
    app.item("slow lane", None, &[]).await;
    app.item("fast lane", None, &[]).await;
    app.store.delay_select("slow", Duration::from_secs(5));

    let session = SearchSession::with_debounce(
        Arc::clone(&app.search),
        app.ctx.clone(),
        Duration::from_millis(100),
    );
    let mut state = session.subscribe();

    session.set_query("slow");
    tokio::time::sleep(Duration::from_millis(150)).await;
    session.set_query("fast");
    state
        .wait_for(|s| s.query == "fast" && !s.searching)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    let current = session.current();
    assert_eq!(current.query, "fast");
    assert_eq!(titles(&current.results), vec!["fast lane"]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_shows_notice() {
    let app = TestApp::new();
    app.store.fail(StoreOp::ItemSelect);

    let session = SearchSession::new(Arc::clone(&app.search), app.ctx.clone());
    let mut state = session.subscribe();
    session.set_query("#gpt");
    state.wait_for(|s| !s.searching).await.unwrap();

    let current = session.current();
    assert_eq!(current.mode, SearchMode::Tag("gpt".into()));
    assert!(current.results.is_empty());
    assert_eq!(current.notice.as_deref(), Some(SEARCH_UNAVAILABLE_NOTICE));
}

#[tokio::test(start_paused = true)]
async fn test_clearing_query_resets_results() {
    let app = TestApp::new();
    app.item("abacus", None, &[]).await;

    let session = SearchSession::new(Arc::clone(&app.search), app.ctx.clone());
    let mut state = session.subscribe();
    session.set_query("aba");
    state.wait_for(|s| !s.searching && !s.results.is_empty()).await.unwrap();

    session.clear();
    let current = session.current();
    assert_eq!(current.mode, SearchMode::Idle);
    assert!(current.results.is_empty());
    assert!(!current.searching);
}
