//! Debounced, interactive search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use shelf_entity::item::Item;

use super::engine::SearchEngine;
use super::mode::SearchMode;
use crate::context::RequestContext;

/// Notice shown when results could not be fetched.
pub const SEARCH_UNAVAILABLE_NOTICE: &str = "Search is temporarily unavailable";

/// What a search view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// The raw query as typed.
    pub query: String,
    /// The parsed query.
    pub mode: SearchMode,
    /// Results for `query`, once they have arrived.
    pub results: Vec<Item>,
    /// Whether a run for `query` is pending or in flight.
    pub searching: bool,
    /// Message to show instead of results after a failure.
    pub notice: Option<String>,
    /// Generation of the query this state belongs to.
    pub generation: u64,
}

#[derive(Debug)]
struct Shared {
    state: watch::Sender<SearchState>,
    generation: AtomicU64,
    pending: Mutex<Option<CancellationToken>>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Search-as-you-type session for one user.
///
/// Each [`set_query`](Self::set_query) supersedes the previous one: the
/// pending run is cancelled and a new one starts after the debounce window.
/// Runs are stamped with a generation, and a run that finishes after being
/// superseded has its result dropped.
#[derive(Debug)]
pub struct SearchSession {
    engine: Arc<SearchEngine>,
    ctx: RequestContext,
    debounce: Duration,
    shared: Arc<Shared>,
}

impl SearchSession {
    /// Creates a session using the engine's configured debounce window.
    pub fn new(engine: Arc<SearchEngine>, ctx: RequestContext) -> Self {
        let debounce = Duration::from_millis(engine.config().debounce_ms);
        Self::with_debounce(engine, ctx, debounce)
    }

    /// Creates a session with an explicit debounce window.
    pub fn with_debounce(
        engine: Arc<SearchEngine>,
        ctx: RequestContext,
        debounce: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            engine,
            ctx,
            debounce,
            shared: Arc::new(Shared {
                state,
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Watch the session state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Replaces the query and schedules a run.
    ///
    /// An idle query clears the results immediately without a run.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mode = SearchMode::parse(&query);
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let token = CancellationToken::new();
        if let Some(previous) = self.replace_pending(Some(token.clone())) {
            previous.cancel();
        }

        let active = mode.is_active();
        self.shared.state.send_modify(|state| {
            state.query = query;
            state.mode = mode.clone();
            state.generation = generation;
            state.searching = active;
            state.notice = None;
            if !active {
                state.results.clear();
            }
        });

        if !active {
            return;
        }

        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.shared);
        let ctx = self.ctx.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            debug!(user_id = %ctx.user_id, generation, "Running debounced search");
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = engine.run(&ctx, &mode) => outcome,
            };

            shared.state.send_if_modified(|state| {
                if !shared.is_current(generation) {
                    return false;
                }
                state.searching = false;
                match outcome {
                    Ok(results) => {
                        state.results = results;
                        state.notice = None;
                    }
                    Err(e) => {
                        warn!(generation, error = %e, "Showing empty results");
                        state.results.clear();
                        state.notice = Some(SEARCH_UNAVAILABLE_NOTICE.to_string());
                    }
                }
                true
            });
        });
    }

    /// Clears the query.
    pub fn clear(&self) {
        self.set_query("");
    }

    fn replace_pending(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self
            .shared
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *pending, token)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(token) = self.replace_pending(None) {
            token.cancel();
        }
    }
}
