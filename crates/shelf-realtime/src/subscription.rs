//! Subscription handles.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owns a background listener task.
///
/// The task is aborted when the handle is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called, whichever comes first.
#[derive(Debug)]
pub struct Subscription {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawn `task` on the current runtime and tie its lifetime to the
    /// returned handle.
    pub fn spawn<F>(name: &'static str, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(subscription = name, "Starting subscription");
        Self {
            name,
            handle: Some(tokio::spawn(task)),
        }
    }

    /// Name given at spawn time.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the task now.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(subscription = self.name, "Subscription stopped");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
