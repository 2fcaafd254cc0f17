use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Single-flight access token refresh.
///
/// Callers read [`generation`](Self::generation) before they send a request.
/// When the request comes back 401 they call [`refresh`](Self::refresh) with
/// that value. The first caller runs the refresh; callers that queued behind
/// it see a newer generation and return without refreshing again.
///
/// Shared behind an `Arc` by every client that talks to the same session.
#[derive(Debug, Default)]
pub struct RefreshGuard {
    generation: AtomicU64,
    lock: Mutex<()>,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Run `refresh` unless another caller finished one after `seen` was read.
    /// Returns whether this caller ran it. A failed refresh still counts as
    /// done, so queued callers don't retry it.
    pub async fn refresh<F, Fut, E>(&self, seen: u64, refresh: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let _guard = self.lock.lock().await;
        if self.generation() != seen {
            return Ok(false);
        }
        let result = refresh().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        result.map(|_| true)
    }
}
