//! Framework-independent controllers that back the hooks.
//!
//! Each controller publishes its state through a `tokio::sync::watch` channel so
//! that any number of observers (Dioxus signals, tests, background tasks) can
//! follow it without owning it.

pub mod call;
pub mod paginate;
pub mod poll;

use std::sync::atomic::{AtomicU64, Ordering};

pub use call::{CallController, CallOptions};
pub use paginate::{Page, PageAdapter, PageRequest, Paginator, PaginatorOptions, json_page_adapter};
pub use poll::{PollOptions, Poller};

/// Monotonic counters fencing overlapping requests on one controller.
///
/// Every started request takes a generation. A finished request may commit its
/// result only when its generation is newer than the last committed one, so an
/// older request finishing late never overwrites a newer result. Requests are
/// free to overlap: a request that finishes while newer ones are still running
/// commits normally.
#[derive(Debug, Default)]
pub(crate) struct RequestGeneration {
    started: AtomicU64,
    committed: AtomicU64,
}

impl RequestGeneration {
    /// Start a request and return its generation.
    pub(crate) fn begin(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` is the most recently started request.
    pub(crate) fn is_latest(&self, generation: u64) -> bool {
        self.started.load(Ordering::SeqCst) == generation
    }

    /// Claim the commit for `generation`. Fails when a newer request committed first.
    ///
    /// Call this inside the state channel's modify closure so the claim and the
    /// write happen under the same lock.
    pub(crate) fn try_commit(&self, generation: u64) -> bool {
        self.committed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |committed| {
                (generation > committed).then_some(generation)
            })
            .is_ok()
    }

    /// Supersede every in-flight request.
    pub(crate) fn invalidate(&self) {
        let fence = self.begin();
        self.committed.fetch_max(fence, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_commit_rejects_older_results() {
        let generation = RequestGeneration::default();
        let first = generation.begin();
        let second = generation.begin();
        assert!(generation.is_latest(second));
        assert!(!generation.is_latest(first));

        assert!(generation.try_commit(second));
        assert!(!generation.try_commit(first), "older result after a newer one");
    }

    #[test]
    fn overlapping_requests_commit_in_order() {
        let generation = RequestGeneration::default();
        let first = generation.begin();
        let second = generation.begin();

        assert!(generation.try_commit(first), "finishing first is not stale");
        assert!(generation.try_commit(second));
        assert!(!generation.try_commit(second), "a generation commits once");
    }

    #[test]
    fn invalidate_rejects_everything_in_flight() {
        let generation = RequestGeneration::default();
        let first = generation.begin();
        generation.invalidate();
        assert!(!generation.try_commit(first));

        let next = generation.begin();
        assert!(generation.try_commit(next));
    }
}
