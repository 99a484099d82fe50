//! Platform shims for time and task spawning.
//!
//! Native targets run on tokio. WASM targets use `web-time` for instants,
//! `wasmtimer` for sleeping and the Dioxus executor for spawning.

use std::{future::Future, time::Duration};

use futures::future::{AbortHandle, Abortable, Either};

#[cfg(not(target_family = "wasm"))]
pub use tokio::time::Instant;
#[cfg(target_family = "wasm")]
pub use web_time::Instant;

/// Sleep for the given duration on the current platform timer.
#[cfg(not(target_family = "wasm"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Sleep for the given duration on the current platform timer.
#[cfg(target_family = "wasm")]
pub async fn sleep(duration: Duration) {
    wasmtimer::tokio::sleep(duration).await;
}

/// Returned by [`timeout`] when the deadline passes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

/// Run `future` to completion unless `after` elapses first.
pub async fn timeout<F: Future>(after: Duration, future: F) -> Result<F::Output, Elapsed> {
    let future = std::pin::pin!(future);
    let delay = std::pin::pin!(sleep(after));
    match futures::future::select(future, delay).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(Elapsed),
    }
}

pub mod task {
    use super::*;

    /// Fire-and-forget spawn on the platform executor.
    #[cfg(not(target_family = "wasm"))]
    pub fn spawn<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }

    /// Fire-and-forget spawn on the platform executor.
    #[cfg(target_family = "wasm")]
    pub fn spawn<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        dioxus::prelude::spawn(future);
    }

    /// Spawn a future that can be cancelled through the returned handle.
    ///
    /// The task is aborted when the handle is dropped.
    pub fn spawn_abortable<F>(future: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        spawn(async move {
            let _ = Abortable::new(future, registration).await;
        });
        TaskHandle { abort }
    }

    /// Owned handle to a task started with [`spawn_abortable`].
    #[derive(Debug)]
    pub struct TaskHandle {
        abort: AbortHandle,
    }

    impl TaskHandle {
        /// Whether the task has not been cancelled yet.
        pub fn is_live(&self) -> bool {
            !self.abort.is_aborted()
        }

        /// Cancel the task. Idempotent.
        pub fn abort(&self) {
            self.abort.abort();
        }
    }

    impl Drop for TaskHandle {
        fn drop(&mut self) {
            self.abort.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn timeout_passes_through_fast_futures() {
        let result = timeout(Duration::from_millis(50), async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_elapses_for_slow_futures() {
        let result = timeout(
            Duration::from_millis(50),
            sleep(Duration::from_millis(500)),
        )
        .await;
        assert_eq!(result, Err(Elapsed));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_aborts_task() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u32>();
        let handle = task::spawn_abortable(async move {
            loop {
                sleep(Duration::from_millis(10)).await;
                if tx.send(1).is_err() {
                    break;
                }
            }
        });
        sleep(Duration::from_millis(35)).await;
        assert!(handle.is_live());
        drop(handle);
        while rx.try_recv().is_ok() {}
        sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
