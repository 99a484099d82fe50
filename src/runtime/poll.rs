//! Poller: re-invokes a zero-argument operation on a fixed interval.

use std::{
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde::Serialize;
use tokio::sync::watch;

use crate::{
    auth::AuthSignal,
    errors::HookError,
    operation::Operation,
    param_utils::ParamKey,
    platform::{
        self,
        task::{TaskHandle, spawn, spawn_abortable},
    },
    runtime::RequestGeneration,
    state::PollState,
};

/// Configuration of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    interval: Duration,
    immediate: bool,
    stop_on_error: bool,
    enabled: bool,
}

impl PollOptions {
    /// Poll every `interval`, starting immediately, ignoring errors.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            immediate: true,
            stop_on_error: false,
            enabled: true,
        }
    }

    /// Whether the first invocation happens on start instead of after one interval.
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Whether polling starts automatically when dependencies are synced.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Repeatedly runs an operation with start/stop control.
///
/// The poller owns its timer task. The timer is released on [`stop_polling`],
/// on [`shutdown`], before every dependency-triggered restart, and when the last
/// handle is dropped.
///
/// Ticks fire on schedule even while a previous invocation is still running.
/// Overlapping invocations are fenced: only the most recently started one
/// commits its result.
///
/// [`stop_polling`]: Poller::stop_polling
/// [`shutdown`]: Poller::shutdown
pub struct Poller<O>
where
    O: Operation<()>,
{
    inner: Arc<PollInner<O>>,
}

struct PollInner<O>
where
    O: Operation<()>,
{
    operation: O,
    options: PollOptions,
    auth: AuthSignal,
    state: watch::Sender<PollState<O::Output, O::Error>>,
    timer: Mutex<Option<TaskHandle>>,
    dependencies: Mutex<Option<ParamKey>>,
    generation: RequestGeneration,
    torn_down: AtomicBool,
}

impl<O> Clone for Poller<O>
where
    O: Operation<()>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<O> Poller<O>
where
    O: Operation<()>,
{
    pub fn new(operation: O, options: PollOptions, auth: AuthSignal) -> Self {
        let (state, _) = watch::channel(PollState::default());
        Self {
            inner: Arc::new(PollInner {
                operation,
                options,
                auth,
                state,
                timer: Mutex::new(None),
                dependencies: Mutex::new(None),
                generation: RequestGeneration::default(),
                torn_down: AtomicBool::new(false),
            }),
        }
    }

    pub fn state(&self) -> PollState<O::Output, O::Error> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState<O::Output, O::Error>> {
        self.inner.state.subscribe()
    }

    pub fn options(&self) -> PollOptions {
        self.inner.options
    }

    pub fn is_polling(&self) -> bool {
        self.inner.state.borrow().is_polling
    }

    /// Whether a timer task is currently owned by this poller.
    pub fn has_live_timer(&self) -> bool {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(TaskHandle::is_live)
    }

    /// Start polling. No-op while a live timer exists or after shutdown.
    pub fn start_polling(&self) {
        start(&self.inner);
    }

    /// Stop polling and release the timer. Idempotent.
    pub fn stop_polling(&self) {
        stop(&self.inner);
    }

    /// Compare `dependencies` with the last synced value and restart on change.
    ///
    /// The first call always counts as a change. Any live timer is released before
    /// deciding whether to start again, so restarts never leave two timers running.
    pub fn sync_dependencies<D: Serialize + ?Sized>(&self, dependencies: &D) {
        let key = match ParamKey::of(dependencies) {
            Ok(key) => Some(key),
            Err(_error) => {
                crate::log_poll!(
                    "dependencies of {} are not serializable, restarting: {}",
                    self.inner.operation.name(),
                    _error
                );
                None
            }
        };

        {
            let mut last = self
                .inner
                .dependencies
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if key.is_some() && *last == key {
                return;
            }
            *last = key;
        }

        stop(&self.inner);
        if self.inner.options.enabled {
            start(&self.inner);
        }
    }

    /// Teardown: stop polling and discard results of invocations still in flight.
    pub fn shutdown(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);
        stop(&self.inner);
        crate::log_poll!("{} torn down", self.inner.operation.name());
    }
}

fn start<O>(inner: &Arc<PollInner<O>>)
where
    O: Operation<()>,
{
    if inner.torn_down.load(Ordering::SeqCst) {
        return;
    }

    let mut timer = inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
    if timer.as_ref().is_some_and(TaskHandle::is_live) {
        return;
    }

    inner.state.send_if_modified(|state| !std::mem::replace(&mut state.is_polling, true));
    crate::log_poll!(
        "{} started (every {:?})",
        inner.operation.name(),
        inner.options.interval
    );

    let weak = Arc::downgrade(inner);
    let interval = inner.options.interval;
    let immediate = inner.options.immediate;
    *timer = Some(spawn_abortable(run_timer(weak, interval, immediate)));
}

fn stop<O>(inner: &PollInner<O>)
where
    O: Operation<()>,
{
    let released = inner
        .timer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    // dropping the handle aborts the timer task
    drop(released);

    if inner
        .state
        .send_if_modified(|state| std::mem::replace(&mut state.is_polling, false))
    {
        crate::log_poll!("{} stopped", inner.operation.name());
    }
}

async fn run_timer<O>(weak: Weak<PollInner<O>>, interval: Duration, immediate: bool)
where
    O: Operation<()>,
{
    if immediate {
        spawn(tick(weak.clone()));
    }
    loop {
        platform::sleep(interval).await;
        if weak.strong_count() == 0 {
            break;
        }
        spawn(tick(weak.clone()));
    }
}

async fn tick<O>(weak: Weak<PollInner<O>>)
where
    O: Operation<()>,
{
    let (operation, generation) = {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.torn_down.load(Ordering::SeqCst) {
            return;
        }
        if inner.operation.requires_auth() && !inner.auth.is_authenticated() {
            crate::log_poll!(
                "{} requires authentication, skipping tick",
                inner.operation.name()
            );
            return;
        }
        let generation = inner.generation.begin();
        inner.state.send_modify(|state| state.loading = true);
        (inner.operation.clone(), generation)
    };

    let result = operation.run(()).await;

    let Some(inner) = weak.upgrade() else {
        return;
    };
    if inner.torn_down.load(Ordering::SeqCst) {
        return;
    }
    let failed = result.is_err();
    let committed = inner.state.send_if_modified(|state| {
        // overlapping ticks commit in completion order unless a newer one already did
        if !inner.generation.try_commit(generation) {
            return false;
        }
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(error) => {
                crate::log_poll!("{} tick failed: {}", operation.name(), error);
                state.error = Some(HookError::Operation(error));
            }
        }
        state.loading = !inner.generation.is_latest(generation);
        true
    });

    if !committed {
        crate::log_stale_write!("{} tick superseded by a newer tick", operation.name());
        return;
    }
    if failed && inner.options.stop_on_error {
        stop(&inner);
    }
}
