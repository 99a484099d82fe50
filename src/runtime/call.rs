//! Call controller: lifecycle state and optional result caching for one operation.

use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::sync::watch;

use crate::{
    auth::AuthSignal,
    cache::{CacheCounters, CacheEntry, CacheStats},
    errors::{HookError, HookResult},
    operation::Operation,
    param_utils::ParamKey,
    runtime::RequestGeneration,
    state::CallState,
    types::ParamBounds,
};

/// Cache time used when caching is enabled without an explicit duration.
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(5 * 60);

pub type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type ErrorCallback<E> = Arc<dyn Fn(&HookError<E>) + Send + Sync>;

/// Configuration of a [`CallController`].
pub struct CallOptions<T, E> {
    cache: bool,
    cache_time: Duration,
    load_on_mount: bool,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback<E>>,
}

impl<T, E> CallOptions<T, E> {
    /// Caching off, no load on mount, no callbacks.
    pub fn new() -> Self {
        Self {
            cache: false,
            cache_time: DEFAULT_CACHE_TIME,
            load_on_mount: false,
            on_success: None,
            on_error: None,
        }
    }

    /// Enable or disable the response cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Maximum age of a cached result.
    pub fn with_cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    /// Execute once, without parameters, when the controller is first mounted.
    pub fn load_on_mount(mut self) -> Self {
        self.load_on_mount = true;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&HookError<E>) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache
    }

    pub fn cache_time(&self) -> Duration {
        self.cache_time
    }

    pub fn loads_on_mount(&self) -> bool {
        self.load_on_mount
    }
}

impl<T, E> Default for CallOptions<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for CallOptions<T, E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache,
            cache_time: self.cache_time,
            load_on_mount: self.load_on_mount,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T, E> std::fmt::Debug for CallOptions<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallOptions")
            .field("cache", &self.cache)
            .field("cache_time", &self.cache_time)
            .field("load_on_mount", &self.load_on_mount)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Wraps one async operation with loading/error state, auth gating and caching.
///
/// Clones share the same state, cache and in-flight fence.
///
/// ## Overlapping calls
///
/// Calls are not serialized. When two `execute` calls overlap, only the one
/// started last commits to state and cache; the other still returns its own
/// result to its caller and still fires the callbacks.
///
/// ## Example
///
/// ```rust,no_run
/// use dioxus_api_hooks::prelude::*;
/// use std::time::Duration;
///
/// # async fn demo() {
/// let op = from_fn(|id: u32| async move { Ok::<_, String>(format!("scene {id}")) });
/// let controller = CallController::new(
///     op,
///     CallOptions::new().with_cache(true).with_cache_time(Duration::from_secs(5)),
///     AuthSignal::anonymous(),
/// );
/// let scene = controller.execute(1).await;
/// # }
/// ```
pub struct CallController<O, P>
where
    O: Operation<P>,
{
    inner: Arc<CallInner<O, P>>,
}

struct CallInner<O, P>
where
    O: Operation<P>,
{
    operation: O,
    options: CallOptions<O::Output, O::Error>,
    auth: AuthSignal,
    state: watch::Sender<CallState<O::Output, O::Error>>,
    cache: Mutex<CacheEntry<O::Output>>,
    counters: CacheCounters,
    generation: RequestGeneration,
    _param: PhantomData<fn(P)>,
}

impl<O, P> Clone for CallController<O, P>
where
    O: Operation<P>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<O, P> CallController<O, P>
where
    O: Operation<P>,
    P: ParamBounds,
{
    pub fn new(
        operation: O,
        options: CallOptions<O::Output, O::Error>,
        auth: AuthSignal,
    ) -> Self {
        let (state, _) = watch::channel(CallState::default());
        Self {
            inner: Arc::new(CallInner {
                operation,
                options,
                auth,
                state,
                cache: Mutex::new(CacheEntry::new()),
                counters: CacheCounters::default(),
                generation: RequestGeneration::default(),
                _param: PhantomData,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CallState<O::Output, O::Error> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CallState<O::Output, O::Error>> {
        self.inner.state.subscribe()
    }

    pub fn options(&self) -> &CallOptions<O::Output, O::Error> {
        &self.inner.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    /// Run the operation with `params`.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` when the operation requires authentication and the session is
    ///   anonymous. The error is stored in state and the operation is not invoked.
    /// - `Ok(Some(data))` from the cache when a fresh entry exists for equal params.
    /// - Otherwise the operation's result. Failures are stored in state, passed to
    ///   the error callback and returned.
    pub async fn execute(&self, params: P) -> HookResult<Option<O::Output>, O::Error> {
        let inner = &*self.inner;
        let operation = inner.operation.name();

        if inner.operation.requires_auth() && !inner.auth.is_authenticated() {
            crate::log_auth!("{} requires authentication, not calling it", operation);
            let error = HookError::AuthRequired { operation };
            inner
                .state
                .send_modify(|state| state.error = Some(error.clone()));
            inner.notify_error(&error);
            return Ok(None);
        }

        let cache_key = if inner.options.cache {
            match ParamKey::of(&params) {
                Ok(key) => Some(key),
                Err(_error) => {
                    crate::log_cache_bypass!(
                        "{} params are not serializable: {}",
                        operation,
                        _error
                    );
                    None
                }
            }
        } else {
            None
        };

        if let Some(key) = &cache_key {
            let cached = inner
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .lookup(key, inner.options.cache_time);
            match cached {
                Some(data) => {
                    inner.counters.record_hit();
                    crate::log_cache_hit!("{} params={}", operation, key);
                    // a hit counts as the newest result, older calls still in flight lose
                    let generation = inner.generation.begin();
                    inner.state.send_if_modified(|state| {
                        if !inner.generation.try_commit(generation) {
                            return false;
                        }
                        state.data = Some(data.clone());
                        state.loading = !inner.generation.is_latest(generation);
                        true
                    });
                    return Ok(Some(data));
                }
                None => inner.counters.record_miss(),
            }
        }

        let generation = inner.generation.begin();
        inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let _in_flight = InFlight { inner, generation };

        let result = inner.operation.run(params).await;

        match result {
            Ok(data) => {
                let committed = inner.state.send_if_modified(|state| {
                    if !inner.generation.try_commit(generation) {
                        return false;
                    }
                    if let Some(key) = cache_key {
                        crate::log_cache_store!("{} params={}", operation, key);
                        inner
                            .cache
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .store(key, data.clone());
                    }
                    state.data = Some(data.clone());
                    state.error = None;
                    state.loading = !inner.generation.is_latest(generation);
                    true
                });
                if !committed {
                    crate::log_stale_write!("{} result superseded by a newer call", operation);
                }
                if let Some(callback) = &inner.options.on_success {
                    callback(&data);
                }
                Ok(Some(data))
            }
            Err(error) => {
                let error = HookError::Operation(error);
                let committed = inner.state.send_if_modified(|state| {
                    if !inner.generation.try_commit(generation) {
                        return false;
                    }
                    state.error = Some(error.clone());
                    state.loading = !inner.generation.is_latest(generation);
                    true
                });
                if !committed {
                    crate::log_stale_write!("{} error superseded by a newer call", operation);
                }
                inner.notify_error(&error);
                Err(error)
            }
        }
    }

    /// Clear data, loading and error, invalidate the cache and supersede in-flight calls.
    pub fn reset(&self) {
        self.inner.generation.invalidate();
        self.inner.state.send_replace(CallState::default());
        self.clear_cache();
    }

    /// Invalidate the cache entry without touching the displayed state.
    pub fn clear_cache(&self) {
        self.inner
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate();
        crate::log_cache_invalidate!("{}", self.inner.operation.name());
    }

    /// Run the load-on-mount call if it is configured.
    pub async fn mount(&self) -> HookResult<Option<O::Output>, O::Error>
    where
        P: Default,
    {
        if self.inner.options.load_on_mount {
            self.execute(P::default()).await
        } else {
            Ok(None)
        }
    }
}

impl<O, P> CallInner<O, P>
where
    O: Operation<P>,
{
    fn notify_error(&self, error: &HookError<O::Error>) {
        if let Some(callback) = &self.options.on_error {
            callback(error);
        }
    }
}

/// Clears `loading` when the most recently started call finishes or its
/// future is dropped.
struct InFlight<'a, O, P>
where
    O: Operation<P>,
{
    inner: &'a CallInner<O, P>,
    generation: u64,
}

impl<O, P> Drop for InFlight<'_, O, P>
where
    O: Operation<P>,
{
    fn drop(&mut self) {
        if self.inner.generation.is_latest(self.generation) {
            self.inner
                .state
                .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        }
    }
}
