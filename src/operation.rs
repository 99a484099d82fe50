//! The asynchronous operation capability consumed by every controller.

use std::{future::Future, time::Duration};

use crate::types::{ErrorBounds, OutputBounds};

/// An async operation that a controller can run.
///
/// This trait is the seam between the hook layer and whatever does the actual
/// work (usually a REST call). Use `Operation<()>` for operations without
/// parameters and `Operation<ParamType>` otherwise.
///
/// ## Example
///
/// ```rust,no_run
/// use dioxus_api_hooks::prelude::*;
///
/// #[derive(Clone)]
/// struct FetchGreeting;
///
/// impl Operation<String> for FetchGreeting {
///     type Output = String;
///     type Error = String;
///
///     fn run(&self, name: String) -> impl std::future::Future<Output = Result<String, String>> + Send {
///         async move { Ok(format!("Hello, {name}!")) }
///     }
/// }
/// ```
pub trait Operation<Param = ()>: Clone + Send + Sync + 'static {
    /// The type of data returned on success
    type Output: OutputBounds;
    /// The type of error returned on failure
    type Error: ErrorBounds;

    /// Execute the async operation
    fn run(&self, param: Param) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;

    /// Whether callers must hold an authenticated session to run this operation.
    ///
    /// Controllers check this before calling [`run`](Operation::run) and never
    /// invoke the operation when the auth signal is false.
    fn requires_auth(&self) -> bool {
        false
    }

    /// Label used in logs and authentication errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Build an [`Operation`] from an async closure.
///
/// ```rust,no_run
/// use dioxus_api_hooks::prelude::*;
///
/// let op = from_fn(|id: u32| async move { Ok::<_, String>(id * 2) })
///     .authenticated()
///     .named("double");
/// ```
pub fn from_fn<F>(f: F) -> FnOperation<F> {
    FnOperation {
        f,
        requires_auth: false,
        name: "fn_operation",
    }
}

/// Operation backed by a closure, see [`from_fn`].
#[derive(Clone)]
pub struct FnOperation<F> {
    f: F,
    requires_auth: bool,
    name: &'static str,
}

impl<F> FnOperation<F> {
    /// Mark the operation as requiring an authenticated session.
    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F, Fut, P, T, E> Operation<P> for FnOperation<F>
where
    F: Fn(P) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send,
    T: OutputBounds,
    E: ErrorBounds,
{
    type Output = T;
    type Error = E;

    fn run(&self, param: P) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)(param)
    }

    fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// An operation ran past its own deadline.
///
/// Operations declared with `#[operation(timeout = "...")]` convert this into
/// their error type, so that type must implement `From<OperationTimeout>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation `{operation}` timed out after {after:?}")]
pub struct OperationTimeout {
    pub operation: &'static str,
    pub after: Duration,
}

impl From<OperationTimeout> for String {
    fn from(timeout: OperationTimeout) -> Self {
        timeout.to_string()
    }
}

/// Run `future` under a deadline owned by the operation itself.
///
/// Used by the `#[operation(timeout = "...")]` expansion.
pub async fn with_timeout<T, E, F>(operation: &'static str, after: Duration, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<OperationTimeout>,
{
    match crate::platform::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => {
            crate::log_timeout!("{} exceeded {:?}", operation, after);
            Err(E::from(OperationTimeout { operation, after }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fn_operation_runs_closure() {
        let op = from_fn(|n: u32| async move { Ok::<_, String>(n + 1) }).named("incr");
        assert_eq!(op.run(1).await, Ok(2));
        assert_eq!(Operation::<u32>::name(&op), "incr");
        assert!(!Operation::<u32>::requires_auth(&op));
        assert!(Operation::<u32>::requires_auth(&op.clone().authenticated()));
    }

    #[tokio::test(start_paused = true)]
    async fn with_timeout_maps_expiry() {
        let result: Result<(), String> = with_timeout("slow", Duration::from_millis(10), async {
            crate::platform::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;
        let message = result.unwrap_err();
        assert!(message.contains("slow"));
    }
}
