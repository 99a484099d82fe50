//! # `use_api_call`
//!
//! Wraps one operation in a [`CallController`] that lives as long as the
//! component, and mirrors its state into a signal.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dioxus::prelude::*;
//! use dioxus_api_hooks::prelude::*;
//!
//! #[operation]
//! async fn fetch_scene(id: u32) -> Result<String, String> {
//!     Ok(format!("scene {id}"))
//! }
//!
//! #[component]
//! fn Scene() -> Element {
//!     let scene = use_api_call(fetch_scene(), CallOptions::new().with_cache(true));
//!     let state = scene.state();
//!
//!     rsx! {
//!         button {
//!             onclick: move |_| {
//!                 let scene = scene.clone();
//!                 spawn(async move {
//!                     let _ = scene.execute(1).await;
//!                 });
//!             },
//!             "Load"
//!         }
//!         if state.read().loading { "Loading..." }
//!         if let Some(data) = state.read().data.clone() { "{data}" }
//!     }
//! }
//! ```

use dioxus::prelude::*;

use crate::{
    errors::{HookError, HookResult},
    hooks::{internal::use_watch_signal, session::use_auth_signal},
    operation::Operation,
    runtime::{CallController, CallOptions},
    state::CallState,
    types::ParamBounds,
};

/// Handle returned by [`use_api_call`].
pub struct UseApiCall<O, P>
where
    O: Operation<P>,
{
    controller: CallController<O, P>,
    state: Signal<CallState<O::Output, O::Error>>,
}

impl<O, P> Clone for UseApiCall<O, P>
where
    O: Operation<P>,
{
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            state: self.state,
        }
    }
}

impl<O, P> UseApiCall<O, P>
where
    O: Operation<P>,
    P: ParamBounds,
{
    /// Reactive state. Reading it subscribes the component.
    pub fn state(&self) -> Signal<CallState<O::Output, O::Error>> {
        self.state
    }

    pub fn data(&self) -> Option<O::Output> {
        self.state.read().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<HookError<O::Error>> {
        self.state.read().error.clone()
    }

    /// See [`CallController::execute`].
    pub async fn execute(&self, params: P) -> HookResult<Option<O::Output>, O::Error> {
        self.controller.execute(params).await
    }

    pub fn reset(&self) {
        self.controller.reset();
    }

    pub fn clear_cache(&self) {
        self.controller.clear_cache();
    }

    /// The underlying controller.
    pub fn controller(&self) -> &CallController<O, P> {
        &self.controller
    }
}

/// Manage the lifecycle of one async operation inside a component.
///
/// The operation and options are captured on the first render; later values are
/// ignored. Nothing runs until [`UseApiCall::execute`] is called, so the
/// parameter type needs no default. To run the operation right after the first
/// render use [`use_api_call_on_mount`].
pub fn use_api_call<O, P>(operation: O, options: CallOptions<O::Output, O::Error>) -> UseApiCall<O, P>
where
    O: Operation<P>,
    P: ParamBounds,
{
    let auth = use_auth_signal();
    let controller = use_hook(|| CallController::new(operation, options, auth));
    let state = use_watch_signal(|| controller.subscribe());

    UseApiCall { controller, state }
}

/// Like [`use_api_call`], but executes once with `P::default()` after the first
/// render. Re-renders do not run it again.
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_api_hooks::prelude::*;
///
/// #[operation(requires_auth)]
/// async fn profile() -> Result<String, String> {
///     Ok("ada".to_string())
/// }
///
/// #[component]
/// fn ProfileView() -> Element {
///     let me = use_api_call_on_mount(profile(), CallOptions::new());
///     let name = me.data().unwrap_or_default();
///     rsx! { "{name}" }
/// }
/// ```
pub fn use_api_call_on_mount<O, P>(
    operation: O,
    options: CallOptions<O::Output, O::Error>,
) -> UseApiCall<O, P>
where
    O: Operation<P>,
    P: ParamBounds + Default,
{
    let call = use_api_call(operation, options.load_on_mount());

    use_hook(|| {
        let controller = call.controller.clone();
        spawn(async move {
            if let Err(_error) = controller.mount().await {
                crate::log_failure!("load on mount failed: {}", _error);
            }
        });
    });

    call
}
