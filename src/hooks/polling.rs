//! `use_api_polling`: a component-scoped [`Poller`].

use dioxus::prelude::*;
use serde::Serialize;

use crate::{
    errors::HookError,
    hooks::{internal::use_watch_signal, session::use_auth_signal},
    operation::Operation,
    runtime::{PollOptions, Poller},
    state::PollState,
};

/// Handle returned by [`use_api_polling`].
pub struct UseApiPolling<O>
where
    O: Operation<()>,
{
    poller: Poller<O>,
    state: Signal<PollState<O::Output, O::Error>>,
}

impl<O> Clone for UseApiPolling<O>
where
    O: Operation<()>,
{
    fn clone(&self) -> Self {
        Self {
            poller: self.poller.clone(),
            state: self.state,
        }
    }
}

impl<O> UseApiPolling<O>
where
    O: Operation<()>,
{
    pub fn state(&self) -> Signal<PollState<O::Output, O::Error>> {
        self.state
    }

    pub fn data(&self) -> Option<O::Output> {
        self.state.read().data.clone()
    }

    pub fn error(&self) -> Option<HookError<O::Error>> {
        self.state.read().error.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.state.read().is_polling
    }

    pub fn start_polling(&self) {
        self.poller.start_polling();
    }

    pub fn stop_polling(&self) {
        self.poller.stop_polling();
    }

    pub fn poller(&self) -> &Poller<O> {
        &self.poller
    }
}

/// Poll `operation` while the component is mounted.
///
/// `dependencies` is compared structurally on every render. A change releases
/// the running timer and, when the options are enabled, starts a fresh one.
/// Unmounting shuts the poller down and discards ticks still in flight.
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_api_hooks::prelude::*;
/// use std::time::Duration;
///
/// #[operation]
/// async fn unread_notifications() -> Result<u32, String> {
///     Ok(3)
/// }
///
/// #[component]
/// fn Badge(user_id: u32) -> Element {
///     let poll = use_api_polling(
///         unread_notifications(),
///         PollOptions::new(Duration::from_secs(30)),
///         user_id,
///     );
///     let unread = poll.data().unwrap_or_default();
///     rsx! { "{unread}" }
/// }
/// ```
pub fn use_api_polling<O, D>(operation: O, options: PollOptions, dependencies: D) -> UseApiPolling<O>
where
    O: Operation<()>,
    D: Serialize,
{
    let auth = use_auth_signal();
    let poller = use_hook(|| Poller::new(operation, options, auth));
    let state = use_watch_signal(|| poller.subscribe());

    poller.sync_dependencies(&dependencies);

    let for_drop = poller.clone();
    use_drop(move || for_drop.shutdown());

    UseApiPolling { poller, state }
}
