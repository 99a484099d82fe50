//! Authentication context for the hooks.

use dioxus::prelude::*;

use crate::auth::{AuthSignal, Session};

/// Install a [`Session`] and its [`AuthSignal`] for all descendants.
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_api_hooks::prelude::*;
///
/// #[component]
/// fn App() -> Element {
///     let session = use_session_provider(|| Session::with_token("token"));
///     let signed_in = session.is_authenticated();
///     rsx! { "signed in: {signed_in}" }
/// }
/// ```
pub fn use_session_provider(init: impl FnOnce() -> Session) -> Session {
    let session = use_context_provider(init);
    use_context_provider(|| session.signal());
    session
}

/// The nearest [`Session`], if one was installed.
pub fn use_session() -> Option<Session> {
    try_use_context::<Session>()
}

/// The nearest authentication signal.
///
/// Without a session provider the signal is permanently unauthenticated, so
/// operations that require authentication are never called.
pub fn use_auth_signal() -> AuthSignal {
    use_hook(|| try_consume_context::<AuthSignal>().unwrap_or_else(AuthSignal::anonymous))
}
