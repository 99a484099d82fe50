//! Dioxus hooks over the runtime controllers

// Internal helper modules
mod internal;

mod call;
mod infinite;
mod polling;
mod session;

pub use call::{UseApiCall, use_api_call, use_api_call_on_mount};
pub use infinite::{UseInfiniteScroll, use_infinite_scroll};
pub use polling::{UseApiPolling, use_api_polling};
pub use session::{use_auth_signal, use_session, use_session_provider};
