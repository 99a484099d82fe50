#![doc = include_str!("../README.md")]

// Core modules
#[cfg(all(feature = "rest", not(target_family = "wasm")))]
pub mod api;
pub mod auth;
pub mod cache;
pub mod errors;
pub mod hooks;
mod log_utils;
pub mod operation;
pub mod param_utils;
pub mod platform;
pub mod runtime;
pub mod state;
pub mod types;

// Re-export commonly used items at crate root for convenience
pub use operation::{Operation, from_fn};
pub use runtime::{CallController, Paginator, Poller};

pub mod prelude {
    //! The prelude exports all the most common types and functions for using dioxus-api-hooks.

    // The operation trait and the macro
    pub use crate::operation::{FnOperation, Operation, OperationTimeout, from_fn};
    pub use dioxus_api_hooks_macros::operation;

    // Hooks
    pub use crate::hooks::{
        UseApiCall, UseApiPolling, UseInfiniteScroll, use_api_call, use_api_call_on_mount,
        use_api_polling,
        use_auth_signal, use_infinite_scroll, use_session, use_session_provider,
    };

    // Framework-independent controllers and their configuration
    pub use crate::runtime::{
        CallController, CallOptions, Page, PageAdapter, PageRequest, Paginator,
        PaginatorOptions, PollOptions, Poller, json_page_adapter,
    };

    // State records, needed for matching
    pub use crate::state::{AsyncState, CallState, PageState, PollState};

    // Authentication context
    pub use crate::auth::{AuthSignal, Session};

    // Cache introspection
    pub use crate::cache::CacheStats;

    // Error types
    pub use crate::errors::{ApiError, ApiResult, HookError, HookResult};

    // REST client
    #[cfg(all(feature = "rest", not(target_family = "wasm")))]
    pub use crate::api::{ApiClient, ApiConfig, RestOperation};
}
