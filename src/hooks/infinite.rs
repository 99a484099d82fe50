//! `use_infinite_scroll`: a component-scoped [`Paginator`].

use dioxus::prelude::*;

use crate::{
    errors::{HookError, HookResult},
    hooks::{internal::use_watch_signal, session::use_auth_signal},
    operation::Operation,
    runtime::{PageAdapter, PageRequest, Paginator, PaginatorOptions},
    state::PageState,
    types::OutputBounds,
};

/// Handle returned by [`use_infinite_scroll`].
pub struct UseInfiniteScroll<O, T>
where
    O: Operation<PageRequest>,
    T: 'static,
{
    paginator: Paginator<O, T>,
    state: Signal<PageState<T, O::Error>>,
}

impl<O, T> Clone for UseInfiniteScroll<O, T>
where
    O: Operation<PageRequest>,
    T: 'static,
{
    fn clone(&self) -> Self {
        Self {
            paginator: self.paginator.clone(),
            state: self.state,
        }
    }
}

impl<O, T> UseInfiniteScroll<O, T>
where
    O: Operation<PageRequest>,
    T: OutputBounds,
{
    pub fn state(&self) -> Signal<PageState<T, O::Error>> {
        self.state
    }

    pub fn items(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    pub fn has_more(&self) -> bool {
        self.state.read().has_more
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<HookError<O::Error>> {
        self.state.read().error.clone()
    }

    pub async fn fetch_page(&self, page: Option<u32>) -> HookResult<(), O::Error> {
        self.paginator.fetch_page(page).await
    }

    pub async fn load_more(&self) -> HookResult<(), O::Error> {
        self.paginator.load_more().await
    }

    pub async fn refresh(&self) -> HookResult<(), O::Error> {
        self.paginator.refresh().await
    }

    pub fn reset(&self) {
        self.paginator.reset();
    }

    pub fn paginator(&self) -> &Paginator<O, T> {
        &self.paginator
    }
}

/// Accumulate pages of `operation` results in a component.
///
/// The initial page is fetched after the first render unless
/// [`PaginatorOptions::immediate`] is off.
///
/// ```rust,no_run
/// use dioxus::prelude::*;
/// use dioxus_api_hooks::prelude::*;
/// use serde_json::Value;
///
/// #[operation]
/// async fn list_feedback(_request: PageRequest) -> Result<Value, ApiError> {
///     Ok(serde_json::json!({ "items": [], "total": 0 }))
/// }
///
/// #[component]
/// fn FeedbackList() -> Element {
///     let feed = use_infinite_scroll(
///         list_feedback(),
///         json_page_adapter::<String, ApiError>(),
///         PaginatorOptions::new().page_size(20),
///     );
///     let items = feed.items();
///     rsx! {
///         for item in items { p { "{item}" } }
///     }
/// }
/// ```
pub fn use_infinite_scroll<O, T>(
    operation: O,
    adapter: PageAdapter<O::Output, T, O::Error>,
    options: PaginatorOptions,
) -> UseInfiniteScroll<O, T>
where
    O: Operation<PageRequest>,
    T: OutputBounds,
{
    let auth = use_auth_signal();
    let paginator = use_hook(|| Paginator::new(operation, adapter, options, auth));
    let state = use_watch_signal(|| paginator.subscribe());

    use_hook(|| {
        let paginator = paginator.clone();
        spawn(async move {
            if let Err(_error) = paginator.mount().await {
                crate::log_failure!("initial page failed: {}", _error);
            }
        });
    });

    UseInfiniteScroll { paginator, state }
}
