//! Paginator: accumulates pages from a paged operation.

use std::sync::Arc;

use serde::{Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap};
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    auth::AuthSignal,
    errors::{HookError, HookResult},
    operation::Operation,
    runtime::RequestGeneration,
    state::PageState,
    types::OutputBounds,
};

/// One page as understood by the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages, when the backend reports it.
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, total: None }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

/// Normalizes an operation response into a [`Page`].
pub type PageAdapter<R, T, E> = Arc<dyn Fn(R) -> Result<Page<T>, E> + Send + Sync>;

/// Configuration of a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorOptions {
    pub initial_page: u32,
    pub page_size: u32,
    /// Name of the page number parameter sent to the backend.
    pub page_param: &'static str,
    /// Name of the page size parameter sent to the backend.
    pub limit_param: &'static str,
    /// Fetch the initial page on mount.
    pub immediate: bool,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            initial_page: 1,
            page_size: 10,
            page_param: "page",
            limit_param: "limit",
            immediate: true,
        }
    }
}

impl PaginatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Rename the page and limit parameters, e.g. `("offset_page", "per_page")`.
    pub fn param_names(mut self, page_param: &'static str, limit_param: &'static str) -> Self {
        self.page_param = page_param;
        self.limit_param = limit_param;
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}

/// Parameter passed to a paged operation.
///
/// Serializes as an object keyed by the configured parameter names, so it can
/// be handed directly to a query string or JSON body encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    page_param: &'static str,
    limit_param: &'static str,
}

impl PageRequest {
    pub fn new(page: u32, options: &PaginatorOptions) -> Self {
        Self {
            page,
            limit: options.page_size,
            page_param: options.page_param,
            limit_param: options.limit_param,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            (self.page_param, self.page.to_string()),
            (self.limit_param, self.limit.to_string()),
        ]
    }
}

impl Serialize for PageRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.page_param, &self.page)?;
        map.serialize_entry(self.limit_param, &self.limit)?;
        map.end()
    }
}

const ITEM_FIELDS: [&str; 3] = ["data", "items", "results"];
const TOTAL_FIELDS: [&str; 3] = ["total", "totalCount", "count"];

/// Adapter for JSON responses of loosely specified shape.
///
/// Items are read from the first non-null field among `data`, `items` and
/// `results`, falling back to the response itself. The total is read from the
/// first numeric field among `total`, `totalCount` and `count`.
pub fn json_page_adapter<T, E>() -> PageAdapter<Value, T, E>
where
    T: DeserializeOwned + 'static,
    E: From<serde_json::Error> + 'static,
{
    Arc::new(|response: Value| {
        let total = TOTAL_FIELDS
            .iter()
            .find_map(|field| response.get(field).and_then(Value::as_u64));

        let items = match response {
            Value::Object(mut fields) => ITEM_FIELDS
                .iter()
                .filter_map(|field| fields.remove(*field))
                .find(|value| !value.is_null())
                .unwrap_or(Value::Object(fields)),
            other => other,
        };

        Ok(Page {
            items: serde_json::from_value(items)?,
            total,
        })
    })
}

/// Fetches and accumulates pages of results.
///
/// The operation receives a [`PageRequest`]; the adapter turns its output into
/// a [`Page`]. Fetching the initial page replaces the accumulated items, any
/// other page appends to them.
///
/// `has_more` follows the reported total when there is one and otherwise treats
/// a page shorter than `page_size` as the last one. An empty page always ends
/// the sequence.
pub struct Paginator<O, T>
where
    O: Operation<PageRequest>,
{
    inner: Arc<PageInner<O, T>>,
}

struct PageInner<O, T>
where
    O: Operation<PageRequest>,
{
    operation: O,
    adapter: PageAdapter<O::Output, T, O::Error>,
    options: PaginatorOptions,
    auth: AuthSignal,
    state: watch::Sender<PageState<T, O::Error>>,
    generation: RequestGeneration,
}

impl<O, T> Clone for Paginator<O, T>
where
    O: Operation<PageRequest>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<O, T> Paginator<O, T>
where
    O: Operation<PageRequest>,
    T: OutputBounds,
{
    pub fn new(
        operation: O,
        adapter: PageAdapter<O::Output, T, O::Error>,
        options: PaginatorOptions,
        auth: AuthSignal,
    ) -> Self {
        let (state, _) = watch::channel(PageState::new(options.initial_page));
        Self {
            inner: Arc::new(PageInner {
                operation,
                adapter,
                options,
                auth,
                state,
                generation: RequestGeneration::default(),
            }),
        }
    }

    pub fn state(&self) -> PageState<T, O::Error> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<T, O::Error>> {
        self.inner.state.subscribe()
    }

    pub fn options(&self) -> &PaginatorOptions {
        &self.inner.options
    }

    /// Fetch `page`, or the current page when `None`.
    ///
    /// No-op while a fetch is in flight or once the last page has been seen.
    /// Failures are stored in state and returned; accumulated items are kept.
    pub async fn fetch_page(&self, page: Option<u32>) -> HookResult<(), O::Error> {
        let page = page.unwrap_or_else(|| self.inner.state.borrow().page);
        self.fetch(page, false).await
    }

    /// Fetch the page after the current one.
    pub async fn load_more(&self) -> HookResult<(), O::Error> {
        let next = {
            let state = self.inner.state.borrow();
            if state.loading || !state.has_more {
                return Ok(());
            }
            state.page + 1
        };
        self.fetch(next, false).await
    }

    /// Start over from the initial page, replacing all accumulated items.
    pub async fn refresh(&self) -> HookResult<(), O::Error> {
        self.fetch(self.inner.options.initial_page, true).await
    }

    /// Return to the initial empty state and discard in-flight results.
    pub fn reset(&self) {
        self.inner.generation.invalidate();
        self.inner
            .state
            .send_replace(PageState::new(self.inner.options.initial_page));
        crate::log_page!("{} reset", self.inner.operation.name());
    }

    /// Fetch the initial page if `immediate` is set.
    pub async fn mount(&self) -> HookResult<(), O::Error> {
        if self.inner.options.immediate {
            self.fetch(self.inner.options.initial_page, false).await
        } else {
            Ok(())
        }
    }

    async fn fetch(&self, page: u32, refresh: bool) -> HookResult<(), O::Error> {
        let inner = &*self.inner;
        let operation = inner.operation.name();

        if inner.operation.requires_auth() && !inner.auth.is_authenticated() {
            let error = HookError::AuthRequired { operation };
            inner
                .state
                .send_modify(|state| state.error = Some(error.clone()));
            return Err(error);
        }

        let mut generation = None;
        inner.state.send_if_modified(|state| {
            if state.loading || !(state.has_more || refresh) {
                return false;
            }
            state.loading = true;
            state.error = None;
            if refresh {
                state.has_more = true;
            }
            generation = Some(inner.generation.begin());
            true
        });
        let Some(generation) = generation else {
            crate::log_page!("{} busy or exhausted, skipping page {}", operation, page);
            return Ok(());
        };
        let _in_flight = InFlight { inner, generation };

        crate::log_page!("{} fetching page {}", operation, page);
        let request = PageRequest::new(page, &inner.options);
        let result = inner
            .operation
            .run(request)
            .await
            .and_then(|output| (inner.adapter)(output))
            .map_err(HookError::Operation);

        let committed = match result {
            Ok(fetched) => {
                let initial = page == inner.options.initial_page;
                let page_size = inner.options.page_size as usize;
                inner.state.send_if_modified(|state| {
                    if !inner.generation.try_commit(generation) {
                        return false;
                    }
                    let returned = fetched.items.len();
                    if initial {
                        state.items = fetched.items;
                    } else {
                        state.items.extend(fetched.items);
                    }
                    state.has_more = returned > 0
                        && match fetched.total {
                            Some(total) => (state.items.len() as u64) < total,
                            None => returned >= page_size,
                        };
                    state.page = page;
                    state.loading = !inner.generation.is_latest(generation);
                    true
                })
            }
            Err(error) => {
                crate::log_page!("{} page {} failed: {}", operation, page, error);
                let committed = inner.state.send_if_modified(|state| {
                    if !inner.generation.try_commit(generation) {
                        return false;
                    }
                    state.error = Some(error.clone());
                    state.loading = !inner.generation.is_latest(generation);
                    true
                });
                if !committed {
                    crate::log_stale_write!("{} page {} error superseded", operation, page);
                }
                return Err(error);
            }
        };

        if !committed {
            crate::log_stale_write!("{} page {} superseded", operation, page);
        }
        Ok(())
    }
}

struct InFlight<'a, O, T>
where
    O: Operation<PageRequest>,
{
    inner: &'a PageInner<O, T>,
    generation: u64,
}

impl<O, T> Drop for InFlight<'_, O, T>
where
    O: Operation<PageRequest>,
{
    fn drop(&mut self) {
        if self.inner.generation.is_latest(self.generation) {
            self.inner
                .state
                .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        }
    }
}
