//! State: lifecycle state owned by each controller
//!
//! This module provides the `CallState`, `PollState` and `PageState` records and the
//! `AsyncState` trait for working with them uniformly.

use crate::errors::HookError;

/// Common trait for async state types that represent loading, success, and error states
///
/// This trait provides a unified interface for working with the different state
/// records in dioxus-api-hooks, such as `CallState` and `PageState`.
pub trait AsyncState {
    /// The type of successful data
    type Data;
    /// The type of error
    type Error;

    /// Returns true if the state is currently loading
    fn is_loading(&self) -> bool;

    /// Returns true if the state holds data and no error
    fn is_success(&self) -> bool;

    /// Returns true if the state contains an error
    fn is_error(&self) -> bool;

    /// Returns the data if present, None otherwise
    fn data(&self) -> Option<&Self::Data>;

    /// Returns the error if failed, None otherwise
    fn error(&self) -> Option<&Self::Error>;
}

/// State of a single call controller.
#[derive(Clone, PartialEq, Debug)]
pub struct CallState<T, E> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<HookError<E>>,
}

impl<T, E> Default for CallState<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T, E> AsyncState for CallState<T, E> {
    type Data = T;
    type Error = HookError<E>;

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }

    fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    fn error(&self) -> Option<&HookError<E>> {
        self.error.as_ref()
    }
}

/// State of a poller.
#[derive(Clone, PartialEq, Debug)]
pub struct PollState<T, E> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<HookError<E>>,
    pub is_polling: bool,
}

impl<T, E> Default for PollState<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            is_polling: false,
        }
    }
}

impl<T, E> AsyncState for PollState<T, E> {
    type Data = T;
    type Error = HookError<E>;

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }

    fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    fn error(&self) -> Option<&HookError<E>> {
        self.error.as_ref()
    }
}

/// Accumulated pages of a paginator.
///
/// `items` only grows between refreshes; fetching the initial page replaces it.
#[derive(Clone, PartialEq, Debug)]
pub struct PageState<T, E> {
    pub items: Vec<T>,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<HookError<E>>,
}

impl<T, E> PageState<T, E> {
    /// Empty state positioned at `initial_page`.
    pub fn new(initial_page: u32) -> Self {
        Self {
            items: Vec::new(),
            page: initial_page,
            has_more: true,
            loading: false,
            error: None,
        }
    }
}

impl<T, E> AsyncState for PageState<T, E> {
    type Data = Vec<T>;
    type Error = HookError<E>;

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_success(&self) -> bool {
        !self.items.is_empty() && self.error.is_none()
    }

    fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn data(&self) -> Option<&Vec<T>> {
        (!self.items.is_empty()).then_some(&self.items)
    }

    fn error(&self) -> Option<&HookError<E>> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_call_state_is_idle() {
        let state: CallState<u32, String> = CallState::default();
        assert!(!state.is_loading());
        assert!(!state.is_success());
        assert!(!state.is_error());
        assert_eq!(AsyncState::data(&state), None);
    }

    #[test]
    fn page_state_reports_items_as_data() {
        let mut state: PageState<u32, String> = PageState::new(1);
        assert!(state.has_more);
        assert_eq!(AsyncState::data(&state), None);

        state.items = vec![1, 2];
        assert_eq!(AsyncState::data(&state), Some(&vec![1, 2]));
        assert!(state.is_success());

        state.error = Some(HookError::Operation("boom".into()));
        assert!(state.is_error());
        assert!(!state.is_success());
    }
}
