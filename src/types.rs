//! Common types and aliases used throughout dioxus-api-hooks

use serde::Serialize;

/// Common trait bounds for operation parameters that take part in cache lookups
pub trait ParamBounds: Serialize + Send + Sync + 'static {}
impl<T> ParamBounds for T where T: Serialize + Send + Sync + 'static {}

/// Common trait bounds for operation output types
pub trait OutputBounds: Clone + Send + Sync + 'static {}
impl<T> OutputBounds for T where T: Clone + Send + Sync + 'static {}

/// Common trait bounds for operation error types
pub trait ErrorBounds:
    Clone + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
}
impl<T> ErrorBounds for T where
    T: Clone + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
}
