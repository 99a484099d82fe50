//! REST client for the backend API and operations built on it.
//!
//! Every call is `METHOD base_url/path` with JSON bodies. A bearer token is
//! attached while the [`Session`](crate::auth::Session) is authenticated, and a
//! 401 response expires the session.

mod client;
mod config;
pub mod endpoints;
mod operation;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use operation::RestOperation;
pub use reqwest::Method;
