//! Internal logging utilities for consistent log formatting across the library
//!
//! This module provides macros that adapt log messages based on feature flags:
//! - `tracing`: Enable/disable all logging (enabled by default)
//! - `plain-logs`: When enabled with `tracing`, uses plain text prefixes instead of emojis
//!
//! ## Usage
//!
//! ```toml
//! # Default: tracing enabled with emojis
//! dioxus-api-hooks = "0.1"
//!
//! # Disable all logging
//! dioxus-api-hooks = { version = "0.1", default-features = false }
//!
//! # Enable tracing with plain text (no emojis)
//! dioxus-api-hooks = { version = "0.1", features = ["plain-logs"] }
//! ```

/// Logs a cache hit with appropriate formatting
#[macro_export]
#[doc(hidden)]
macro_rules! log_cache_hit {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("📊 [CACHE-HIT] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[CACHE-HIT] {}", format!($($arg)*));
    };
}

/// Logs a cache store operation with appropriate formatting
#[macro_export]
#[doc(hidden)]
macro_rules! log_cache_store {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("📊 [CACHE-STORE] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[CACHE-STORE] {}", format!($($arg)*));
    };
}

/// Logs a cache invalidation with appropriate formatting
#[macro_export]
#[doc(hidden)]
macro_rules! log_cache_invalidate {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🗑️ [CACHE-INVALIDATE] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[CACHE-INVALIDATE] {}", format!($($arg)*));
    };
}

/// Logs poller lifecycle events (start, stop, tick)
#[macro_export]
#[doc(hidden)]
macro_rules! log_poll {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("⏱️ [POLL] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[POLL] {}", format!($($arg)*));
    };
}

/// Logs paginator fetches
#[macro_export]
#[doc(hidden)]
macro_rules! log_page {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("📄 [PAGE] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[PAGE] {}", format!($($arg)*));
    };
}

/// Logs a result that was dropped because a newer request superseded it
#[macro_export]
#[doc(hidden)]
macro_rules! log_stale_write {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("⏭️ [STALE-WRITE] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[STALE-WRITE] {}", format!($($arg)*));
    };
}

/// Logs a cache lookup skipped because the parameters could not be keyed
#[macro_export]
#[doc(hidden)]
macro_rules! log_cache_bypass {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("📊 [CACHE-BYPASS] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[CACHE-BYPASS] {}", format!($($arg)*));
    };
}

/// Logs session changes and authentication gating
#[macro_export]
#[doc(hidden)]
macro_rules! log_auth {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🔐 [AUTH] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[AUTH] {}", format!($($arg)*));
    };
}

/// Logs outgoing HTTP requests
#[macro_export]
#[doc(hidden)]
macro_rules! log_http {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🌐 [HTTP] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[HTTP] {}", format!($($arg)*));
    };
}

/// Logs a failure that is not handed back to a caller
#[macro_export]
#[doc(hidden)]
macro_rules! log_failure {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("❌ [ERROR] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[ERROR] {}", format!($($arg)*));
    };
}

/// Logs an operation that ran past its own deadline
#[macro_export]
#[doc(hidden)]
macro_rules! log_timeout {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("⌛ [TIMEOUT] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[TIMEOUT] {}", format!($($arg)*));
    };
}
