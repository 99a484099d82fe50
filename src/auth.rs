//! Session state and the read-only authentication signal handed to hooks.
//!
//! A [`Session`] owns the bearer token and the authenticated flag. Everything
//! else receives an [`AuthSignal`], which can only be read. Controllers take the
//! signal at construction time instead of reading a global.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Default)]
struct SessionInner {
    authenticated: AtomicBool,
    token: RwLock<Option<String>>,
}

/// Owner of the current authentication state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that is already signed in with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.into());
        self.inner.authenticated.store(true, Ordering::SeqCst);
        crate::log_auth!("signed in");
    }

    pub fn sign_out(&self) {
        self.clear();
        crate::log_auth!("signed out");
    }

    /// Drop the token after the server rejected it.
    pub fn expire(&self) {
        self.clear();
        crate::log_auth!("token rejected by server, session expired");
    }

    fn clear(&self) {
        self.inner.authenticated.store(false, Ordering::SeqCst);
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.authenticated.load(Ordering::SeqCst)
    }

    /// Read-only view of this session's authenticated flag.
    pub fn signal(&self) -> AuthSignal {
        AuthSignal {
            inner: self.inner.clone(),
        }
    }
}

/// Read-only authentication flag shared by all controllers.
#[derive(Debug, Clone, Default)]
pub struct AuthSignal {
    inner: Arc<SessionInner>,
}

impl AuthSignal {
    /// A signal that never changes.
    pub fn fixed(authenticated: bool) -> Self {
        let inner = SessionInner::default();
        inner.authenticated.store(authenticated, Ordering::SeqCst);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// A signal that is always unauthenticated.
    pub fn anonymous() -> Self {
        Self::fixed(false)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.authenticated.load(Ordering::SeqCst)
    }
}

impl PartialEq for AuthSignal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
