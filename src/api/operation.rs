use std::{future::Future, marker::PhantomData, sync::Arc};

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::{
    api::ApiClient,
    errors::ApiError,
    operation::Operation,
    types::{OutputBounds, ParamBounds},
};

/// An [`Operation`] bound to one endpoint of the backend.
///
/// The operation parameter goes to the query string for GET and DELETE and to
/// the JSON body for every other method, see [`ApiClient::request`].
///
/// ```rust,no_run
/// use dioxus_api_hooks::api::{ApiClient, ApiConfig, Method, RestOperation, endpoints};
/// use dioxus_api_hooks::auth::Session;
/// use serde_json::Value;
///
/// # fn demo() -> Result<(), dioxus_api_hooks::errors::ApiError> {
/// let client = ApiClient::new(ApiConfig::from_env()?, Session::new())?;
/// let history = RestOperation::<Value>::new(client, Method::GET, endpoints::feedback::HISTORY)
///     .authenticated();
/// # Ok(())
/// # }
/// ```
pub struct RestOperation<R> {
    client: ApiClient,
    method: Method,
    path: Arc<str>,
    requires_auth: bool,
    name: &'static str,
    _response: PhantomData<fn() -> R>,
}

impl<R> Clone for RestOperation<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            method: self.method.clone(),
            path: self.path.clone(),
            requires_auth: self.requires_auth,
            name: self.name,
            _response: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for RestOperation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestOperation")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("requires_auth", &self.requires_auth)
            .finish()
    }
}

impl<R> RestOperation<R> {
    pub fn new(client: ApiClient, method: Method, path: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            method,
            path: path.into(),
            requires_auth: false,
            name: "rest_operation",
            _response: PhantomData,
        }
    }

    pub fn get(client: ApiClient, path: impl Into<Arc<str>>) -> Self {
        Self::new(client, Method::GET, path)
    }

    pub fn post(client: ApiClient, path: impl Into<Arc<str>>) -> Self {
        Self::new(client, Method::POST, path)
    }

    /// Mark the endpoint as requiring an authenticated session.
    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Label used in logs and auth errors.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<P, R> Operation<P> for RestOperation<R>
where
    P: ParamBounds,
    R: DeserializeOwned + OutputBounds,
{
    type Output = R;
    type Error = ApiError;

    fn run(&self, param: P) -> impl Future<Output = Result<R, ApiError>> + Send {
        let this = self.clone();
        async move {
            this.client
                .request(this.method.clone(), &this.path, &param)
                .await
        }
    }

    fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
