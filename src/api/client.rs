use std::{sync::Arc, time::Duration};

use reqwest::{Method, StatusCode, header::RETRY_AFTER};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    api::ApiConfig,
    auth::Session,
    errors::{ApiError, ApiResult},
};

/// JSON client for the backend API.
///
/// Cheap to clone; clones share the connection pool and the session.
///
/// ```rust,no_run
/// use dioxus_api_hooks::api::{ApiClient, ApiConfig, endpoints};
/// use dioxus_api_hooks::auth::Session;
/// use serde_json::Value;
///
/// # async fn demo() -> Result<(), dioxus_api_hooks::errors::ApiError> {
/// let client = ApiClient::new(ApiConfig::from_env()?, Session::with_token("token"))?;
/// let scenes: Value = client.get(endpoints::ar::SCENES).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Session) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|error| ApiError::Config(error.to_string()))?;
        Ok(Self {
            http,
            config: Arc::new(config),
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send(Method::GET, path, Vec::new(), None).await
    }

    /// GET with `query` encoded as query string pairs.
    pub async fn get_query<Q, R>(&self, path: &str, query: &Q) -> ApiResult<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::GET, path, query).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.send(Method::DELETE, path, Vec::new(), None).await
    }

    /// Send `params` as query pairs for GET and DELETE, as a JSON body otherwise.
    ///
    /// Parameters serializing to `null` (such as `()`) are omitted.
    pub async fn request<P, R>(&self, method: Method, path: &str, params: &P) -> ApiResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        if method == Method::GET || method == Method::DELETE {
            let query = query_pairs(params)?;
            self.send(method, path, query, None).await
        } else {
            let body = (!params.is_null()).then_some(params);
            self.send(method, path, Vec::new(), body).await
        }
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> ApiResult<R> {
        let url = self.config.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if self.session.is_authenticated()
            && let Some(token) = self.session.token()
        {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        crate::log_http!("{} {}", method, url);
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, retry_after, bytes))
        };

        let (status, retry_after, bytes) =
            match crate::platform::timeout(self.config.timeout, exchange).await {
                Ok(Ok(exchange)) => exchange,
                Ok(Err(error)) => return Err(self.transport_error(error)),
                Err(_) => return Err(ApiError::Timeout(self.config.timeout)),
            };

        if status.is_success() {
            return decode_body(status, &bytes);
        }

        crate::log_http!("{} {} -> {}", method, url, status);
        let error = status_error(status, &bytes, retry_after);
        if matches!(error, ApiError::Unauthorized { .. }) {
            self.session.expire();
        }
        Err(error)
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

fn decode_body<R: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> ApiResult<R> {
    if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(bytes)?)
}

fn status_error(status: StatusCode, bytes: &[u8], retry_after: Option<Duration>) -> ApiError {
    let body = serde_json::from_slice::<Value>(bytes).ok();
    let message = body
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
        StatusCode::FORBIDDEN => ApiError::Forbidden { message },
        StatusCode::NOT_FOUND => ApiError::NotFound { message },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            message,
            retry_after,
        },
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
            body,
        },
    }
}

/// `message` from the body, falling back to FastAPI's `detail`.
fn error_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    match body.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Null => None,
        detail => Some(detail.to_string()),
    }
}

fn query_pairs(params: Value) -> ApiResult<Vec<(String, String)>> {
    match params {
        Value::Null => Ok(Vec::new()),
        Value::Object(fields) => {
            let mut pairs = Vec::with_capacity(fields.len());
            for (name, value) in fields {
                match value {
                    Value::Null => {}
                    Value::Array(values) => {
                        pairs.extend(values.into_iter().map(|value| (name.clone(), scalar(value))))
                    }
                    value => pairs.push((name, scalar(value))),
                }
            }
            Ok(pairs)
        }
        other => Err(ApiError::Config(format!(
            "query parameters must serialize to an object, got `{other}`"
        ))),
    }
}

fn scalar(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
